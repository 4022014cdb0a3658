use circular_queue::CircularQueue;
use settings::{
    notification::{Delivery, IncomingMessage},
    overlay::Overlay,
    panel::PanelView,
};

const MAX_DELIVERIES_TO_STORE: usize = 100;

/// A simulated message and what the dispatcher did with it
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    pub message: IncomingMessage,
    pub delivery: Delivery,
}

/// State holds the state of the application
#[derive(Debug, Clone)]
pub struct State {
    /// Terminal width converted to pixels
    pub viewport_width_px: u32,
    /// Settings overlay visibility
    pub overlay: Overlay,
    /// Translated contents of the settings panel
    pub panel: PanelView,
    /// Blocking alert, shown until dismissed
    pub alert: Option<String>,
    /// A notification permission request is in flight
    pub awaiting_permission: bool,
    /// Effective UI language
    pub language: String,
    /// Most recent dispatched messages, oldest first when iterated ascending
    pub deliveries: CircularQueue<DeliveryRecord>,
    /// Seconds since the app was opened
    pub timer: usize,
}

impl State {
    pub fn new(overlay: Overlay, panel: PanelView, language: String) -> Self {
        State {
            viewport_width_px: 0,
            overlay,
            panel,
            alert: None,
            awaiting_permission: false,
            language,
            deliveries: CircularQueue::with_capacity(MAX_DELIVERIES_TO_STORE),
            timer: 0,
        }
    }

    pub fn record_delivery(&mut self, message: IncomingMessage, delivery: Delivery) {
        self.deliveries.push(DeliveryRecord { message, delivery });
    }

    pub fn show_alert(&mut self, text: String) {
        tracing::info!("alert: {text}");
        self.alert = Some(text);
    }

    pub fn tick_timer(&mut self) {
        self.timer += 1;
    }
}
