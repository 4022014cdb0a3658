use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use settings::{
    notification::{Delivery, MessageKind},
    overlay::LayoutMode,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state_store::{action::Action, DeliveryRecord, State},
    ui_management::components::{
        usage::{widget_usage_to_text, HasUsageInfo, UsageInfo, UsageInfoLine},
        Component, ComponentRender,
    },
};

const SIDEBAR_ROOMS: [&str; 3] = ["general", "rust", "random"];

struct Props {
    /// Layout for the current terminal width
    layout: LayoutMode,
    sidebar_open: bool,
    /// Backdrop of the settings overlay is shown
    mask_active: bool,
    deliveries: Vec<DeliveryRecord>,
    language: String,
    timer: usize,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            layout: state.overlay.mode_for(state.viewport_width_px),
            sidebar_open: state.overlay.is_sidebar_open(),
            mask_active: state.overlay.is_mask_active(),
            deliveries: state.deliveries.asc_iter().cloned().collect(),
            language: state.language.clone(),
            timer: state.timer,
        }
    }
}

/// Main screen: room sidebar and the log of dispatched notifications
pub struct ChatPage {
    action_tx: UnboundedSender<Action>,
    props: Props,
}

impl ChatPage {
    fn shows_sidebar(&self) -> bool {
        match self.props.layout {
            LayoutMode::Desktop => true,
            LayoutMode::Mobile => self.props.sidebar_open,
        }
    }

    fn simulate(&self, kind: MessageKind) {
        let _ = self.action_tx.send(Action::SimulateMessage { kind });
    }
}

impl Component for ChatPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        ChatPage {
            action_tx,
            props: Props::from(state),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        ChatPage {
            props: Props::from(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Chat Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('s') => {
                let _ = self.action_tx.send(Action::OpenSettings);
            }
            KeyCode::Char('b') => {
                let _ = self.action_tx.send(Action::ToggleSidebar);
            }
            KeyCode::Char('1') => self.simulate(MessageKind::Text),
            KeyCode::Char('2') => self.simulate(MessageKind::Image),
            KeyCode::Char('3') => self.simulate(MessageKind::PrivateText),
            KeyCode::Char('4') => self.simulate(MessageKind::PrivateImage),
            KeyCode::Char('5') => self.simulate(MessageKind::Other),
            KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::Exit);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.action_tx.send(Action::Exit);
            }
            _ => {}
        }
    }
}

fn kind_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Text => "text",
        MessageKind::Image => "image",
        MessageKind::PrivateText => "private text",
        MessageKind::PrivateImage => "private image",
        MessageKind::Other => "other",
    }
}

fn delivery_line<'a>(record: &DeliveryRecord) -> Line<'a> {
    let message = &record.message;
    let origin = Span::from(format!(
        "#{} [{}] ",
        message.room_name,
        kind_label(message.kind)
    ))
    .bold();

    let outcome: Span = match &record.delivery {
        Delivery::Desktop { body, .. } => Span::from(format!("desktop: {body}")).green(),
        Delivery::Sound => Span::from("sound: ♪").cyan(),
        Delivery::Suppressed => Span::from("desktop notification suppressed").yellow(),
        Delivery::Muted => Span::from("muted").dark_gray(),
    };

    Line::from(vec![origin, outcome])
}

fn calculate_list_offset(height: u16, items_len: usize) -> usize {
    // go back by (container height - 2 for borders) to get the offset
    items_len.saturating_sub(height.saturating_sub(2) as usize)
}

impl ComponentRender<()> for ChatPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let area = frame.size();

        let main = if self.shows_sidebar() {
            let [sidebar, main] = *Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(20), Constraint::Min(1)].as_ref())
                .split(area)
            else {
                panic!("The main layout should have 2 chunks")
            };

            let rooms: Vec<ListItem> = SIDEBAR_ROOMS
                .iter()
                .map(|room| ListItem::new(Line::from(format!("#{room}"))))
                .collect();
            let room_list =
                List::new(rooms).block(Block::default().borders(Borders::ALL).title("Rooms"));
            frame.render_widget(room_list, sidebar);

            main
        } else {
            area
        };

        let [container_deliveries, container_status, container_usage] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Min(1),
                    Constraint::Length(3),
                    Constraint::Length(7),
                ]
                .as_ref(),
            )
            .split(main)
        else {
            panic!("The right layout should have 3 chunks")
        };

        let offset = calculate_list_offset(container_deliveries.height, self.props.deliveries.len());
        let deliveries: Vec<ListItem> = self
            .props
            .deliveries
            .iter()
            .skip(offset)
            .map(|record| ListItem::new(delivery_line(record)))
            .collect();
        let deliveries = List::new(deliveries).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Incoming Messages"),
        );
        frame.render_widget(deliveries, container_deliveries);

        let status = Paragraph::new(Line::from(vec![
            "language: ".into(),
            Span::from(self.props.language.clone()).bold(),
            format!(
                "  layout: {:?}  running for: {} secs",
                self.props.layout, self.props.timer
            )
            .into(),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(status, container_status);

        let usage = Paragraph::new(widget_usage_to_text(self.usage_info()))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Usage"));
        frame.render_widget(usage, container_usage);

        if self.props.mask_active {
            frame.render_widget(
                Block::default().style(Style::default().bg(Color::DarkGray)),
                area,
            );
        }
    }
}

impl HasUsageInfo for ChatPage {
    fn usage_info(&self) -> UsageInfo {
        let mut lines = vec![
            UsageInfoLine::new(&["s"], "to open settings"),
            UsageInfoLine::new(&["1", "2", "3", "4", "5"], "to receive a text, image, private text, private image or other message"),
            UsageInfoLine::new(&["q"], "to exit"),
        ];
        if self.props.layout == LayoutMode::Mobile {
            lines.insert(1, UsageInfoLine::new(&["b"], "to toggle the room list"));
        }

        UsageInfo {
            description: None,
            lines,
        }
    }
}
