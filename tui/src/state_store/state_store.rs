use std::{sync::Arc, time::Duration};

use settings::{
    i18n::{Catalog, Translator},
    notification::{
        platform::{NotificationPlatform, PermissionOutcome},
        sound::AudioOutput,
        Dispatcher, IncomingMessage, MessageKind,
    },
    overlay::{self, Overlay, Teardown},
    panel::{NotifyOptIn, NotifyToggle, PanelController},
    SettingsStore,
};
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
    oneshot,
};

use crate::termination::{Interrupted, Terminator};

use super::{action::Action, State};

const SAMPLE_ROOMS: [&str; 3] = ["general", "rust", "random"];
const SAMPLE_SENDERS: [&str; 3] = ["ann", "bob", "chen"];
const LONG_SAMPLE_TEXT: &str = "Has anyone tried the new release yet? The changelog mentions faster startup, \
     a reworked settings panel and a lot of small fixes for notifications on smaller screens.";

/// Collaborators the state store drives
pub struct Services {
    pub store: SettingsStore,
    pub catalog: Arc<Catalog>,
    pub platform: Arc<dyn NotificationPlatform>,
    pub audio: Arc<dyn AudioOutput>,
    pub mobile_breakpoint_px: u32,
    pub cell_width_px: u32,
}

/// Background work started by the store, reporting back into the main loop
enum Completion {
    PermissionAnswered(PermissionOutcome),
    Rerender,
    TeardownDue(Teardown),
}

pub struct StateStore {
    state_tx: UnboundedSender<State>,
    services: Services,
}

impl StateStore {
    pub fn new(services: Services) -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();

        (StateStore { state_tx, services }, state_rx)
    }
}

impl StateStore {
    pub async fn main_loop(
        self,
        mut terminator: Terminator,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let Services {
            store,
            catalog,
            platform,
            audio,
            mobile_breakpoint_px,
            cell_width_px,
        } = self.services;

        // the stored language has to be active before the first render
        store.apply(&store.load());
        let mut language_rx = catalog.subscribe();

        let mut panel = PanelController::new(store.clone(), platform.clone());
        let dispatcher = Dispatcher::new(store, platform, audio);

        let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<Completion>();
        let mut transition_end_tx: Option<oneshot::Sender<()>> = None;
        let mut message_seq: usize = 0;

        let mut state = State::new(
            Overlay::new(mobile_breakpoint_px),
            panel.view(),
            catalog.current_language(),
        );

        // the initial state once
        self.state_tx.send(state.clone())?;

        let mut ticker = tokio::time::interval(Duration::from_secs(1));

        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => match action {
                    Action::Resize { columns } => {
                        state.viewport_width_px = u32::from(columns) * cell_width_px;
                    },
                    Action::OpenSettings => {
                        state.overlay.open(state.viewport_width_px);
                        state.panel = panel.render();
                    },
                    Action::CloseSettings => {
                        let teardown = state.overlay.close(state.viewport_width_px);
                        let (tx, rx) = oneshot::channel();
                        // a newer close makes the previous teardown wait for its deadline
                        transition_end_tx = Some(tx);
                        spawn_teardown(teardown, rx, completion_tx.clone());
                    },
                    Action::PanelTransitionEnd => {
                        if let Some(tx) = transition_end_tx.take() {
                            let _ = tx.send(());
                        }
                    },
                    Action::ToggleSidebar => {
                        let open = !state.overlay.is_sidebar_open();
                        state.overlay.set_sidebar_open(open);
                    },
                    Action::ToggleNotify { enabled } => match panel.toggle_notify(enabled) {
                        NotifyToggle::Disabled => {
                            state.panel = panel.view();
                        },
                        NotifyToggle::Unsupported => {
                            if let Some(text) = alert_text(catalog.as_ref(), NotifyOptIn::Unsupported) {
                                state.show_alert(text);
                            }
                            state.panel = panel.view();
                        },
                        NotifyToggle::PermissionRequired => {
                            state.awaiting_permission = true;
                            let request = panel.permission_request();
                            let completion_tx = completion_tx.clone();

                            // not tied to the panel, closing it does not cancel the request
                            tokio::spawn(async move {
                                let outcome = request.await;
                                let _ = completion_tx.send(Completion::PermissionAnswered(outcome));
                            });
                        },
                    },
                    Action::ToggleSound { enabled } => {
                        panel.toggle_sound(enabled);
                        state.panel = panel.view();
                    },
                    Action::SelectLanguage { code } => {
                        let rerender = panel.select_language(&code);
                        let completion_tx = completion_tx.clone();

                        tokio::spawn(async move {
                            tokio::time::sleep(rerender.after).await;
                            let _ = completion_tx.send(Completion::Rerender);
                        });
                    },
                    Action::DismissAlert => {
                        state.alert = None;
                    },
                    Action::SimulateMessage { kind } => {
                        message_seq += 1;
                        let message = sample_message(kind, message_seq);
                        let delivery = dispatcher.dispatch(&message);
                        tracing::debug!("message {message_seq} in #{}: {delivery:?}", message.room_name);

                        state.record_delivery(message, delivery);
                    },
                    Action::Exit => {
                        let _ = terminator.terminate(Interrupted::UserInt);

                        break Interrupted::UserInt;
                    },
                },
                // Handle results of permission requests and timers
                Some(completion) = completion_rx.recv() => match completion {
                    Completion::PermissionAnswered(outcome) => {
                        state.awaiting_permission = false;
                        let opt_in = panel.complete_notify_opt_in(outcome);
                        if let Some(text) = alert_text(catalog.as_ref(), opt_in) {
                            state.show_alert(text);
                        }
                        state.panel = panel.view();
                    },
                    Completion::Rerender => {
                        state.panel = panel.render();
                    },
                    Completion::TeardownDue(teardown) => {
                        if state.overlay.finish_teardown(teardown) {
                            tracing::debug!("settings overlay hidden");
                        }
                    },
                },
                // Refresh the title as soon as the language changes
                Ok(change) = language_rx.recv() => {
                    state.language = change.language;
                    state.panel.title = catalog.translate("settings.title", "Settings");
                },
                // Tick to terminate the select every N milliseconds
                _ = ticker.tick() => {
                    state.tick_timer();
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }

            self.state_tx.send(state.clone())?;
        };

        Ok(result)
    }
}

fn spawn_teardown(
    teardown: Teardown,
    transition_end_rx: oneshot::Receiver<()>,
    completion_tx: UnboundedSender<Completion>,
) {
    tokio::spawn(async move {
        let transition_end = async {
            // a dropped sender never signals, leave it to the deadline
            if transition_end_rx.await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        let settled = overlay::settle(transition_end, teardown.deadline).await;
        tracing::debug!("settings overlay close settled: {settled:?}");

        let _ = completion_tx.send(Completion::TeardownDue(teardown));
    });
}

fn alert_text(translator: &dyn Translator, opt_in: NotifyOptIn) -> Option<String> {
    opt_in
        .alert()
        .map(|(key, fallback)| translator.translate(key, fallback))
}

fn sample_message(kind: MessageKind, seq: usize) -> IncomingMessage {
    let text = if seq % 3 == 0 {
        String::from(LONG_SAMPLE_TEXT)
    } else {
        format!("message number {seq}")
    };

    IncomingMessage {
        room_name: String::from(SAMPLE_ROOMS[seq % SAMPLE_ROOMS.len()]),
        kind,
        text,
        sender: Some(String::from(SAMPLE_SENDERS[seq % SAMPLE_SENDERS.len()])),
    }
}
