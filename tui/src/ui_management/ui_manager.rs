use std::{
    io::{self, Stdout},
    time::Duration,
};

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver},
};
use tokio_stream::StreamExt;

use crate::{
    platform::BellReceiver,
    state_store::{action::Action, State},
    termination::Interrupted,
    ui_management::components::{Component, ComponentRender},
};

use super::pages::AppRouter;

// short enough for the overlay slide animation to look smooth
const RENDERING_TICK_RATE: Duration = Duration::from_millis(40);

const BELL: &str = "\x07";

pub struct UiManager {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl UiManager {
    pub fn new() -> (Self, UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        (Self { action_tx }, action_rx)
    }

    pub async fn main_loop(
        self,
        mut state_rx: UnboundedReceiver<State>,
        mut bell_rx: BellReceiver,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        // consume the first state to initialize the ui app
        let mut app_router = {
            let state = state_rx
                .recv()
                .await
                .context("state store stopped before the first state")?;

            AppRouter::new(&state, self.action_tx.clone())
        };

        let mut terminal = setup_terminal()?;
        let mut ticker = tokio::time::interval(RENDERING_TICK_RATE);
        let mut crossterm_events = EventStream::new();

        // the layout depends on the terminal width from the very first frame
        let columns = terminal.size().context("could not measure the terminal")?.width;
        let _ = self.action_tx.send(Action::Resize { columns });

        let result: anyhow::Result<Interrupted> = loop {
            tokio::select! {
                // Tick to advance animations every N milliseconds
                _ = ticker.tick() => {
                    app_router.tick();
                },
                // Catch and handle crossterm events
                maybe_event = crossterm_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        tracing::trace!("key {:?} for {}", key.code, app_router.name());
                        app_router.handle_key_event(key);
                    },
                    Some(Ok(Event::Resize(columns, _))) => {
                        let _ = self.action_tx.send(Action::Resize { columns });
                    },
                    Some(Err(err)) => {
                        tracing::warn!("could not read terminal event: {err}");
                    },
                    None => break Err(anyhow::anyhow!("terminal event stream closed")),
                    _ => (),
                },
                // Handle state updates
                Some(state) = state_rx.recv() => {
                    app_router = app_router.move_with_state(&state);
                },
                // Ring the bell between frames so it never splits an escape sequence
                Some(()) = bell_rx.recv() => {
                    if let Err(err) = execute!(terminal.backend_mut(), Print(BELL)) {
                        tracing::error!("could not ring the terminal bell: {err}");
                    }
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break Ok(interrupted);
                }
            }

            if let Err(err) = terminal
                .draw(|frame| app_router.render(frame, ()))
                .context("could not render to the terminal")
            {
                break Err(err);
            }
        };

        restore_terminal(&mut terminal)?;

        result
    }
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();

    enable_raw_mode()?;

    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    Ok(terminal.show_cursor()?)
}
