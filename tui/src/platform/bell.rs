use anyhow::Context;
use settings::notification::sound::{AudioOutput, ToneCue};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const SAMPLE_RATE: u32 = 8_000;

/// Receives one item per tone; the terminal owner rings the bell for it
pub type BellReceiver = UnboundedReceiver<()>;

/// [AudioOutput] that renders the tone and asks the UI to ring the terminal bell.
///
/// The UI owns stdout, so the bell is written there between frames.
pub struct TerminalBell {
    ring_tx: UnboundedSender<()>,
}

impl TerminalBell {
    pub fn new() -> (Self, BellReceiver) {
        let (ring_tx, ring_rx) = mpsc::unbounded_channel();

        (TerminalBell { ring_tx }, ring_rx)
    }
}

impl AudioOutput for TerminalBell {
    fn play(&self, cue: &ToneCue) -> anyhow::Result<()> {
        let samples = cue.render(SAMPLE_RATE);
        anyhow::ensure!(!samples.is_empty(), "tone rendered no samples");

        tracing::debug!(
            "ringing bell for a {} Hz tone of {} samples",
            cue.frequency_hz,
            samples.len()
        );

        self.ring_tx
            .send(())
            .context("terminal is no longer listening for the bell")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_rings_once() {
        let (bell, mut ring_rx) = TerminalBell::new();

        bell.play(&ToneCue::default()).unwrap();

        assert!(ring_rx.try_recv().is_ok());
        assert!(ring_rx.try_recv().is_err());
    }

    #[test]
    fn test_play_fails_once_the_terminal_is_gone() {
        let (bell, ring_rx) = TerminalBell::new();
        drop(ring_rx);

        assert!(bell.play(&ToneCue::default()).is_err());
    }
}
