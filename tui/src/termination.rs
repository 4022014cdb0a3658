#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::broadcast;

/// Why the application is shutting down
#[derive(Debug, Clone, PartialEq)]
pub enum Interrupted {
    OsSigInt,
    OsSigTerm,
    UserInt,
}

/// Handle any task can use to stop the whole application
#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    pub fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    pub fn terminate(&mut self, interrupted: Interrupted) -> anyhow::Result<()> {
        tracing::info!("terminating: {interrupted:?}");
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }
}

#[cfg(unix)]
async fn terminate_by_unix_signal(mut terminator: Terminator) -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let interrupted = tokio::select! {
        _ = sigint.recv() => Interrupted::OsSigInt,
        _ = sigterm.recv() => Interrupted::OsSigTerm,
    };

    terminator.terminate(interrupted)
}

/// Creates the shutdown channel and, on unix, wires SIGINT / SIGTERM into it
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    #[cfg(unix)]
    {
        let signal_terminator = terminator.clone();
        tokio::spawn(async move {
            if let Err(err) = terminate_by_unix_signal(signal_terminator).await {
                tracing::error!("signal handling stopped: {err:#}");
            }
        });
    }

    (terminator, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_terminate_reaches_every_subscriber() {
        let (mut terminator, mut first_rx) = create_termination();
        let mut second_rx = first_rx.resubscribe();

        terminator.terminate(Interrupted::UserInt).unwrap();

        assert_eq!(first_rx.recv().await.unwrap(), Interrupted::UserInt);
        assert_eq!(second_rx.recv().await.unwrap(), Interrupted::UserInt);
    }
}
