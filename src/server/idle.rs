//! Sliding-window idle detection.
//!
//! One tokio task owns the deadline. Request handlers never touch it
//! directly; they send [`IdleTimer::touch`] messages over a channel, so
//! rearm, cancel and expiry are serialised through that single task.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Debug)]
enum TimerCommand {
    Touch,
    Cancel,
}

/// Handle to a running idle timer. Cloning shares the same timer.
#[derive(Debug, Clone)]
pub struct IdleTimer {
    tx: mpsc::UnboundedSender<TimerCommand>,
    timeout: Duration,
}

impl IdleTimer {
    /// Start a timer that calls `on_expire` once `timeout` passes without a
    /// [`touch`](Self::touch).
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(timeout: Duration, on_expire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut on_expire = Some(on_expire);
            let mut handles_open = true;
            let sleep = tokio::time::sleep(timeout);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    () = &mut sleep => {
                        if let Some(on_expire) = on_expire.take() {
                            on_expire();
                        }
                        break;
                    },
                    command = rx.recv(), if handles_open => match command {
                        Some(TimerCommand::Touch) => {
                            sleep.as_mut().reset(Instant::now() + timeout);
                        },
                        Some(TimerCommand::Cancel) => {
                            tracing::debug!("Idle timer cancelled");
                            break;
                        },
                        // Dropping every handle does not disarm the timer.
                        None => handles_open = false,
                    },
                }
            }
        });

        Self { tx, timeout }
    }

    /// Restart the idle window.
    pub fn touch(&self) {
        let _ = self.tx.send(TimerCommand::Touch);
    }

    /// Disarm the timer without firing it.
    pub fn cancel(&self) {
        let _ = self.tx.send(TimerCommand::Cancel);
    }

    /// Returns `true` once the timer has fired or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
