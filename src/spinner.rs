use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

const FRAMES: [char; 4] = ['/', '-', '\\', '|'];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);
const LABEL: &str = "Loading";

/// Starts a spinner for one request; absent when no animation is wanted.
pub type StartSpinner<'a> = &'a dyn Fn() -> Spinner;

/// Console spinner drawn by a background task until [`Spinner::stop`] is called.
///
/// The task stops when the cancel sender fires or is dropped, so a spinner
/// that is dropped without `stop` still winds down on its own.
pub struct Spinner {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl Spinner {
    pub fn start() -> Self {
        Self::start_with(io::stdout(), FRAME_INTERVAL)
    }

    pub fn start_with<W>(mut out: W, interval: Duration) -> Self
    where
        W: Write + Send + 'static,
    {
        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut frame = 0usize;

            loop {
                tokio::select! {
                    _ = &mut cancelled => break,
                    _ = ticker.tick() => {
                        let _ = write!(out, "\r{LABEL} {}", FRAMES[frame]);
                        let _ = out.flush();
                        frame = (frame + 1) % FRAMES.len();
                    }
                }
            }

            let blank = " ".repeat(LABEL.len() + 2);
            let _ = write!(out, "\r{blank}\r");
            let _ = out.flush();
        });

        Self {
            cancel: Some(cancel),
            task,
        }
    }

    pub async fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Err(err) = self.task.await {
            debug!(error = %err, "spinner task ended abnormally");
        }
    }
}
