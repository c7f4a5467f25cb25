use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Collects the non-blank lines of one child stream in the background.
pub(crate) struct LineCapture {
    lines: Arc<Mutex<Vec<String>>>,
    reader: JoinHandle<()>,
}

impl LineCapture {
    pub(crate) fn spawn<R>(stream: R, name: &'static str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);

        let reader = tokio::spawn(async move {
            let mut reader = BufReader::new(stream).lines();
            loop {
                match reader.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => sink
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(line),
                    Ok(None) => break,
                    Err(e) => {
                        tracing::debug!(stream = name, error = %e, "Stopped reading worker output");
                        break;
                    }
                }
            }
        });

        Self { lines, reader }
    }

    /// Wait up to `drain` for the stream to close, then return what was captured.
    ///
    /// A descendant that inherited the pipe can keep it open after the worker exits;
    /// the reader is abandoned in that case.
    pub(crate) async fn finish(mut self, drain: Duration) -> Vec<String> {
        if timeout(drain, &mut self.reader).await.is_err() {
            tracing::debug!("Worker output still open after drain window");
            self.reader.abort();
        }

        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
