//! Line-oriented lock signal source

use std::sync::Arc;

use async_trait::async_trait;
use lapse_core::LockSignalSource;
use lapse_domain::{PermissionState, Result as DomainResult, ScreenState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const SIGNAL_BUFFER: usize = 16;

/// Reads `locked` / `unlocked` lines from an async reader
///
/// Blank lines and lines starting with `#` are skipped; anything else that
/// is not a screen state is logged and ignored. Only one subscription reads
/// at a time: a new subscription waits until the previous one has been
/// cancelled and released the reader.
pub struct LineLockSource<R> {
    lines: Arc<Mutex<Lines<R>>>,
}

impl LineLockSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> LineLockSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self { lines: Arc::new(Mutex::new(reader.lines())) }
    }
}

/// `None` for lines that carry no signal
fn parse_signal(line: &str) -> Option<ScreenState> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    match line.parse::<ScreenState>() {
        Ok(state) => Some(state),
        Err(_) => {
            warn!(line, "ignoring unrecognised lock signal");
            None
        }
    }
}

#[async_trait]
impl<R> LockSignalSource for LineLockSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn is_supported(&self) -> bool {
        true
    }

    async fn permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    async fn request_permission(&self) -> DomainResult<PermissionState> {
        Ok(PermissionState::Granted)
    }

    async fn subscribe(
        &self,
        _threshold_ms: u64,
        cancel: CancellationToken,
    ) -> DomainResult<mpsc::Receiver<ScreenState>> {
        let (tx, rx) = mpsc::channel(SIGNAL_BUFFER);
        let lines = Arc::clone(&self.lines);

        tokio::spawn(async move {
            let mut lines = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                guard = lines.lock_owned() => guard,
            };

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = lines.next_line() => next,
                };
                match next {
                    Ok(Some(line)) => {
                        if let Some(state) = parse_signal(&line) {
                            debug!(state = %state, "lock signal received");
                            if tx.send(state).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(None) => {
                        debug!("lock signal input closed");
                        break;
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to read lock signal input");
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }
}
