//! Scripted `LockSignalSource` for monitor tests.

use async_trait::async_trait;
use lapse_core::LockSignalSource;
use lapse_domain::{LapseError, PermissionState, Result as DomainResult, ScreenState};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Lock source whose answers are fixed up front.
pub struct ScriptedLockSource {
    pub supported: bool,
    pub permission: Mutex<PermissionState>,
    /// Result of the next `request_permission` call.
    pub grant_on_request: PermissionState,
    /// Tokens handed to every successful `subscribe`, in order.
    pub subscriptions: Mutex<Vec<CancellationToken>>,
    /// Senders of every successful `subscribe`, in order.
    pub senders: Mutex<Vec<mpsc::Sender<ScreenState>>>,
}

impl ScriptedLockSource {
    pub fn new(permission: PermissionState) -> Self {
        Self {
            supported: true,
            permission: Mutex::new(permission),
            grant_on_request: PermissionState::Granted,
            subscriptions: Mutex::new(Vec::new()),
            senders: Mutex::new(Vec::new()),
        }
    }

    pub fn unsupported() -> Self {
        Self { supported: false, ..Self::new(PermissionState::Unsupported) }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }
}

#[async_trait]
impl LockSignalSource for ScriptedLockSource {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn permission(&self) -> PermissionState {
        *self.permission.lock()
    }

    async fn request_permission(&self) -> DomainResult<PermissionState> {
        *self.permission.lock() = self.grant_on_request;
        Ok(self.grant_on_request)
    }

    async fn subscribe(
        &self,
        _threshold_ms: u64,
        cancel: CancellationToken,
    ) -> DomainResult<mpsc::Receiver<ScreenState>> {
        if *self.permission.lock() != PermissionState::Granted {
            return Err(LapseError::Platform("permission not granted".into()));
        }
        let (tx, rx) = mpsc::channel(8);
        self.subscriptions.lock().push(cancel);
        self.senders.lock().push(tx);
        Ok(rx)
    }
}
