//! Detection monitor - permission state and the platform subscription
//!
//! Nothing here propagates an error. When the platform refuses, the monitor
//! records the permission state, exposes a notice for the user and leaves
//! detection inactive.

use std::sync::Arc;

use lapse_domain::{PermissionState, ScreenState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ports::LockSignalSource;

/// Owns the subscription to a [`LockSignalSource`]
pub struct DetectionMonitor {
    source: Arc<dyn LockSignalSource>,
    threshold_ms: u64,
    permission: PermissionState,
    subscription: Option<CancellationToken>,
}

impl DetectionMonitor {
    pub fn new(source: Arc<dyn LockSignalSource>, threshold_ms: u64) -> Self {
        let permission =
            if source.is_supported() { PermissionState::Prompt } else { PermissionState::Unsupported };
        Self { source, threshold_ms, permission, subscription: None }
    }

    pub const fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Notice to show while detection is not running
    pub const fn notice(&self) -> Option<&'static str> {
        self.permission.notice()
    }

    /// Whether a subscription is currently live
    pub fn is_active(&self) -> bool {
        self.subscription.as_ref().is_some_and(|token| !token.is_cancelled())
    }

    /// Subscribe to screen state changes
    ///
    /// Any previous subscription is cancelled first, so calling this again
    /// after a permission re-grant never leaves two subscriptions running.
    /// Returns `None` when detection could not be started.
    pub async fn start(&mut self) -> Option<mpsc::Receiver<ScreenState>> {
        self.stop();

        if !self.source.is_supported() {
            info!("screen lock detection is not available on this platform");
            self.permission = PermissionState::Unsupported;
            return None;
        }

        let token = CancellationToken::new();
        match self.source.subscribe(self.threshold_ms, token.clone()).await {
            Ok(receiver) => {
                self.permission = PermissionState::Granted;
                self.subscription = Some(token);
                info!(threshold_ms = self.threshold_ms, "screen lock detection started");
                Some(receiver)
            }
            Err(err) => {
                self.permission = match self.source.permission().await {
                    PermissionState::Denied => PermissionState::Denied,
                    _ => PermissionState::Error,
                };
                warn!(
                    error = %err,
                    error_type = err.label(),
                    permission = %self.permission,
                    "unable to start screen lock detection"
                );
                None
            }
        }
    }

    /// Ask for permission and start detection when it is granted
    pub async fn request_permission(&mut self) -> Option<mpsc::Receiver<ScreenState>> {
        if !self.source.is_supported() {
            self.permission = PermissionState::Unsupported;
            return None;
        }

        match self.source.request_permission().await {
            Ok(PermissionState::Granted) => self.start().await,
            Ok(state) => {
                info!(permission = %state, "screen lock detection permission not granted");
                self.permission = state;
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to request screen lock detection permission");
                self.permission = PermissionState::Error;
                None
            }
        }
    }

    /// Cancel the live subscription, if any
    pub fn stop(&mut self) {
        if let Some(token) = self.subscription.take() {
            token.cancel();
        }
    }
}

impl Drop for DetectionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
