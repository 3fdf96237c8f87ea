//! Screen lock signal sources
//!
//! There is no native screen-lock API binding here. Lock transitions reach
//! the application as text lines (`locked` / `unlocked`), typically piped
//! in by a desktop-session hook such as a `dbus-monitor` or
//! `loginctl` script.
//!
//! # Platform Support
//!
//! - **Line input**: [`LineLockSource`] over stdin or any async reader
//! - **Detection disabled**: [`UnsupportedLockSource`] stub

mod line_source;

pub use line_source::LineLockSource;

/// Stub for configurations without a lock signal feed
pub mod unsupported {
    use async_trait::async_trait;
    use lapse_core::LockSignalSource;
    use lapse_domain::{LapseError, PermissionState, Result as DomainResult, ScreenState};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    /// Lock source that reports the platform as unsupported.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct UnsupportedLockSource;

    #[async_trait]
    impl LockSignalSource for UnsupportedLockSource {
        fn is_supported(&self) -> bool {
            false
        }

        async fn permission(&self) -> PermissionState {
            PermissionState::Unsupported
        }

        async fn request_permission(&self) -> DomainResult<PermissionState> {
            Ok(PermissionState::Unsupported)
        }

        async fn subscribe(
            &self,
            _threshold_ms: u64,
            _cancel: CancellationToken,
        ) -> DomainResult<mpsc::Receiver<ScreenState>> {
            Err(LapseError::Platform("Screen lock detection is not available".to_string()))
        }
    }
}

pub use unsupported::UnsupportedLockSource;
