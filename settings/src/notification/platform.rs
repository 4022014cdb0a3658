use std::{future::Future, pin::Pin};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Permission state as reported by the notification service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Never requested
    Default,
    Granted,
    Denied,
}

/// Result of asking the user for notification permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    Denied,
    /// The service disappeared or could not be asked
    Unavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("notification service is not available")]
    Unavailable,
    #[error("notification could not be shown: {0}")]
    Show(String),
}

/// Desktop notification service of the host system.
///
/// Implementations must never panic when the service is missing; [NotificationPlatform::is_available]
/// reports it instead.
pub trait NotificationPlatform: Send + Sync {
    fn is_available(&self) -> bool;

    fn permission(&self) -> Permission;

    /// Asks for permission. Resolves once the user (or the system) answered.
    fn request_permission(&self) -> BoxFuture<'_, PermissionOutcome>;

    fn show(&self, title: &str, body: &str) -> Result<(), PlatformError>;

    /// Whether a notification would be displayed right now
    fn can_show(&self) -> bool {
        self.is_available() && self.permission() == Permission::Granted
    }
}
