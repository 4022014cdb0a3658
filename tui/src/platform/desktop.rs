use notify_rust::Notification;
use settings::notification::platform::{
    BoxFuture, NotificationPlatform, Permission, PermissionOutcome, PlatformError,
};

const NOTIFICATION_TIMEOUT_MS: i32 = 5000;

/// [NotificationPlatform] backed by `notify-rust`.
///
/// Notification daemons have no permission prompt: once the daemon answers, showing
/// notifications is allowed.
pub struct DesktopNotifications {
    app_name: String,
    available: bool,
}

impl DesktopNotifications {
    /// Checks once whether a notification daemon is reachable
    pub fn probe(app_name: &str) -> Self {
        let available = daemon_reachable();
        tracing::info!("desktop notification service available: {available}");

        DesktopNotifications {
            app_name: String::from(app_name),
            available,
        }
    }

    /// A service that never shows anything, without touching the system
    #[cfg(test)]
    pub fn unavailable() -> Self {
        DesktopNotifications {
            app_name: String::new(),
            available: false,
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn daemon_reachable() -> bool {
    match notify_rust::get_server_information() {
        Ok(info) => {
            tracing::debug!("notification daemon: {} {}", info.name, info.version);
            true
        }
        Err(err) => {
            tracing::warn!("no notification daemon: {err}");
            false
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn daemon_reachable() -> bool {
    true
}

impl NotificationPlatform for DesktopNotifications {
    fn is_available(&self) -> bool {
        self.available
    }

    fn permission(&self) -> Permission {
        if self.available {
            Permission::Granted
        } else {
            Permission::Default
        }
    }

    fn request_permission(&self) -> BoxFuture<'_, PermissionOutcome> {
        let outcome = if self.available {
            PermissionOutcome::Granted
        } else {
            PermissionOutcome::Unavailable
        };

        Box::pin(async move { outcome })
    }

    fn show(&self, title: &str, body: &str) -> Result<(), PlatformError> {
        if !self.available {
            return Err(PlatformError::Unavailable);
        }

        let notification = Notification::new()
            .appname(&self.app_name)
            .summary(title)
            .body(body)
            .timeout(NOTIFICATION_TIMEOUT_MS)
            .finalize();

        // the daemon round trip blocks, keep it off the state store loop
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(move || {
                    if let Err(err) = notification.show() {
                        tracing::warn!("could not show desktop notification: {err}");
                    }
                });

                Ok(())
            }
            Err(_) => notification
                .show()
                .map(|_| ())
                .map_err(|err| PlatformError::Show(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_inside_runtime_does_not_wait_for_the_daemon() {
        let desktop = DesktopNotifications {
            app_name: String::from("chat-settings-test"),
            available: true,
        };

        // delivery failures surface in the log, not here
        assert!(desktop.show("#rust", "ann:hello").is_ok());
    }

    #[test]
    fn test_unavailable_service_refuses_to_show() {
        let desktop = DesktopNotifications::unavailable();

        assert_eq!(desktop.permission(), Permission::Default);
        assert!(matches!(
            desktop.show("#rust", "hello"),
            Err(PlatformError::Unavailable)
        ));
    }
}
