//! Headless controller behind the settings panel.
//!
//! The host renders [PanelView] and forwards control changes here. Each change mutates
//! the session copy of the settings, keeps `notify` and `sound` exclusive, saves and
//! applies the record.

use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    model::{Settings, SUPPORTED_LANGUAGES},
    notification::platform::{NotificationPlatform, PermissionOutcome},
    store::SettingsStore,
};

/// Delay before the panel is rebuilt after a language change
pub const RERENDER_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleRow {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageOption {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSelector {
    pub label: String,
    pub options: Vec<LanguageOption>,
}

/// Everything needed to draw the panel, already translated
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub notify: ToggleRow,
    pub sound: ToggleRow,
    pub language: LanguageSelector,
}

/// Request to rebuild the panel once `after` elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rerender {
    pub after: Duration,
}

/// First step of switching desktop notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyToggle {
    /// Switched off and saved
    Disabled,
    /// No notification service; the toggle must go back to off
    Unsupported,
    /// Permission has to be requested, then passed to [PanelController::complete_notify_opt_in]
    PermissionRequired,
}

/// Final result of switching desktop notifications on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOptIn {
    Enabled,
    Unsupported,
    Denied,
}

impl NotifyOptIn {
    /// Translation key and fallback of the blocking alert shown for this result
    pub fn alert(&self) -> Option<(&'static str, &'static str)> {
        match self {
            NotifyOptIn::Enabled => None,
            NotifyOptIn::Unsupported => Some((
                "alert.unsupported",
                "Notifications are not supported on this system.",
            )),
            NotifyOptIn::Denied => Some((
                "alert.denied",
                "Please allow notifications in your system settings.",
            )),
        }
    }
}

pub struct PanelController {
    store: SettingsStore,
    platform: Arc<dyn NotificationPlatform>,
    /// Settings as of the last render, mutated by the controls
    settings: Settings,
    /// The "notifications enabled" confirmation was shown. Lives as long as the controller
    notification_shown: bool,
}

impl PanelController {
    pub fn new(store: SettingsStore, platform: Arc<dyn NotificationPlatform>) -> Self {
        let settings = store.load();

        PanelController {
            store,
            platform,
            settings,
            notification_shown: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn notification_shown(&self) -> bool {
        self.notification_shown
    }

    /// Starts a new panel session from the stored settings and builds its view
    pub fn render(&mut self) -> PanelView {
        self.settings = self.store.load();
        self.view()
    }

    /// View of the current session, without reloading
    pub fn view(&self) -> PanelView {
        let translator = self.store.translator();
        let selected = self.settings.language.as_deref();

        PanelView {
            title: translator.translate("settings.title", "Settings"),
            notify: ToggleRow {
                label: translator
                    .translate("settings.desktop_notifications", "Desktop Notifications"),
                checked: self.settings.notify,
            },
            sound: ToggleRow {
                label: translator.translate("settings.sound_notifications", "Sound Notifications"),
                checked: self.settings.sound,
            },
            language: LanguageSelector {
                label: translator.translate("settings.language_switch", "Language"),
                options: SUPPORTED_LANGUAGES
                    .iter()
                    .map(|&(code, label)| LanguageOption {
                        code,
                        label,
                        selected: selected == Some(code),
                    })
                    .collect(),
            },
        }
    }

    pub fn select_language(&mut self, code: &str) -> Rerender {
        self.settings.set_language(code);
        self.store.translator().set_language(code);
        self.persist();

        Rerender {
            after: RERENDER_DELAY,
        }
    }

    pub fn toggle_sound(&mut self, enabled: bool) {
        self.settings.set_sound(enabled);
        self.persist();
    }

    pub fn toggle_notify(&mut self, enabled: bool) -> NotifyToggle {
        if !enabled {
            self.settings.set_notify(false);
            self.persist();
            self.notification_shown = false;

            return NotifyToggle::Disabled;
        }

        if !self.platform.is_available() {
            tracing::info!("desktop notifications requested but no notification service found");
            return NotifyToggle::Unsupported;
        }

        NotifyToggle::PermissionRequired
    }

    /// Permission request detached from the controller, so it can outlive the panel
    pub fn permission_request(&self) -> impl Future<Output = PermissionOutcome> + Send + 'static {
        let platform = self.platform.clone();

        async move { platform.request_permission().await }
    }

    /// Continuation of a permission request started through [NotifyToggle::PermissionRequired]
    pub fn complete_notify_opt_in(&mut self, outcome: PermissionOutcome) -> NotifyOptIn {
        match outcome {
            PermissionOutcome::Granted => {
                self.settings.set_notify(true);
                self.persist();
                self.confirm_notifications_enabled();

                NotifyOptIn::Enabled
            }
            PermissionOutcome::Denied | PermissionOutcome::Unavailable => {
                tracing::info!("notification permission not granted: {outcome:?}");
                self.settings.set_notify(false);
                self.persist();

                NotifyOptIn::Denied
            }
        }
    }

    /// Runs the whole opt-in flow in place
    pub async fn enable_notify(&mut self) -> NotifyOptIn {
        match self.toggle_notify(true) {
            NotifyToggle::PermissionRequired => {
                let outcome = self.permission_request().await;
                self.complete_notify_opt_in(outcome)
            }
            NotifyToggle::Unsupported | NotifyToggle::Disabled => NotifyOptIn::Unsupported,
        }
    }

    fn confirm_notifications_enabled(&mut self) {
        if self.notification_shown {
            return;
        }

        let translator = self.store.translator();
        let title = translator.translate("notification.enabled_title", "Notifications enabled");
        let body = translator.translate("notification.enabled_body", "You will receive alerts here.");

        if let Err(err) = self.platform.show(&title, &body) {
            tracing::warn!("could not show confirmation notification: {err}");
        }
        self.notification_shown = true;
    }

    // best effort, a failed save is already logged by the store
    fn persist(&self) {
        let _ = self.store.save(&self.settings);
        self.store.apply(&self.settings);
    }
}
