use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::model::SUPPORTED_LANGUAGES;

/// Sentinel handed to [Translator::init] when no language was chosen
pub const AUTO_LANGUAGE: &str = "auto";

const FALLBACK_LANGUAGE: &str = "en";
const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Translation collaborator used by the panel and the notification bodies
pub trait Translator: Send + Sync {
    /// Looks up `key` in the current language, returning `fallback` when it is missing
    fn translate(&self, key: &str, fallback: &str) -> String;
    /// Switches the current language. [AUTO_LANGUAGE] re-runs detection
    fn set_language(&self, code: &str);
    fn current_language(&self) -> String;
    /// Applies the language stored in the settings record, detecting it when absent
    fn init(&self, language: Option<&str>);
}

/// Emitted every time the effective language changes
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageChanged {
    pub language: String,
}

/// Built-in translation tables for the supported languages
pub struct Catalog {
    current: RwLock<String>,
    change_tx: broadcast::Sender<LanguageChanged>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let (change_tx, _) = broadcast::channel(16);

        Catalog {
            current: RwLock::new(String::from(FALLBACK_LANGUAGE)),
            change_tx,
        }
    }

    /// Subscribes to language change events, the counterpart of a `languageChange` listener
    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChanged> {
        self.change_tx.subscribe()
    }

    fn resolve(code: &str) -> String {
        if code == AUTO_LANGUAGE {
            return String::from(detect_language(|name| std::env::var(name).ok()));
        }

        if is_supported(code) {
            String::from(code)
        } else {
            tracing::warn!("unsupported language {code:?}, using {FALLBACK_LANGUAGE}");
            String::from(FALLBACK_LANGUAGE)
        }
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, fallback: &str) -> String {
        let language = self.current_language();

        lookup(&language, key)
            .map(String::from)
            .unwrap_or_else(|| String::from(fallback))
    }

    fn set_language(&self, code: &str) {
        let resolved = Self::resolve(code);

        let changed = match self.current.write() {
            Ok(mut current) if *current != resolved => {
                *current = resolved.clone();
                true
            }
            Ok(_) => false,
            Err(_) => {
                tracing::error!("language lock poisoned, keeping previous language");
                false
            }
        };

        if changed {
            tracing::info!("language switched to {resolved}");
            // nobody listening is fine
            let _ = self.change_tx.send(LanguageChanged { language: resolved });
        }
    }

    fn current_language(&self) -> String {
        self.current
            .read()
            .map(|current| current.clone())
            .unwrap_or_else(|_| String::from(FALLBACK_LANGUAGE))
    }

    fn init(&self, language: Option<&str>) {
        self.set_language(language.unwrap_or(AUTO_LANGUAGE));
    }
}

fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(supported, _)| *supported == code)
}

/// Picks a supported language from POSIX locale variables such as `zh_CN.UTF-8`
pub fn detect_language(var: impl Fn(&str) -> Option<String>) -> &'static str {
    let locale = LOCALE_VARIABLES
        .iter()
        .filter_map(|name| var(name))
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX");

    match locale {
        Some(locale) if locale.to_lowercase().starts_with("zh") => "zh",
        _ => FALLBACK_LANGUAGE,
    }
}

fn lookup(language: &str, key: &str) -> Option<&'static str> {
    let text = match (language, key) {
        ("en", "settings.title") => "Settings",
        ("en", "settings.desktop_notifications") => "Desktop Notifications",
        ("en", "settings.sound_notifications") => "Sound Notifications",
        ("en", "settings.language_switch") => "Language",
        ("en", "notification.image") => "[image]",
        ("en", "notification.private") => "(Private)",
        ("en", "notification.enabled_title") => "Notifications enabled",
        ("en", "notification.enabled_body") => "You will receive alerts here.",
        ("en", "alert.unsupported") => "Notifications are not supported on this system.",
        ("en", "alert.denied") => "Please allow notifications in your system settings.",
        ("zh", "settings.title") => "设置",
        ("zh", "settings.desktop_notifications") => "桌面通知",
        ("zh", "settings.sound_notifications") => "声音通知",
        ("zh", "settings.language_switch") => "语言",
        ("zh", "notification.image") => "[图片]",
        ("zh", "notification.private") => "(私聊)",
        ("zh", "notification.enabled_title") => "通知已开启",
        ("zh", "notification.enabled_body") => "您将在这里收到提醒。",
        ("zh", "alert.unsupported") => "当前系统不支持通知。",
        ("zh", "alert.denied") => "请在系统设置中允许通知。",
        _ => return None,
    };

    Some(text)
}
