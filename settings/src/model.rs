use serde::{Deserialize, Serialize};

/// Language codes offered by the language selector, with their display labels
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[("en", "🇺🇸 English"), ("zh", "🇨🇳 中文")];

/// User preferences persisted between runs of the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Show a desktop notification for new messages
    pub notify: bool,
    /// Play a short tone for new messages
    pub sound: bool,
    /// UI language code. `None` lets the translator detect the language
    pub language: Option<String>,
}

impl Settings {
    /// Switches desktop notifications. Turning them on turns sound off.
    pub fn set_notify(&mut self, enabled: bool) {
        self.notify = enabled;
        if enabled {
            self.sound = false;
        }
    }

    /// Switches sound notifications. Turning them on turns desktop notifications off.
    pub fn set_sound(&mut self, enabled: bool) {
        self.sound = enabled;
        if enabled {
            self.notify = false;
        }
    }

    pub fn set_language(&mut self, code: &str) {
        self.language = Some(String::from(code));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_off() {
        let settings = Settings::default();

        assert!(!settings.notify);
        assert!(!settings.sound);
        assert_eq!(settings.language, None);
    }

    #[test]
    fn test_enabling_sound_clears_notify() {
        let mut settings = Settings {
            notify: true,
            ..Default::default()
        };

        settings.set_sound(true);

        assert!(settings.sound);
        assert!(!settings.notify);
    }

    #[test]
    fn test_enabling_notify_clears_sound() {
        let mut settings = Settings {
            sound: true,
            ..Default::default()
        };

        settings.set_notify(true);

        assert!(settings.notify);
        assert!(!settings.sound);
    }

    #[test]
    fn test_disabling_leaves_the_other_toggle_alone() {
        let mut settings = Settings {
            notify: true,
            ..Default::default()
        };

        settings.set_sound(false);
        assert!(settings.notify);

        settings.set_notify(false);
        assert!(!settings.notify);
        assert!(!settings.sound);
    }

    #[test]
    fn test_serialized_shape() {
        let settings = Settings {
            notify: true,
            sound: false,
            language: None,
        };

        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"notify":true,"sound":false,"language":null}"#
        );
    }
}
