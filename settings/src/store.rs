use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    i18n::Translator,
    model::Settings,
    storage::{KeyValueStore, StorageError},
};

/// Storage key holding the serialized [Settings]
pub const SETTINGS_KEY: &str = "settings";

/// Reads, writes and applies the [Settings] record.
///
/// No copy is cached here; every [SettingsStore::load] goes back to storage.
#[derive(Clone)]
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStore>,
    translator: Arc<dyn Translator>,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, translator: Arc<dyn Translator>) -> Self {
        Self {
            storage,
            translator,
        }
    }

    /// Returns the defaults overlaid with every well-typed field found in storage.
    ///
    /// Unreadable or malformed stored values count as an empty record.
    pub fn load(&self) -> Settings {
        let stored = match self.storage.get(SETTINGS_KEY) {
            Ok(Some(raw)) => parse_stored(&raw),
            Ok(None) => Map::new(),
            Err(err) => {
                tracing::warn!("could not read stored settings, using defaults: {err}");
                Map::new()
            }
        };

        overlay_defaults(stored)
    }

    /// Overwrites the stored record with exactly `notify`, `sound` and `language`
    pub fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let serialized = serde_json::json!({
            "notify": settings.notify,
            "sound": settings.sound,
            "language": settings.language,
        })
        .to_string();

        self.storage
            .set(SETTINGS_KEY, &serialized)
            .inspect_err(|err| tracing::error!("could not save settings: {err}"))
    }

    /// Pushes the language of `settings` into the translator
    pub fn apply(&self, settings: &Settings) {
        self.translator.init(settings.language.as_deref());
    }

    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.translator
    }
}

fn parse_stored(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            tracing::warn!("stored settings are not an object ({other}), discarding");
            Map::new()
        }
        Err(err) => {
            tracing::warn!("stored settings are not valid JSON, discarding: {err}");
            Map::new()
        }
    }
}

fn overlay_defaults(stored: Map<String, Value>) -> Settings {
    let mut settings = Settings::default();

    if let Some(Value::Bool(notify)) = stored.get("notify") {
        settings.notify = *notify;
    }
    if let Some(Value::Bool(sound)) = stored.get("sound") {
        settings.sound = *sound;
    }
    match stored.get("language") {
        Some(Value::String(language)) => settings.language = Some(language.clone()),
        Some(Value::Null) => settings.language = None,
        _ => (),
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{i18n::Catalog, storage::MemoryStore};

    fn store_with(raw: Option<&str>) -> (SettingsStore, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        if let Some(raw) = raw {
            storage.set(SETTINGS_KEY, raw).unwrap();
        }

        (
            SettingsStore::new(storage.clone(), Arc::new(Catalog::new())),
            storage,
        )
    }

    #[test]
    fn test_load_without_stored_value_returns_defaults() {
        let (store, _) = store_with(None);

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_load_corrupt_value_returns_defaults() {
        for raw in ["{not json", "[1, 2]", "42", "\"settings\"", "null"] {
            let (store, _) = store_with(Some(raw));

            assert_eq!(store.load(), Settings::default(), "stored value {raw:?}");
        }
    }

    #[test]
    fn test_load_overlays_valid_fields_only() {
        let (store, _) = store_with(Some(r#"{"sound":true,"notify":"yes","language":"zh"}"#));

        assert_eq!(
            store.load(),
            Settings {
                notify: false,
                sound: true,
                language: Some(String::from("zh")),
            }
        );
    }

    #[test]
    fn test_save_then_load_returns_same_fields() {
        let (store, _) = store_with(None);
        let settings = Settings {
            notify: true,
            sound: false,
            language: Some(String::from("en")),
        };

        store.save(&settings).unwrap();

        assert_eq!(store.load(), settings);
        // and saving what was loaded changes nothing
        store.save(&store.load()).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_save_writes_exactly_three_fields() {
        let (store, storage) = store_with(Some(r#"{"notify":true,"theme":"dark"}"#));

        store.save(&store.load()).unwrap();

        let raw = storage.get(SETTINGS_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"notify": true, "sound": false, "language": null})
        );
    }

    #[test]
    fn test_apply_pushes_language_into_translator() {
        let (store, _) = store_with(None);

        store.apply(&Settings {
            language: Some(String::from("zh")),
            ..Default::default()
        });

        assert_eq!(store.translator().current_language(), "zh");
    }
}
