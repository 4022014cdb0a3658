/// The persisted preference record and its mutual exclusion rules
pub mod model;
/// Key-value slots the preference record is persisted into
pub mod storage;
/// Loading, saving and applying the preference record
pub mod store;
/// Translation lookup and language selection used by every rendered label
pub mod i18n;
/// Desktop and sound notifications for incoming chat messages
pub mod notification;
/// Headless controller behind the settings panel controls
pub mod panel;
/// Open / close model of the sliding settings overlay
pub mod overlay;

pub use model::Settings;
pub use store::SettingsStore;
