use std::{
    fs::File,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use settings::{i18n::Catalog, storage::FileStore, SettingsStore};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    platform::{DesktopNotifications, TerminalBell},
    state_store::{Services, StateStore},
    termination::create_termination,
    ui_management::UiManager,
};

mod config;
mod platform;
mod state_store;
mod termination;
mod ui_management;

const APP_NAME: &str = "chat-settings";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_logging(&config)?;

    let (terminator, interrupt_rx) = create_termination();

    let catalog = Arc::new(Catalog::new());
    let storage = Arc::new(FileStore::new(&config.storage_path));
    tracing::info!("settings stored in {}", storage.path().display());
    let (bell, bell_rx) = TerminalBell::new();

    let services = Services {
        store: SettingsStore::new(storage, catalog.clone()),
        catalog,
        platform: Arc::new(DesktopNotifications::probe(APP_NAME)),
        audio: Arc::new(bell),
        mobile_breakpoint_px: config.mobile_breakpoint_px,
        cell_width_px: config.cell_width_px,
    };

    let (state_store, state_rx) = StateStore::new(services);
    let (ui_manager, action_rx) = UiManager::new();

    let (reason, _) = tokio::try_join!(
        state_store.main_loop(terminator, action_rx, interrupt_rx.resubscribe()),
        ui_manager.main_loop(state_rx, bell_rx, interrupt_rx.resubscribe()),
    )?;

    tracing::info!("exited: {reason:?}");

    Ok(())
}

// the terminal belongs to the ui, so logs go to a file
fn init_logging(config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("could not create log directory {}", parent.display()))?;
    }

    let log_file = File::create(&config.log_path)
        .with_context(|| format!("could not create log file {}", config.log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    Ok(())
}
