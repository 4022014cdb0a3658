#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use settings::{
    i18n::Catalog,
    notification::{
        platform::{BoxFuture, NotificationPlatform, Permission, PermissionOutcome, PlatformError},
        sound::{AudioOutput, ToneCue},
    },
    storage::MemoryStore,
    SettingsStore,
};
use tokio::sync::Notify;

/// Notification service double answering permission requests with a fixed outcome
pub struct FakePlatform {
    pub available: bool,
    pub permission: Mutex<Permission>,
    pub answer: PermissionOutcome,
    /// When set, permission requests wait until notified
    pub gate: Option<Arc<Notify>>,
    pub requests: AtomicUsize,
    pub shown: Mutex<Vec<(String, String)>>,
}

impl FakePlatform {
    pub fn new(permission: Permission, answer: PermissionOutcome) -> Self {
        FakePlatform {
            available: true,
            permission: Mutex::new(permission),
            answer,
            gate: None,
            requests: AtomicUsize::new(0),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn missing() -> Self {
        FakePlatform {
            available: false,
            ..Self::new(Permission::Default, PermissionOutcome::Unavailable)
        }
    }

    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl NotificationPlatform for FakePlatform {
    fn is_available(&self) -> bool {
        self.available
    }

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> BoxFuture<'_, PermissionOutcome> {
        Box::pin(async move {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gate.as_ref() {
                gate.notified().await;
            }

            *self.permission.lock().unwrap() = match self.answer {
                PermissionOutcome::Granted => Permission::Granted,
                PermissionOutcome::Denied => Permission::Denied,
                PermissionOutcome::Unavailable => Permission::Default,
            };

            self.answer
        })
    }

    fn show(&self, title: &str, body: &str) -> Result<(), PlatformError> {
        if !self.available {
            return Err(PlatformError::Unavailable);
        }
        self.shown
            .lock()
            .unwrap()
            .push((String::from(title), String::from(body)));

        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAudio {
    pub fail: bool,
    pub plays: AtomicUsize,
}

impl RecordingAudio {
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl AudioOutput for RecordingAudio {
    fn play(&self, cue: &ToneCue) -> anyhow::Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("no audio device for a {} Hz tone", cue.frequency_hz);
        }

        Ok(())
    }
}

pub fn memory_store() -> (SettingsStore, Arc<MemoryStore>, Arc<Catalog>) {
    let storage = Arc::new(MemoryStore::new());
    let catalog = Arc::new(Catalog::new());

    (
        SettingsStore::new(storage.clone(), catalog.clone()),
        storage,
        catalog,
    )
}
