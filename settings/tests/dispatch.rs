mod common;

use std::sync::Arc;

use common::{memory_store, FakePlatform, RecordingAudio};
use settings::{
    notification::{
        platform::{Permission, PermissionOutcome},
        Delivery, Dispatcher, MessageKind,
    },
    Settings, SettingsStore,
};

fn dispatcher(
    store: &SettingsStore,
    platform: FakePlatform,
    audio: RecordingAudio,
) -> (Dispatcher, Arc<FakePlatform>, Arc<RecordingAudio>) {
    let platform = Arc::new(platform);
    let audio = Arc::new(audio);

    (
        Dispatcher::new(store.clone(), platform.clone(), audio.clone()),
        platform,
        audio,
    )
}

fn granted() -> FakePlatform {
    FakePlatform::new(Permission::Granted, PermissionOutcome::Granted)
}

#[test]
fn both_off_is_a_no_op() {
    let (store, _, _) = memory_store();
    let (dispatcher, platform, audio) = dispatcher(&store, granted(), RecordingAudio::default());

    let delivery = dispatcher.notify_message("general", MessageKind::Text, "hi", Some("ann"));

    assert_eq!(delivery, Delivery::Muted);
    assert!(platform.shown().is_empty());
    assert_eq!(audio.plays(), 0);
}

#[test]
fn notify_shows_desktop_notification() {
    let (store, _, _) = memory_store();
    store
        .save(&Settings {
            notify: true,
            ..Default::default()
        })
        .unwrap();
    let (dispatcher, platform, audio) = dispatcher(&store, granted(), RecordingAudio::default());

    let delivery = dispatcher.notify_message("general", MessageKind::Text, "hello", Some("ann"));

    assert_eq!(
        delivery,
        Delivery::Desktop {
            title: String::from("#general"),
            body: String::from("ann:hello"),
        }
    );
    assert_eq!(
        platform.shown(),
        vec![(String::from("#general"), String::from("ann:hello"))]
    );
    assert_eq!(audio.plays(), 0);
}

#[test]
fn notify_without_permission_is_silent() {
    let (store, _, _) = memory_store();
    store
        .save(&Settings {
            notify: true,
            ..Default::default()
        })
        .unwrap();
    let platform = FakePlatform::new(Permission::Default, PermissionOutcome::Granted);
    let (dispatcher, platform, audio) = dispatcher(&store, platform, RecordingAudio::default());

    let delivery = dispatcher.notify_message("general", MessageKind::Image, "", None);

    assert_eq!(delivery, Delivery::Suppressed);
    assert!(platform.shown().is_empty());
    // the dispatch path never asks for permission
    assert_eq!(
        platform
            .requests
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
    assert_eq!(audio.plays(), 0);
}

#[test]
fn missing_notification_service_is_silent() {
    let (store, _, _) = memory_store();
    store
        .save(&Settings {
            notify: true,
            ..Default::default()
        })
        .unwrap();
    let (dispatcher, platform, _) =
        dispatcher(&store, FakePlatform::missing(), RecordingAudio::default());

    let delivery = dispatcher.notify_message("general", MessageKind::Text, "hi", None);

    assert_eq!(delivery, Delivery::Suppressed);
    assert!(platform.shown().is_empty());
}

#[test]
fn sound_plays_the_tone() {
    let (store, _, _) = memory_store();
    store
        .save(&Settings {
            sound: true,
            ..Default::default()
        })
        .unwrap();
    let (dispatcher, platform, audio) = dispatcher(&store, granted(), RecordingAudio::default());

    let delivery = dispatcher.notify_message("general", MessageKind::PrivateText, "x", None);

    assert_eq!(delivery, Delivery::Sound);
    assert_eq!(audio.plays(), 1);
    assert!(platform.shown().is_empty());
}

#[test]
fn audio_failure_does_not_propagate() {
    let (store, _, _) = memory_store();
    store
        .save(&Settings {
            sound: true,
            ..Default::default()
        })
        .unwrap();
    let audio = RecordingAudio {
        fail: true,
        ..Default::default()
    };
    let (dispatcher, _, audio) = dispatcher(&store, granted(), audio);

    let delivery = dispatcher.notify_message("general", MessageKind::Text, "x", None);

    assert_eq!(delivery, Delivery::Sound);
    assert_eq!(audio.plays(), 1);
}

#[test]
fn stored_record_with_both_toggles_prefers_desktop() {
    let (store, _, _) = memory_store();
    store
        .save(&Settings {
            notify: true,
            sound: true,
            language: None,
        })
        .unwrap();
    let (dispatcher, _, audio) = dispatcher(&store, granted(), RecordingAudio::default());

    let delivery = dispatcher.notify_message("r", MessageKind::PrivateImage, "payload", None);

    assert_eq!(
        delivery,
        Delivery::Desktop {
            title: String::from("#r"),
            body: String::from("(Private)[image]"),
        }
    );
    assert_eq!(audio.plays(), 0);
}

#[test]
fn long_text_is_truncated_in_the_body() {
    let (store, _, _) = memory_store();
    store
        .save(&Settings {
            notify: true,
            ..Default::default()
        })
        .unwrap();
    let (dispatcher, _, _) = dispatcher(&store, granted(), RecordingAudio::default());
    let text = "z".repeat(150);

    let delivery = dispatcher.notify_message("r", MessageKind::Text, &text, None);

    assert_eq!(
        delivery,
        Delivery::Desktop {
            title: String::from("#r"),
            body: format!("{}...", "z".repeat(100)),
        }
    );
}
