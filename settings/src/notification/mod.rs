use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{i18n::Translator, store::SettingsStore};

pub mod platform;
pub mod sound;

use platform::NotificationPlatform;
use sound::{AudioOutput, ToneCue};

/// Longest text shown in a notification body before it is cut
pub const MAX_NOTIFY_TEXT_LEN: usize = 100;

const ELLIPSIS: &str = "...";

/// Kind of chat message, as labelled by the message pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "private text")]
    PrivateText,
    #[serde(rename = "private image")]
    PrivateImage,
    /// Anything else, e.g. system messages
    #[serde(other)]
    Other,
}

impl MessageKind {
    pub fn is_image(&self) -> bool {
        matches!(self, MessageKind::Image | MessageKind::PrivateImage)
    }

    pub fn is_private(&self) -> bool {
        matches!(self, MessageKind::PrivateText | MessageKind::PrivateImage)
    }
}

/// A message that just arrived in a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(rename = "roomName")]
    pub room_name: String,
    #[serde(rename = "msgType")]
    pub kind: MessageKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// What the dispatcher did with a message
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Desktop { title: String, body: String },
    Sound,
    /// Desktop notifications are on but the system would not display one
    Suppressed,
    /// Both notification kinds are off
    Muted,
}

/// Cuts `text` to [MAX_NOTIFY_TEXT_LEN] characters, marking the cut with `...`
pub fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(MAX_NOTIFY_TEXT_LEN) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => String::from(text),
    }
}

pub fn notification_title(room_name: &str) -> String {
    format!("#{room_name}")
}

/// Builds the body of a desktop notification for `message`
pub fn notification_body(translator: &dyn Translator, message: &IncomingMessage) -> String {
    let content = match message.kind {
        MessageKind::Other => return truncate_text(&message.text),
        kind if kind.is_image() => translator.translate("notification.image", "[image]"),
        _ => truncate_text(&message.text),
    };

    let sender_prefix = message
        .sender
        .as_deref()
        .filter(|sender| !sender.is_empty())
        .map(|sender| format!("{sender}:"))
        .unwrap_or_default();

    let private_marker = if message.kind.is_private() {
        translator.translate("notification.private", "(Private)")
    } else {
        String::new()
    };

    format!("{private_marker}{sender_prefix}{content}")
}

/// Turns incoming messages into a desktop notification or a tone, following the stored settings
#[derive(Clone)]
pub struct Dispatcher {
    store: SettingsStore,
    platform: Arc<dyn NotificationPlatform>,
    audio: Arc<dyn AudioOutput>,
    cue: ToneCue,
}

impl Dispatcher {
    pub fn new(
        store: SettingsStore,
        platform: Arc<dyn NotificationPlatform>,
        audio: Arc<dyn AudioOutput>,
    ) -> Self {
        Dispatcher {
            store,
            platform,
            audio,
            cue: ToneCue::default(),
        }
    }

    pub fn notify_message(
        &self,
        room_name: &str,
        kind: MessageKind,
        text: &str,
        sender: Option<&str>,
    ) -> Delivery {
        self.dispatch(&IncomingMessage {
            room_name: String::from(room_name),
            kind,
            text: String::from(text),
            sender: sender.map(String::from),
        })
    }

    /// Never requests permission; a desktop notification is only shown when it was already granted
    pub fn dispatch(&self, message: &IncomingMessage) -> Delivery {
        let settings = self.store.load();

        if settings.notify {
            self.show_desktop_notification(message)
        } else if settings.sound {
            self.play_sound();
            Delivery::Sound
        } else {
            Delivery::Muted
        }
    }

    fn show_desktop_notification(&self, message: &IncomingMessage) -> Delivery {
        if !self.platform.can_show() {
            tracing::debug!("desktop notification skipped, service unavailable or not granted");
            return Delivery::Suppressed;
        }

        let title = notification_title(&message.room_name);
        let body = notification_body(self.store.translator().as_ref(), message);

        if let Err(err) = self.platform.show(&title, &body) {
            tracing::warn!("desktop notification failed: {err}");
            return Delivery::Suppressed;
        }

        Delivery::Desktop { title, body }
    }

    fn play_sound(&self) {
        if let Err(err) = self.audio.play(&self.cue) {
            tracing::error!("sound notification failed: {err:#}");
        }
    }
}
