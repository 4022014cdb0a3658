/// Terminal bell standing in for an audio device
pub mod bell;
/// Desktop notifications through the system notification daemon
pub mod desktop;

pub use bell::{BellReceiver, TerminalBell};
pub use desktop::DesktopNotifications;
