use settings::notification::MessageKind;

#[derive(Debug, Clone)]
pub enum Action {
    /// Terminal was resized or first measured
    Resize { columns: u16 },
    OpenSettings,
    CloseSettings,
    /// The closing slide animation reached its end
    PanelTransitionEnd,
    ToggleSidebar,
    ToggleNotify { enabled: bool },
    ToggleSound { enabled: bool },
    SelectLanguage { code: String },
    DismissAlert,
    /// Feeds a sample message of the given kind through the notification dispatcher
    SimulateMessage { kind: MessageKind },
    Exit,
}
