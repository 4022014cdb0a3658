use crossterm::event::KeyEvent;
use ratatui::{prelude::Backend, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};

use self::{chat_page::ChatPage, settings_panel::SettingsPanel};

use super::components::{alert_box::AlertBox, Component, ComponentRender};

mod chat_page;
mod settings_panel;

/// Layers the settings overlay and the alert over the chat page.
///
/// Keys go to the topmost visible layer.
pub struct AppRouter {
    chat_page: ChatPage,
    settings_panel: SettingsPanel,
    alert_box: AlertBox,
}

impl AppRouter {
    fn get_active_component(&self) -> &dyn Component {
        if self.alert_box.is_shown() {
            &self.alert_box
        } else if self.settings_panel.is_open() {
            &self.settings_panel
        } else {
            &self.chat_page
        }
    }

    fn get_active_component_mut(&mut self) -> &mut dyn Component {
        if self.alert_box.is_shown() {
            &mut self.alert_box
        } else if self.settings_panel.is_open() {
            &mut self.settings_panel
        } else {
            &mut self.chat_page
        }
    }
}

impl Component for AppRouter {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            chat_page: ChatPage::new(state, action_tx.clone()),
            settings_panel: SettingsPanel::new(state, action_tx.clone()),
            alert_box: AlertBox::new(state, action_tx),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            chat_page: self.chat_page.move_with_state(state),
            settings_panel: self.settings_panel.move_with_state(state),
            alert_box: self.alert_box.move_with_state(state),
        }
    }

    // route all functions to the active layer
    fn name(&self) -> &str {
        self.get_active_component().name()
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        self.get_active_component_mut().handle_key_event(key)
    }

    fn tick(&mut self) {
        self.settings_panel.tick();
    }
}

impl ComponentRender<()> for AppRouter {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: ()) {
        self.chat_page.render(frame, props);
        self.settings_panel.render(frame, props);
        self.alert_box.render(frame, props);
    }
}
