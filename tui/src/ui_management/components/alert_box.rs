use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};

use super::{Component, ComponentRender};

const ALERT_WIDTH: u16 = 50;
const ALERT_HEIGHT: u16 = 7;

/// Blocking alert, the terminal stand-in for `window.alert`
pub struct AlertBox {
    action_tx: UnboundedSender<Action>,
    text: Option<String>,
}

impl AlertBox {
    pub fn is_shown(&self) -> bool {
        self.text.is_some()
    }
}

impl Component for AlertBox {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        AlertBox {
            action_tx,
            text: None,
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self {
        AlertBox {
            text: state.alert.clone(),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Alert"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            let _ = self.action_tx.send(Action::DismissAlert);
        }
    }
}

/// Centers a `width` x `height` rectangle inside `area`, shrinking it to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl ComponentRender<()> for AlertBox {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let Some(text) = self.text.as_ref() else {
            return;
        };

        let area = centered_rect(ALERT_WIDTH, ALERT_HEIGHT, frame.size());

        let body = Paragraph::new(Text::from(vec![
            Line::from(text.as_str()),
            Line::from(""),
            Line::from(vec!["Press ".into(), "<Enter>".bold(), " to dismiss.".into()]),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::new().fg(Color::Red))
                .title("Alert"),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(body, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 30, 5);

        assert_eq!(centered_rect(50, 7, area), area);
        assert_eq!(
            centered_rect(10, 3, Rect::new(2, 2, 30, 9)),
            Rect::new(12, 5, 10, 3)
        );
    }
}
