use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use settings::{overlay::LayoutMode, panel::PanelView};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state_store::{action::Action, State},
    ui_management::components::{
        usage::{widget_usage_to_text, HasUsageInfo, UsageInfo, UsageInfoLine},
        Component, ComponentRender,
    },
};

/// Duration of the slide in / slide out animation
const TRANSITION: Duration = Duration::from_millis(300);
const DESKTOP_PANEL_WIDTH: u16 = 44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Notify,
    Sound,
    Language,
}

impl Row {
    const ALL: [Row; 3] = [Row::Notify, Row::Sound, Row::Language];

    fn next(self) -> Row {
        let idx = Row::ALL.iter().position(|row| *row == self).unwrap_or(0);
        Row::ALL[(idx + 1) % Row::ALL.len()]
    }

    fn previous(self) -> Row {
        let idx = Row::ALL.iter().position(|row| *row == self).unwrap_or(0);
        Row::ALL[(idx + Row::ALL.len() - 1) % Row::ALL.len()]
    }
}

struct Props {
    view: PanelView,
    displayed: bool,
    open: bool,
    mode: LayoutMode,
    awaiting_permission: bool,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            view: state.panel.clone(),
            displayed: state.overlay.is_displayed(),
            open: state.overlay.is_open(),
            mode: state.overlay.mode(),
            awaiting_permission: state.awaiting_permission,
        }
    }
}

/// The sliding settings overlay
pub struct SettingsPanel {
    action_tx: UnboundedSender<Action>,
    props: Props,
    // Internal State
    selected: Row,
    /// 0.0 fully out, 1.0 fully in
    slide: f32,
    last_tick: Instant,
    /// PanelTransitionEnd was sent for the current close
    transition_end_sent: bool,
}

impl SettingsPanel {
    pub fn is_open(&self) -> bool {
        self.props.open
    }

    fn language_codes(&self) -> Vec<&'static str> {
        self.props
            .view
            .language
            .options
            .iter()
            .map(|option| option.code)
            .collect()
    }

    /// Language next to the selected one, wrapping around
    fn cycle_language(&self, forward: bool) -> Option<&'static str> {
        let codes = self.language_codes();
        if codes.is_empty() {
            return None;
        }

        let current = self
            .props
            .view
            .language
            .options
            .iter()
            .position(|option| option.selected);
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(idx), true) => (idx + 1) % codes.len(),
            (Some(idx), false) => (idx + codes.len() - 1) % codes.len(),
        };

        Some(codes[next])
    }

    fn select_language(&self, forward: bool) {
        if let Some(code) = self.cycle_language(forward) {
            let _ = self.action_tx.send(Action::SelectLanguage {
                code: String::from(code),
            });
        }
    }

    fn activate_selected(&self) {
        let action = match self.selected {
            Row::Notify if self.props.awaiting_permission => return,
            Row::Notify => Action::ToggleNotify {
                enabled: !self.props.view.notify.checked,
            },
            Row::Sound => Action::ToggleSound {
                enabled: !self.props.view.sound.checked,
            },
            Row::Language => return self.select_language(true),
        };

        let _ = self.action_tx.send(action);
    }
}

impl Component for SettingsPanel {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        let props = Props::from(state);
        let slide = if props.open { 1.0 } else { 0.0 };

        SettingsPanel {
            action_tx,
            props,
            selected: Row::Notify,
            slide,
            last_tick: Instant::now(),
            transition_end_sent: false,
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        let props = Props::from(state);
        let reopened = props.open && !self.props.open;

        SettingsPanel {
            props,
            transition_end_sent: if reopened {
                false
            } else {
                self.transition_end_sent
            },
            ..self
        }
    }

    fn name(&self) -> &str {
        "Settings Panel"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::BackTab => self.selected = self.selected.previous(),
            KeyCode::Down | KeyCode::Tab => self.selected = self.selected.next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selected(),
            KeyCode::Left if self.selected == Row::Language => self.select_language(false),
            KeyCode::Right if self.selected == Row::Language => self.select_language(true),
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::CloseSettings);
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let step = now.duration_since(self.last_tick).as_secs_f32() / TRANSITION.as_secs_f32();
        self.last_tick = now;

        if self.props.open {
            self.slide = (self.slide + step).min(1.0);
            return;
        }

        self.slide = (self.slide - step).max(0.0);
        if self.slide == 0.0 && self.props.displayed && !self.transition_end_sent {
            self.transition_end_sent = true;
            let _ = self.action_tx.send(Action::PanelTransitionEnd);
        }
    }
}

fn toggle_span<'a>(checked: bool, pending: bool, row_style: Style) -> Span<'a> {
    let (text, style) = match (checked, pending) {
        (_, true) => ("[ … ]", Style::default().fg(Color::Yellow)),
        (true, false) => (
            "[ ON ]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (false, false) => ("[ OFF ]", Style::default().fg(Color::DarkGray)),
    };

    Span::styled(text, row_style.patch(style))
}

impl SettingsPanel {
    fn panel_area(&self, area: Rect) -> Rect {
        let width = match self.props.mode {
            LayoutMode::Mobile => area.width,
            LayoutMode::Desktop => DESKTOP_PANEL_WIDTH.min(area.width),
        };
        let visible = ((f32::from(width) * self.slide).round() as u16).min(width);

        Rect::new(area.x + area.width - visible, area.y, visible, area.height)
    }

    fn row_style(&self, row: Row) -> Style {
        if self.selected == row {
            // yellow that would work for both dark / light modes
            Style::default()
                .bg(Color::Rgb(255, 223, 102))
                .fg(Color::Black)
        } else {
            Style::default()
        }
    }
}

impl ComponentRender<()> for SettingsPanel {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        if !self.props.displayed {
            return;
        }

        let area = self.panel_area(frame.size());
        if area.width < 3 {
            return;
        }

        let view = &self.props.view;
        let selected_language = view
            .language
            .options
            .iter()
            .find(|option| option.selected)
            .map(|option| option.label)
            .unwrap_or("-");

        let notify_style = self.row_style(Row::Notify);
        let sound_style = self.row_style(Row::Sound);
        let language_style = self.row_style(Row::Language);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{} ", view.notify.label), notify_style),
                toggle_span(
                    view.notify.checked,
                    self.props.awaiting_permission,
                    notify_style,
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{} ", view.sound.label), sound_style),
                toggle_span(view.sound.checked, false, sound_style),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{} ", view.language.label), language_style),
                Span::styled(
                    format!("< {selected_language} >"),
                    language_style.add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];
        lines.extend(widget_usage_to_text(self.usage_info()).lines);

        let panel = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::new().fg(Color::Yellow))
                    .title(view.title.clone()),
            );

        frame.render_widget(Clear, area);
        frame.render_widget(panel, area);
    }
}

impl HasUsageInfo for SettingsPanel {
    fn usage_info(&self) -> UsageInfo {
        UsageInfo {
            description: None,
            lines: vec![
                UsageInfoLine::new(&["↑", "↓"], "to move"),
                UsageInfoLine::new(&["Enter", "Space"], "to switch"),
                UsageInfoLine::new(&["←", "→"], "to change language"),
                UsageInfoLine::new(&["Esc"], "to close"),
            ],
        }
    }
}
