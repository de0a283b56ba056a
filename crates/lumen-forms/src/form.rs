//! Generic form: focusable fields, a submit action and a back callback.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lumen_core::DisplayMode;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

use crate::field::TextField;
use crate::request::SimulatedRequest;

/// Braille spinner shown while a submission is pending.
const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const SPINNER_FRAME_MS: u64 = 80;

const PANEL_WIDTH: u16 = 52;

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// The key had no effect (including any key while a submission is pending).
    Ignored,
    Edited,
    FocusMoved,
    /// A simulated submission started.
    Submitted,
    /// The back callback ran.
    Back,
}

/// Form text and actions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FormText {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub action: &'static str,
    pub pending_action: &'static str,
}

/// Colors for the form panel.
#[derive(Debug, Clone, Copy)]
struct FormPalette {
    panel: Color,
    text: Color,
    accent: Color,
    muted: Color,
}

impl FormPalette {
    fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Dark => Self {
                panel: Color::Rgb(15, 23, 42),
                text: Color::Rgb(226, 232, 240),
                accent: Color::Rgb(34, 211, 238),
                muted: Color::Rgb(100, 116, 139),
            },
            DisplayMode::Light => Self {
                panel: Color::Rgb(255, 255, 255),
                text: Color::Rgb(15, 23, 42),
                accent: Color::Rgb(2, 132, 199),
                muted: Color::Rgb(148, 163, 184),
            },
        }
    }
}

/// A form whose submission is simulated.
///
/// While a submission is pending the form is disabled: every key is
/// ignored, so the back callback runs exactly once per submission.
pub struct Form {
    text: FormText,
    fields: Vec<TextField>,
    focus: usize,
    request: SimulatedRequest,
    on_back: Box<dyn FnMut()>,
    mode: DisplayMode,
    last_tick_ms: u64,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("title", &self.text.title)
            .field("fields", &self.fields)
            .field("focus", &self.focus)
            .field("request", &self.request)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Form {
    pub(crate) fn new(
        text: FormText,
        fields: Vec<TextField>,
        submit_delay_ms: u64,
        on_back: impl FnMut() + 'static,
    ) -> Self {
        Self {
            text,
            fields,
            focus: 0,
            request: SimulatedRequest::new(submit_delay_ms),
            on_back: Box::new(on_back),
            mode: DisplayMode::default(),
            last_tick_ms: 0,
        }
    }

    /// Index of the focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub(crate) fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(TextField::value).unwrap_or_default()
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, key: KeyEvent, now_ms: u64) -> FormEvent {
        if self.request.is_pending() {
            return FormEvent::Ignored;
        }
        match key.code {
            KeyCode::Esc => {
                tracing::debug!(form = self.text.title, "back requested");
                (self.on_back)();
                FormEvent::Back
            }
            KeyCode::Enter => {
                if self.submit(now_ms) {
                    FormEvent::Submitted
                } else {
                    FormEvent::Ignored
                }
            }
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(self.fields.len().saturating_sub(1)),
            KeyCode::Backspace => match self.fields.get_mut(self.focus) {
                Some(field) => {
                    field.backspace();
                    FormEvent::Edited
                }
                None => FormEvent::Ignored,
            },
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                match self.fields.get_mut(self.focus) {
                    Some(field) => {
                        field.push(c);
                        FormEvent::Edited
                    }
                    None => FormEvent::Ignored,
                }
            }
            _ => FormEvent::Ignored,
        }
    }

    /// Start a simulated submission. Returns false while one is pending.
    pub fn submit(&mut self, now_ms: u64) -> bool {
        if !self.request.start(now_ms) {
            return false;
        }
        tracing::info!(
            form = self.text.title,
            delay_ms = self.request.delay_ms(),
            "submission started"
        );
        true
    }

    /// Advance time. Completes a pending submission once its delay has
    /// elapsed, running the back callback. Returns whether it completed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.last_tick_ms = now_ms;
        if self.request.poll(now_ms) {
            tracing::info!(form = self.text.title, "submission completed");
            (self.on_back)();
            return true;
        }
        false
    }

    /// Milliseconds until a pending submission completes.
    pub fn time_until_complete(&self, now_ms: u64) -> Option<u64> {
        self.request.remaining_ms(now_ms)
    }

    fn move_focus(&mut self, step: usize) -> FormEvent {
        if self.fields.is_empty() {
            return FormEvent::Ignored;
        }
        self.focus = (self.focus + step) % self.fields.len();
        FormEvent::FocusMoved
    }

    fn action_line(&self, palette: &FormPalette) -> Line<'static> {
        let line = if self.request.is_pending() {
            let frame = (self.last_tick_ms / SPINNER_FRAME_MS) as usize % SPINNER.len();
            Line::from(vec![
                Span::styled(SPINNER[frame].to_string(), Style::new().fg(palette.accent)),
                Span::styled(
                    format!(" {}", self.text.pending_action),
                    Style::new().fg(palette.muted),
                ),
            ])
        } else {
            Line::from(Span::styled(
                format!("[ {} ]", self.text.action),
                Style::new()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        line.centered()
    }
}

impl Widget for &Form {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = FormPalette::for_mode(self.mode);
        let height = self.fields.len() as u16 * 3 + 8;
        let width = PANEL_WIDTH.min(area.width);
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, panel, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .areas(middle);

        Clear.render(panel, buf);
        let block = Block::bordered()
            .title(Line::from(format!(" {} ", self.text.title)).centered())
            .border_style(Style::new().fg(palette.accent))
            .style(Style::new().bg(palette.panel).fg(palette.text));
        let inner = block.inner(panel);
        block.render(panel, buf);

        let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
        for _ in &self.fields {
            constraints.extend([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ]);
        }
        constraints.extend([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ]);
        let rows = Layout::vertical(constraints).split(inner);

        Paragraph::new(self.text.subtitle)
            .style(Style::new().fg(palette.muted))
            .alignment(Alignment::Center)
            .render(rows[0], buf);

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus && !self.request.is_pending();
            let label_style = if focused {
                Style::new().fg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::new().fg(palette.text)
            };
            let value_style = if field.value().is_empty() {
                Style::new().fg(palette.muted)
            } else {
                Style::new().fg(palette.text)
            };
            let marker = if focused { "› " } else { "  " };
            let mut value = vec![
                Span::styled(marker, Style::new().fg(palette.accent)),
                Span::styled(field.display(), value_style),
            ];
            if focused {
                value.push(Span::styled("▏", Style::new().fg(palette.accent)));
            }

            let row = 2 + i * 3;
            Paragraph::new(Line::from(Span::styled(field.label(), label_style)))
                .render(rows[row], buf);
            Paragraph::new(Line::from(value)).render(rows[row + 1], buf);
        }

        let action_row = 2 + self.fields.len() * 3;
        Paragraph::new(self.action_line(&palette)).render(rows[action_row], buf);

        Paragraph::new("tab next · enter submit · esc back")
            .style(Style::new().fg(palette.muted))
            .alignment(Alignment::Center)
            .render(rows[action_row + 2], buf);
    }
}
