use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::App;
use crate::mode::Accent;
use crate::session::{CharState, Phase, Session};
use crate::theme::Theme;

/// The target text with per-character classification coloring. All the
/// classification logic lives in the session; this only maps states to
/// styles.
pub struct TypingArea<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn border_color(&self) -> Color {
        let colors = &self.theme.colors;
        match self.session.phase {
            Phase::Finished { success: true } => colors.success(),
            Phase::Finished { success: false } => colors.danger(),
            _ => match self.session.mode.accent() {
                Accent::Danger => colors.danger(),
                Accent::Normal => colors.border(),
            },
        }
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let cursor_bg = match self.session.mode.accent() {
            Accent::Danger => colors.danger(),
            Accent::Normal => colors.text_cursor_bg(),
        };

        let spans: Vec<Span> = self
            .session
            .cells()
            .into_iter()
            .map(|cell| {
                let style = match cell.state {
                    CharState::Correct => Style::default().fg(colors.text_correct()),
                    CharState::Incorrect => Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED),
                    CharState::Cursor => {
                        Style::default().fg(colors.text_cursor_fg()).bg(cursor_bg)
                    }
                    CharState::Untouched => Style::default().fg(colors.text_pending()),
                };
                Span::styled(cell.ch.to_string(), style)
            })
            .collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(self.border_color()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let status = match app.last_summary {
        Some(summary) => {
            let verdict = if summary.success { "Complete" } else { "Failed" };
            format!(
                "FINISH | {verdict} | WPM: {} | ACC: {}%",
                summary.wpm, summary.accuracy
            )
        }
        None => app.session.snapshot().status,
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", app.mode.label()),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    frame.render_widget(TypingArea::new(&app.session, &app.theme), layout[1]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [Tab] Restart  [1] Words [2] Quote [3] Timed [4] Death [5] Drill  [Esc] Quit ",
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, layout[2]);
}
