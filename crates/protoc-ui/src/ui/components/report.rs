//! Pane showing validation errors and compiler output.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::app::format::render_report;
use crate::domain::model::ExecutionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Running,
    Succeeded,
    Failed,
    Invalid,
}

/// Holds the text of the most recent generation attempt.
#[derive(Debug, Default)]
pub struct Report {
    text: String,
    kind: Option<ReportKind>,
    finished_at: Option<OffsetDateTime>,
    scroll: u16,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> Option<ReportKind> {
        self.kind
    }

    /// Show accumulated validation messages.
    pub fn show_invalid(&mut self, messages: String) {
        self.set(ReportKind::Invalid, messages);
    }

    /// Show the command line of a generation that has just started.
    pub fn show_running(&mut self, command: String) {
        self.set(ReportKind::Running, command);
        self.finished_at = None;
    }

    /// Show the formatted output of a finished generation.
    pub fn show_result(&mut self, result: &ExecutionResult, wrap_width: usize) {
        let mut text = render_report(result, wrap_width);
        let kind = match &result.exit_error {
            Some(reason) => {
                text.push_str(&format!("\n{reason}"));
                ReportKind::Failed
            }
            None => ReportKind::Succeeded,
        };
        self.set(kind, text);
    }

    /// Show a non-compiler failure such as a directory that cannot be read.
    pub fn show_error(&mut self, message: String) {
        self.set(ReportKind::Failed, message);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn set(&mut self, kind: ReportKind, text: String) {
        self.kind = Some(kind);
        self.text = text;
        self.scroll = 0;
        self.finished_at = Some(OffsetDateTime::now_utc());
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let (title, color) = match self.kind {
            Some(ReportKind::Running) => ("Generating…", Color::Yellow),
            Some(ReportKind::Succeeded) => ("Generated", Color::Green),
            Some(ReportKind::Failed) => ("Failed", Color::Red),
            Some(ReportKind::Invalid) => ("Not ready", Color::Red),
            None => ("Result", Color::DarkGray),
        };
        let title = match self.finished_at.and_then(|at| {
            at.format(format_description!("[hour]:[minute]:[second] UTC"))
                .ok()
        }) {
            Some(stamp) => format!("{title} · {stamp}"),
            None => title.to_string(),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let body = if self.text.is_empty() {
            Paragraph::new("Press g to generate").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.text.as_str())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0))
        };
        frame.render_widget(body.block(block), area);
    }
}
