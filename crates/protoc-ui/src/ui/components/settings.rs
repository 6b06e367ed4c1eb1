//! Output directory and language panel.

use std::path::Path;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::selection::SelectionState;

/// Shows where output goes, which generator runs, and the compiler in use.
#[derive(Debug, Default)]
pub struct Settings;

impl Settings {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        selection: &SelectionState,
        protoc: &Path,
    ) {
        let block = Block::default().title("Output").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);

        let label = Style::default().fg(Color::Gray);
        let unset = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);

        let directory = match selection.output_directory() {
            Some(dir) => Span::styled(dir.to_string(), Style::default().fg(Color::Cyan)),
            None => Span::styled("(select output directory)", unset),
        };

        let flag = selection.output_flag();
        let language = match selection.output_language() {
            Some(lang) if !flag.is_empty() => vec![
                Span::styled("◂ ", label),
                Span::styled(
                    lang.to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" ▸", label),
                Span::styled(format!("  {flag}"), Style::default().fg(Color::DarkGray)),
            ],
            _ => vec![Span::styled("(press [ or ] to choose)", unset)],
        };

        let mut language_line = vec![Span::styled("Output language", label), Span::raw(": ")];
        language_line.extend(language);

        let lines = vec![
            Line::from(vec![
                Span::styled("Directory", label),
                Span::raw(": "),
                directory,
            ]),
            Line::from(language_line),
            Line::from(vec![
                Span::styled("Compiler", label),
                Span::raw(": "),
                Span::raw(protoc.display().to_string()),
            ]),
        ];

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }),
            block.inner(area),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(selection: &SelectionState) -> String {
        let backend = TestBackend::new(70, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                Settings.render(frame, area, selection, Path::new("/usr/bin/protoc"));
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_placeholders_when_unset() {
        let rendered = screen(&SelectionState::new());
        assert!(rendered.contains("(select output directory)"));
        assert!(rendered.contains("(press [ or ] to choose)"));
        assert!(rendered.contains("/usr/bin/protoc"));
    }

    #[test]
    fn renders_language_and_flag() {
        let mut selection = SelectionState::new();
        selection.set_output_directory("/gen");
        selection.set_output_language("Golang");
        let rendered = screen(&selection);
        assert!(rendered.contains("/gen"));
        assert!(rendered.contains("Golang"));
        assert!(rendered.contains("--go_out"));
    }
}
