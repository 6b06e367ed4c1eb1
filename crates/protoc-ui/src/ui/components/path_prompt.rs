//! Directory prompt overlay used in place of a native folder picker.

use std::fs;
use std::path::PathBuf;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::domain::model::DialogOutcome;

/// Which selection the prompt will fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTarget {
    InputDirectory,
    OutputDirectory,
}

impl PromptTarget {
    fn title(self) -> &'static str {
        match self {
            PromptTarget::InputDirectory => "Protoc files directory",
            PromptTarget::OutputDirectory => "Output files directory",
        }
    }
}

/// Interactive state backing the prompt overlay.
#[derive(Debug, Default, Clone)]
pub struct PathPromptState {
    target: Option<PromptTarget>,
    input: String,
}

impl PathPromptState {
    /// Reveal the prompt with an initial path prefilled.
    pub fn open<S: Into<String>>(&mut self, target: PromptTarget, initial: S) {
        self.target = Some(target);
        self.input = initial.into();
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<PromptTarget> {
        self.target
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Close the prompt, resolving whatever was typed.
    pub fn submit(&mut self) -> Option<(PromptTarget, DialogOutcome)> {
        let target = self.target.take()?;
        let input = std::mem::take(&mut self.input);
        Some((target, resolve_directory(&input)))
    }

    /// Close the prompt without choosing anything.
    pub fn cancel(&mut self) -> Option<(PromptTarget, DialogOutcome)> {
        let target = self.target.take()?;
        self.input.clear();
        Some((target, DialogOutcome::Cancelled))
    }
}

/// Interpret typed text as a directory choice.
///
/// Blank input cancels. A leading `~` expands to the home directory. Anything that is not an
/// existing directory is a failure carrying the reason.
pub fn resolve_directory(raw: &str) -> DialogOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DialogOutcome::Cancelled;
    }

    let path = expand_home(trimmed);
    match fs::canonicalize(&path) {
        Ok(resolved) if resolved.is_dir() => DialogOutcome::Selected(resolved),
        Ok(resolved) => {
            DialogOutcome::Failed(format!("{} is not a directory", resolved.display()))
        }
        Err(err) => DialogOutcome::Failed(format!("{}: {err}", path.display())),
    }
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(raw),
    };
    match dirs_next::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

/// Visual component that renders the prompt overlay.
#[derive(Debug, Default)]
pub struct PathPrompt;

impl PathPrompt {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &PathPromptState) {
        let Some(target) = state.target() else {
            return;
        };

        let width = area.width.saturating_sub(10).min(90);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height.saturating_sub(7) / 2,
            width,
            height: 5.min(area.height),
        };

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(target.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(block.clone(), popup);

        let inner = block.inner(popup);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let prompt = Paragraph::new(format!("› {}", state.input()))
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false });
        frame.render_widget(prompt, layout[0]);

        let hint = Paragraph::new("enter select · esc cancel")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, layout[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn blank_input_cancels() {
        assert_eq!(resolve_directory("   "), DialogOutcome::Cancelled);
    }

    #[test]
    fn existing_directory_is_selected() {
        let temp = tempfile::tempdir().unwrap();
        let expected = fs::canonicalize(temp.path()).unwrap();
        let raw = format!("  {}  ", temp.path().display());
        assert_eq!(resolve_directory(&raw), DialogOutcome::Selected(expected));
    }

    #[test]
    fn missing_path_and_files_fail_without_panicking() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing");
        assert!(matches!(
            resolve_directory(&missing.display().to_string()),
            DialogOutcome::Failed(_)
        ));

        let file = temp.path().join("a.proto");
        fs::write(&file, "").unwrap();
        match resolve_directory(&file.display().to_string()) {
            DialogOutcome::Failed(reason) => assert!(reason.contains("is not a directory")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs_next::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/protos"), home.join("protos"));
        }
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn submit_and_cancel_close_the_prompt() {
        let mut state = PathPromptState::default();
        state.open(PromptTarget::OutputDirectory, "");
        assert!(state.is_open());
        assert_eq!(
            state.cancel(),
            Some((PromptTarget::OutputDirectory, DialogOutcome::Cancelled))
        );
        assert!(!state.is_open());
        assert_eq!(state.submit(), None);
    }

    #[test]
    fn renders_only_when_open() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = PathPromptState::default();
        state.open(PromptTarget::InputDirectory, "/tmp/protos");

        terminal
            .draw(|frame| {
                let area = frame.size();
                PathPrompt.render(frame, area, &state);
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Protoc files directory"));
        assert!(screen.contains("/tmp/protos"));
    }
}
