//! Application loop for the TUI.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::app::command;
use crate::app::generate::GenerateRequest;
use crate::app::job::JobSlot;
use crate::app::language::Language;
use crate::app::runner::{CommandRunner, ProcessRunner};
use crate::app::scan::{Scanner, ScannerConfig};
use crate::app::selection::SelectionState;
use crate::domain::errors::{DomainError, join_messages};
use crate::domain::model::DialogOutcome;
use crate::infra::config::Config;
use crate::infra::protoc;
use crate::ui::components::file_list::{FileList, FileListState};
use crate::ui::components::path_prompt::{
    PathPrompt, PathPromptState, PromptTarget, resolve_directory,
};
use crate::ui::components::report::Report;
use crate::ui::components::settings::Settings;

const TICK_RATE: Duration = Duration::from_millis(120);
const SCROLL_STEP: u16 = 5;

/// Primary entry point for running the interactive TUI.
pub struct UiApp {
    config: Config,
    scanner: Scanner,
    runner: Arc<dyn CommandRunner>,
    protoc: PathBuf,
    selection: SelectionState,
    files: FileListState,
    file_list: FileList,
    prompt: PathPromptState,
    prompt_component: PathPrompt,
    settings: Settings,
    report: Report,
    jobs: JobSlot,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl UiApp {
    /// Build the UI, applying any directories or language chosen on the command line.
    pub fn new(config: Config, presets: GenerateRequest) -> Self {
        let protoc = protoc::locate(presets.protoc.as_deref(), &config);
        Self::with_runner(config, presets, protoc, Arc::new(ProcessRunner::new()))
    }

    fn with_runner(
        config: Config,
        presets: GenerateRequest,
        protoc: PathBuf,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        let mut app = Self {
            config,
            scanner: Scanner::new(),
            runner,
            protoc,
            selection: SelectionState::new(),
            files: FileListState::default(),
            file_list: FileList,
            prompt: PathPromptState::default(),
            prompt_component: PathPrompt,
            settings: Settings,
            report: Report::new(),
            jobs: JobSlot::new(),
            status: None,
            should_quit: false,
        };
        app.apply_presets(presets);
        app
    }

    fn apply_presets(&mut self, presets: GenerateRequest) {
        match presets.language {
            Some(language) => self.selection.set_output_language(language.label()),
            None => {
                if let Some(label) = self.config.defaults.language() {
                    self.selection.set_output_language(label);
                }
            }
        }
        if let Some(input) = presets.input {
            let outcome = resolve_directory(&input.display().to_string());
            self.handle_dialog(PromptTarget::InputDirectory, outcome);
        }
        if let Some(output) = presets.output {
            let outcome = resolve_directory(&output.display().to_string());
            self.handle_dialog(PromptTarget::OutputDirectory, outcome);
        }
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.should_quit {
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(ev);
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(size);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[0]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(main_chunks[1]);

        self.file_list.render(
            frame,
            main_chunks[0],
            &self.files,
            &self.selection,
            !self.prompt.is_open(),
        );
        self.settings
            .render(frame, right_chunks[0], &self.selection, &self.protoc);
        self.report.render(frame, right_chunks[1]);

        let key = Style::default().fg(Color::Cyan);
        let hints = Paragraph::new(Line::from(vec![
            Span::styled("i", key),
            Span::raw(" input dir · "),
            Span::styled("o", key),
            Span::raw(" output dir · "),
            Span::styled("[ ]", key),
            Span::raw(" language · "),
            Span::styled("space", key),
            Span::raw(" toggle · "),
            Span::styled("a", key),
            Span::raw(" all · "),
            Span::styled("g", key),
            Span::raw(" generate · "),
            Span::styled("q", key),
            Span::raw(" quit"),
        ]))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(hints, right_chunks[2]);

        self.render_status(frame, layout[1]);
        self.prompt_component.render(frame, size, &self.prompt);
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let message = self.status.as_ref().map(|status| {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::Gray),
                StatusLevel::Success => Style::default().fg(Color::Green),
                StatusLevel::Error => Style::default().fg(Color::Red),
            };
            Line::styled(status.text.clone(), style)
        });

        let line = message.unwrap_or_else(|| {
            let text = match self.jobs.current() {
                Some(job) => format!(
                    "Running {} · {}s",
                    job.invocation().program.display(),
                    job.elapsed().as_secs()
                ),
                None => "Ready".to_string(),
            };
            Line::styled(text, Style::default().fg(Color::DarkGray))
        });
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::NONE)),
            area,
        );
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }

        if let Some(result) = self.jobs.poll() {
            self.report
                .show_result(&result, self.config.defaults.wrap_width());
            match &result.exit_error {
                Some(reason) => {
                    self.set_status(StatusLevel::Error, format!("protoc failed: {reason}"))
                }
                None => self.set_status(StatusLevel::Success, "Generation finished"),
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key_event(key),
            Event::Key(_) => {}
            Event::Resize(..) => {}
            Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        if self.prompt.is_open() {
            self.handle_prompt_key(key);
        } else if self.files.is_filter_active() {
            self.handle_filter_input(key);
        } else {
            self.handle_main_key(key);
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.files.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.files.select_previous(),
            KeyCode::Char(' ') => self.toggle_current_file(),
            KeyCode::Char('a') => self.toggle_all_files(),
            KeyCode::Char('/') => self.files.begin_filter(),
            KeyCode::Char('i') => {
                let initial = self.selection.input_directory().unwrap_or_default().to_owned();
                self.prompt.open(PromptTarget::InputDirectory, initial);
            }
            KeyCode::Char('o') => {
                let initial = self
                    .selection
                    .output_directory()
                    .unwrap_or_default()
                    .to_owned();
                self.prompt.open(PromptTarget::OutputDirectory, initial);
            }
            KeyCode::Char('[') | KeyCode::Char('h') | KeyCode::Left => self.cycle_language(false),
            KeyCode::Char(']') | KeyCode::Char('l') | KeyCode::Right => self.cycle_language(true),
            KeyCode::Char('g') | KeyCode::Enter => self.generate(),
            KeyCode::PageDown => self.report.scroll_down(SCROLL_STEP),
            KeyCode::PageUp => self.report.scroll_up(SCROLL_STEP),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let outcome = match key.code {
            KeyCode::Esc => self.prompt.cancel(),
            KeyCode::Enter => self.prompt.submit(),
            KeyCode::Backspace => {
                self.prompt.pop_char();
                None
            }
            KeyCode::Char(ch) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.prompt.push_char(ch);
                }
                None
            }
            _ => None,
        };

        if let Some((target, outcome)) = outcome {
            self.handle_dialog(target, outcome);
        }
    }

    fn handle_filter_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.files.clear_filter();
                self.files.end_filter();
            }
            KeyCode::Enter => self.files.end_filter(),
            KeyCode::Backspace => self.files.pop_filter_char(),
            KeyCode::Char(ch) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.files.push_filter_char(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_dialog(&mut self, target: PromptTarget, outcome: DialogOutcome) {
        match outcome {
            DialogOutcome::Cancelled => {
                tracing::debug!(?target, "directory selection cancelled");
            }
            DialogOutcome::Failed(reason) => {
                tracing::warn!(?target, error = %reason, "directory selection failed");
                self.report.show_error(reason.clone());
                self.set_status(StatusLevel::Error, reason);
            }
            DialogOutcome::Selected(path) => match target {
                PromptTarget::InputDirectory => self.scan_input_directory(path),
                PromptTarget::OutputDirectory => {
                    let display = path.display().to_string();
                    self.selection.set_output_directory(display.clone());
                    self.set_status(StatusLevel::Success, format!("Output to {display}"));
                }
            },
        }
    }

    fn scan_input_directory(&mut self, path: PathBuf) {
        let cfg = ScannerConfig::from_root(path, &self.config);
        match self.scanner.scan(&cfg) {
            Ok(scan) => {
                let added = self.selection.apply_scan(&scan);
                self.files.sync(&self.selection);
                tracing::info!(
                    root = %scan.root.display(),
                    found = scan.files.len(),
                    added,
                    "registered proto files"
                );
                self.set_status(
                    StatusLevel::Success,
                    format!("Found {} .proto files", scan.files.len()),
                );
            }
            Err(err) => {
                let message = format!("{err:#}");
                tracing::warn!(error = %message, "failed to scan input directory");
                self.report.show_error(message.clone());
                self.set_status(StatusLevel::Error, message);
            }
        }
    }

    fn toggle_current_file(&mut self) {
        let Some(name) = self.files.selected_name().map(str::to_owned) else {
            return;
        };
        if let Some(included) = self.selection.toggle(&name) {
            let verb = if included { "Included" } else { "Excluded" };
            self.set_status(StatusLevel::Info, format!("{verb} {name}"));
        }
    }

    fn toggle_all_files(&mut self) {
        let include = self.selection.included_count() < self.selection.files().len();
        self.selection.set_all_included(include);
    }

    fn cycle_language(&mut self, forward: bool) {
        let current = self
            .selection
            .output_language()
            .and_then(Language::from_label);
        let next = match (current, forward) {
            (Some(language), true) => language.next(),
            (Some(language), false) => language.previous(),
            (None, true) => Language::ALL[0],
            (None, false) => Language::ALL[Language::ALL.len() - 1],
        };
        self.selection.set_output_language(next.label());
    }

    fn generate(&mut self) {
        if self.jobs.is_running() {
            self.set_status(StatusLevel::Info, "Generation already running");
            return;
        }

        let invocation = match command::plan(&self.selection, self.protoc.clone()) {
            Ok(invocation) => invocation,
            Err(DomainError::InvalidSelection(errors)) => {
                let messages = join_messages(&errors);
                tracing::warn!(errors = %messages, "selection incomplete");
                self.report.show_invalid(messages);
                self.set_status(StatusLevel::Error, "Selection incomplete");
                return;
            }
            Err(err) => {
                self.set_status(StatusLevel::Error, err.to_string());
                return;
            }
        };

        let command_line = invocation.to_string();
        match self.jobs.submit(self.runner.clone(), invocation) {
            Ok(()) => {
                self.report.show_running(command_line);
                self.set_status(StatusLevel::Info, "Running protoc…");
            }
            Err(err) => self.set_status(StatusLevel::Error, err.to_string()),
        }
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusLevel {
    Info,
    Success,
    Error,
}
