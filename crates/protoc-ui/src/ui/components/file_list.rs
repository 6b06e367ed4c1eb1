//! Checklist of discovered proto files and its navigation state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::selection::SelectionState;

/// Cursor and filter over the registered filenames.
#[derive(Debug, Default, Clone)]
pub struct FileListState {
    entries: Vec<String>,
    visible: Vec<usize>,
    selected: usize,
    filter: String,
    filter_active: bool,
}

impl FileListState {
    /// Refresh entries from the selection, keeping the cursor on the same file when possible.
    pub fn sync(&mut self, selection: &SelectionState) {
        let focused = self.selected_name().map(str::to_owned);
        self.entries = selection.files().keys().cloned().collect();
        self.refresh_visible();
        if let Some(name) = focused {
            self.focus_name(&name);
        }
    }

    /// Filename under the cursor.
    pub fn selected_name(&self) -> Option<&str> {
        self.visible
            .get(self.selected)
            .and_then(|idx| self.entries.get(*idx))
            .map(String::as_str)
    }

    /// Move the cursor onto `name` if it is visible.
    pub fn focus_name(&mut self, name: &str) {
        if let Some(pos) = self
            .visible
            .iter()
            .position(|idx| self.entries[*idx] == name)
        {
            self.selected = pos;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn begin_filter(&mut self) {
        self.filter_active = true;
    }

    pub fn end_filter(&mut self) {
        self.filter_active = false;
    }

    pub fn is_filter_active(&self) -> bool {
        self.filter_active
    }

    pub fn push_filter_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.refresh_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.refresh_visible();
    }

    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.refresh_visible();
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Filenames currently shown, in display order.
    pub fn visible_names(&self) -> impl Iterator<Item = &str> {
        self.visible
            .iter()
            .filter_map(|idx| self.entries.get(*idx))
            .map(String::as_str)
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    fn refresh_visible(&mut self) {
        let lower_filter = self.filter.to_ascii_lowercase();
        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                lower_filter.is_empty() || name.to_ascii_lowercase().contains(&lower_filter)
            })
            .map(|(idx, _)| idx)
            .collect();

        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }
}

/// Ratatui component rendering the checklist.
#[derive(Debug, Default)]
pub struct FileList;

impl FileList {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        state: &FileListState,
        selection: &SelectionState,
        has_focus: bool,
    ) {
        let directory = selection
            .input_directory()
            .unwrap_or("(select proto files directory)");
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Protocol Buffer directory · {directory}"))
            .border_style(Style::default().fg(if has_focus {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        frame.render_widget(block.clone(), area);

        let inner = block.inner(area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let filter_text = if state.filter().is_empty() {
            format!(
                "{}/{} selected · ⌕ filter (press /)",
                selection.included_count(),
                selection.files().len()
            )
        } else {
            format!("⌕ {}", state.filter())
        };
        let mut filter_style = Style::default().fg(Color::Gray);
        if state.is_filter_active() {
            filter_style = filter_style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
        }
        frame.render_widget(Paragraph::new(filter_text).style(filter_style), layout[0]);

        if state.visible_len() == 0 {
            let message = if selection.files().is_empty() {
                "No .proto files yet · press i to pick a directory"
            } else {
                "No files match filter"
            };
            let placeholder = Paragraph::new(message).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, layout[1]);
            return;
        }

        let items: Vec<ListItem<'_>> = state
            .visible_names()
            .map(|name| {
                let included = selection.is_included(name);
                let (mark, mark_style) = if included {
                    ("[x] ", Style::default().fg(Color::Green))
                } else {
                    ("[ ] ", Style::default().fg(Color::DarkGray))
                };
                let name_style = if included {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, mark_style),
                    Span::styled(name.to_string(), name_style),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(state.selected_index());

        let highlight_style = if has_focus {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        };

        let list = List::new(items)
            .highlight_style(highlight_style)
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, layout[1], &mut list_state);
    }
}
