use crate::domain::models::{
    DIR_EXCLUDE_OPTIONS, ExclusionFilters, FILE_EXCLUDE_OPTIONS, MAX_FILE_LIMIT, MIN_FILE_LIMIT,
};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info, warn};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    io::{self, IsTerminal},
    time::Duration,
};

/// Values confirmed in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    pub filters: ExclusionFilters,
    pub file_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormRow {
    Header(&'static str),
    FileSuffix(usize),
    DirName(usize),
    FileLimit,
}

impl FormRow {
    fn is_selectable(&self) -> bool {
        !matches!(self, FormRow::Header(_))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FormAction {
    Continue,
    Confirm,
    Cancel,
}

struct Choice {
    label: String,
    checked: bool,
}

// Offered options plus any configured value missing from them, checked
// according to `selected`.
fn choices(options: &[&str], selected: &[String]) -> Vec<Choice> {
    let mut result: Vec<Choice> = options
        .iter()
        .map(|option| Choice {
            label: option.to_string(),
            checked: selected.iter().any(|s| s == option),
        })
        .collect();

    for value in selected {
        if !options.contains(&value.as_str()) {
            result.push(Choice {
                label: value.clone(),
                checked: true,
            });
        }
    }
    result
}

struct FilterForm {
    file_choices: Vec<Choice>,
    dir_choices: Vec<Choice>,
    file_limit: usize,
    rows: Vec<FormRow>,
    state: ListState,
    title: String,
    help_message: String,
}

impl FilterForm {
    fn new(settings: &FormSettings) -> Self {
        let file_choices = choices(&FILE_EXCLUDE_OPTIONS, &settings.filters.files);
        let dir_choices = choices(&DIR_EXCLUDE_OPTIONS, &settings.filters.dirs);

        let mut rows = vec![FormRow::Header("Exclude files (by extension)")];
        rows.extend((0..file_choices.len()).map(FormRow::FileSuffix));
        rows.push(FormRow::Header("Exclude directories"));
        rows.extend((0..dir_choices.len()).map(FormRow::DirName));
        rows.push(FormRow::Header(
            "Number of files to show at the start and end of large folders",
        ));
        rows.push(FormRow::FileLimit);

        let mut state = ListState::default();
        state.select(rows.iter().position(FormRow::is_selectable));

        FilterForm {
            file_choices,
            dir_choices,
            file_limit: settings.file_limit.clamp(MIN_FILE_LIMIT, MAX_FILE_LIMIT),
            rows,
            state,
            title: "Filter options".to_string(),
            help_message: String::from(
                "↑/↓: Navigate | Space: Toggle | ←/→: Change limit | Enter: Confirm | q/Esc: Cancel",
            ),
        }
    }

    fn current_row(&self) -> Option<FormRow> {
        self.state.selected().and_then(|i| self.rows.get(i).copied())
    }

    fn step(&mut self, forward: bool) {
        let len = self.rows.len();
        let mut i = self.state.selected().unwrap_or(0);
        for _ in 0..len {
            i = if forward { (i + 1) % len } else { (i + len - 1) % len };
            if self.rows[i].is_selectable() {
                self.state.select(Some(i));
                return;
            }
        }
    }

    fn next(&mut self) {
        self.step(true);
    }

    fn previous(&mut self) {
        self.step(false);
    }

    fn toggle_selected(&mut self) {
        match self.current_row() {
            Some(FormRow::FileSuffix(i)) => {
                self.file_choices[i].checked = !self.file_choices[i].checked;
            }
            Some(FormRow::DirName(i)) => {
                self.dir_choices[i].checked = !self.dir_choices[i].checked;
            }
            _ => {}
        }
    }

    fn change_limit(&mut self, increase: bool) {
        if self.current_row() != Some(FormRow::FileLimit) {
            return;
        }
        self.file_limit = if increase {
            (self.file_limit + 1).min(MAX_FILE_LIMIT)
        } else {
            self.file_limit.saturating_sub(1).max(MIN_FILE_LIMIT)
        };
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                FormAction::Cancel
            }
            KeyCode::Char('q') | KeyCode::Esc => FormAction::Cancel,
            KeyCode::Enter => FormAction::Confirm,
            KeyCode::Char(' ') => {
                self.toggle_selected();
                FormAction::Continue
            }
            KeyCode::Right => {
                self.change_limit(true);
                FormAction::Continue
            }
            KeyCode::Left => {
                self.change_limit(false);
                FormAction::Continue
            }
            KeyCode::Down => {
                self.next();
                FormAction::Continue
            }
            KeyCode::Up => {
                self.previous();
                FormAction::Continue
            }
            _ => FormAction::Continue,
        }
    }

    fn settings(&self) -> FormSettings {
        let checked = |choices: &[Choice]| {
            choices
                .iter()
                .filter(|c| c.checked)
                .map(|c| c.label.clone())
                .collect::<Vec<_>>()
        };

        FormSettings {
            filters: ExclusionFilters::new(checked(&self.file_choices), checked(&self.dir_choices)),
            file_limit: self.file_limit,
        }
    }

    fn row_text(&self, row: FormRow) -> String {
        let mark = |checked: bool| if checked { "[✓] " } else { "[ ] " };
        match row {
            FormRow::Header(title) => title.to_string(),
            FormRow::FileSuffix(i) => {
                let choice = &self.file_choices[i];
                format!("  {}{}", mark(choice.checked), choice.label)
            }
            FormRow::DirName(i) => {
                let choice = &self.dir_choices[i];
                format!("  {}{}", mark(choice.checked), choice.label)
            }
            FormRow::FileLimit => format!(
                "  ◄ {:>2} ►  {}",
                self.file_limit,
                "■".repeat(self.file_limit)
            ),
        }
    }
}

fn ui(f: &mut Frame, form: &mut FilterForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        form.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    let selected_style = Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = form
        .rows
        .iter()
        .map(|row| {
            let style = match row {
                FormRow::Header(_) => Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                FormRow::FileSuffix(i) if form.file_choices[*i].checked => {
                    Style::default().fg(Color::Green)
                }
                FormRow::DirName(i) if form.dir_choices[*i].checked => {
                    Style::default().fg(Color::Green)
                }
                _ => Style::default(),
            };
            ListItem::new(Span::styled(form.row_text(*row), style))
        })
        .collect();

    let settings = form.settings();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "{} file suffixes, {} directories excluded",
            settings.filters.files.len(),
            settings.filters.dirs.len()
        )))
        .highlight_style(selected_style);

    f.render_stateful_widget(list, chunks[1], &mut form.state);

    let controls = Paragraph::new(Span::styled(
        form.help_message.clone(),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(controls, chunks[2]);
}

/// Shows the filter form on stderr, leaving stdout for the artifact.
/// Returns `None` when the user cancels.
pub fn edit_filters(current: &FormSettings) -> anyhow::Result<Option<FormSettings>> {
    debug!("Opening filter form with {:?}", current);

    if !io::stderr().is_terminal() {
        anyhow::bail!("The interactive filter form needs stderr attached to a terminal");
    }

    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let mut form = FilterForm::new(current);
    let result = run_form(&mut terminal, &mut form);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(FormAction::Confirm) => {
            let settings = form.settings();
            info!(
                "Filters confirmed: files {:?}, dirs {:?}, limit {}",
                settings.filters.files, settings.filters.dirs, settings.file_limit
            );
            Ok(Some(settings))
        }
        Ok(_) => {
            info!("Filter form cancelled");
            Ok(None)
        }
        Err(err) => {
            warn!("Error in filter form: {}", err);
            Err(err)
        }
    }
}

fn run_form<B: Backend>(terminal: &mut Terminal<B>, form: &mut FilterForm) -> anyhow::Result<FormAction> {
    loop {
        terminal.draw(|f| ui(f, form))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match form.handle_key(key) {
                    FormAction::Continue => {}
                    action => return Ok(action),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn defaults() -> FormSettings {
        FormSettings {
            filters: ExclusionFilters::new(
                vec![".DS_Store".to_string(), ".git".to_string()],
                vec!["__MACOSX".to_string(), ".git".to_string()],
            ),
            file_limit: 2,
        }
    }

    fn press(form: &mut FilterForm, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_form_starts_with_current_settings() {
        let form = FilterForm::new(&defaults());

        assert_eq!(form.settings(), defaults());
        assert_eq!(form.current_row(), Some(FormRow::FileSuffix(0)));
    }

    #[test]
    fn test_custom_values_are_offered_checked() {
        let settings = FormSettings {
            filters: ExclusionFilters::new(vec![".lock".to_string()], vec!["target".to_string()]),
            file_limit: 3,
        };

        let form = FilterForm::new(&settings);

        assert_eq!(form.file_choices.len(), FILE_EXCLUDE_OPTIONS.len() + 1);
        assert_eq!(form.dir_choices.len(), DIR_EXCLUDE_OPTIONS.len() + 1);
        assert_eq!(form.settings(), settings);
    }

    #[test]
    fn test_toggle_updates_filters() {
        let mut form = FilterForm::new(&defaults());

        // .DS_Store off, then .png on
        press(&mut form, KeyCode::Char(' '));
        press(&mut form, KeyCode::Down);
        press(&mut form, KeyCode::Char(' '));

        let settings = form.settings();
        assert_eq!(settings.filters.files, vec![".png", ".git"]);
        assert_eq!(settings.filters.dirs, vec!["__MACOSX", ".git"]);
    }

    #[test]
    fn test_navigation_skips_headers_and_wraps() {
        let mut form = FilterForm::new(&defaults());

        for _ in 0..FILE_EXCLUDE_OPTIONS.len() {
            press(&mut form, KeyCode::Down);
        }
        assert_eq!(form.current_row(), Some(FormRow::DirName(0)));

        press(&mut form, KeyCode::Up);
        press(&mut form, KeyCode::Up);
        press(&mut form, KeyCode::Up);
        assert_eq!(
            form.current_row(),
            Some(FormRow::FileSuffix(FILE_EXCLUDE_OPTIONS.len() - 3))
        );

        let mut form = FilterForm::new(&defaults());
        press(&mut form, KeyCode::Up);
        assert_eq!(form.current_row(), Some(FormRow::FileLimit));
    }

    #[test]
    fn test_file_limit_is_clamped() {
        let mut form = FilterForm::new(&defaults());
        press(&mut form, KeyCode::Up);
        assert_eq!(form.current_row(), Some(FormRow::FileLimit));

        for _ in 0..20 {
            press(&mut form, KeyCode::Right);
        }
        assert_eq!(form.settings().file_limit, MAX_FILE_LIMIT);

        for _ in 0..20 {
            press(&mut form, KeyCode::Left);
        }
        assert_eq!(form.settings().file_limit, MIN_FILE_LIMIT);
    }

    #[test]
    fn test_limit_keys_ignored_on_other_rows() {
        let mut form = FilterForm::new(&defaults());
        press(&mut form, KeyCode::Right);

        assert_eq!(form.settings().file_limit, 2);
    }

    #[test]
    fn test_confirm_and_cancel_keys() {
        let mut form = FilterForm::new(&defaults());

        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::Confirm);
        assert_eq!(press(&mut form, KeyCode::Esc), FormAction::Cancel);
        assert_eq!(press(&mut form, KeyCode::Char('q')), FormAction::Cancel);
        assert_eq!(
            form.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            FormAction::Cancel
        );
    }

    #[test]
    fn test_form_renders_options() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut form = FilterForm::new(&defaults());

        terminal.draw(|f| ui(f, &mut form)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Exclude directories"));
        assert!(rendered.contains("__pycache__"));
        assert!(rendered.contains("2 file suffixes, 2 directories excluded"));
    }
}
