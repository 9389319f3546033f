use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use marku_core::export::to_text;
use marku_core::{
    parse_subject_form, write_export, ExportFormat, GradeError, ResultSnapshot, ResultsService, Storage,
    SubjectStore,
};
use ratatui::widgets::TableState;
use uuid::Uuid;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Calculator,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Confirm {
    Remove { id: Uuid, name: String },
    ClearAll,
}

impl Confirm {
    pub fn question(&self) -> String {
        match self {
            Confirm::Remove { name, .. } => format!("Remove '{}'?", name),
            Confirm::ClearAll => "Clear all subjects and results? This cannot be undone.".to_string(),
        }
    }
}

/// Blocking message; stays up until a key is pressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Transient success message shown in the footer.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub shown_at: Instant,
}

pub struct App<S: Storage> {
    pub store: SubjectStore<S>,
    pub results: ResultsService<S>,
    pub export_dir: PathBuf,
    pub view: View,
    pub input_mode: InputMode,
    pub state: TableState,
    pub input: String,
    pub cursor_position: usize,
    pub confirm: Option<Confirm>,
    pub alert: Option<Alert>,
    pub notification: Option<Notification>,
    pub snapshot: Option<ResultSnapshot>,
    /// Set by "print": the report goes to stdout once the terminal is restored.
    pub report: Option<String>,
    pub should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(store: SubjectStore<S>, results: ResultsService<S>, export_dir: PathBuf) -> App<S> {
        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }
        App {
            store,
            results,
            export_dir,
            view: View::Calculator,
            input_mode: InputMode::Normal,
            state,
            input: String::new(),
            cursor_position: 0,
            confirm: None,
            alert: None,
            notification: None,
            snapshot: None,
            report: None,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.alert.is_some() {
            self.alert = None;
            return;
        }

        if let Some(confirm) = self.confirm.take() {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.apply_confirm(confirm);
            }
            return;
        }

        match (self.view, self.input_mode) {
            (View::Calculator, InputMode::Adding) => match key.code {
                KeyCode::Enter => self.submit_add(),
                KeyCode::Esc => self.exit_input_mode(),
                KeyCode::Char(c) => self.input_char(c),
                KeyCode::Backspace => self.delete_char(),
                KeyCode::Left => self.move_cursor_left(),
                KeyCode::Right => self.move_cursor_right(),
                _ => {}
            },
            (View::Calculator, InputMode::Normal) => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Char('a') => self.enter_add_mode(),
                KeyCode::Char('d') | KeyCode::Delete => self.ask_remove(),
                KeyCode::Char('C') => self.ask_clear(),
                KeyCode::Char('c') | KeyCode::Enter => self.calculate(),
                KeyCode::Char('r') => self.show_latest(),
                _ => {}
            },
            (View::Results, _) => match key.code {
                KeyCode::Char('p') => self.print(),
                KeyCode::Char('e') => self.export(ExportFormat::Csv),
                KeyCode::Char('t') => self.export(ExportFormat::Text),
                KeyCode::Char('C') => self.ask_clear(),
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.view = View::Calculator,
                _ => {}
            },
        }
    }

    /// Expires the notification once it has been shown long enough.
    pub fn tick(&mut self) {
        if let Some(n) = &self.notification {
            if n.shown_at.elapsed() >= NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }

    pub fn next(&mut self) {
        if self.store.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.store.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.store.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.store.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn ask_remove(&mut self) {
        if let Some(subject) = self.state.selected().and_then(|i| self.store.subjects().get(i)) {
            self.confirm = Some(Confirm::Remove {
                id: subject.id,
                name: subject.name.clone(),
            });
        }
    }

    fn ask_clear(&mut self) {
        if self.store.is_empty() && self.snapshot.is_none() && self.results.latest().is_none() {
            self.notify("Nothing to clear.");
            return;
        }
        self.confirm = Some(Confirm::ClearAll);
    }

    fn apply_confirm(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::Remove { id, .. } => match self.store.remove(&id) {
                Ok(_) => {
                    self.fix_selection();
                    self.notify("Subject removed successfully!");
                }
                Err(e) => self.show_error(e),
            },
            Confirm::ClearAll => match self.results.clear_all(&mut self.store) {
                Ok(()) => {
                    self.snapshot = None;
                    self.state.select(None);
                    self.view = View::Calculator;
                    self.notify("All subjects cleared!");
                }
                Err(e) => self.show_error(e),
            },
        }
    }

    fn calculate(&mut self) {
        match self.results.calculate(&self.store) {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.view = View::Results;
            }
            Err(GradeError::NoData) => self.alert(
                "No Data",
                "Please add at least one subject before calculating.",
            ),
            Err(e) => self.show_error(e),
        }
    }

    fn show_latest(&mut self) {
        match self.results.latest() {
            Some(snapshot) => {
                self.snapshot = Some(snapshot);
                self.view = View::Results;
            }
            None => self.alert("No Data", "No results found. Please add subjects and calculate first."),
        }
    }

    fn print(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            self.report = Some(to_text(snapshot, Local::now()));
            self.should_quit = true;
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(snapshot) = &self.snapshot else {
            self.alert("No Data", "No data to export.");
            return;
        };
        match write_export(snapshot, format, &self.export_dir) {
            Ok(path) => self.notify(&format!("Exported to {}", path.display())),
            Err(e) => self.alert("Export Failed", &e.to_string()),
        }
    }

    fn fix_selection(&mut self) {
        let len = self.store.len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    fn notify(&mut self, message: &str) {
        self.notification = Some(Notification {
            message: message.to_string(),
            shown_at: Instant::now(),
        });
    }

    fn alert(&mut self, title: &str, message: &str) {
        self.alert = Some(Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn show_error(&mut self, err: GradeError) {
        let title = match err {
            GradeError::Validation(_) => "Invalid Input",
            GradeError::Duplicate(_) => "Duplicate Subject",
            GradeError::NoData | GradeError::NoResults => "No Data",
            _ => "Error",
        };
        self.alert(title, &err.to_string());
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn byte_index(&self, chars: usize) -> usize {
        self.input.chars().take(chars).map(|c| c.len_utf8()).sum()
    }

    fn submit_add(&mut self) {
        if self.input.trim().is_empty() {
            self.exit_input_mode();
            return;
        }

        let added = parse_subject_form(&self.input)
            .and_then(|form| self.store.add(&form.name, form.credits, form.grade));

        match added {
            Ok(_) => {
                // Form resets only on success so a typo can be fixed in place.
                self.exit_input_mode();
                self.state.select(Some(self.store.len() - 1));
                self.notify("Subject added successfully!");
            }
            Err(e) => self.show_error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use marku_core::repository::RESULTS_KEY;
    use marku_core::MemoryStorage;
    use tempfile::TempDir;

    fn app() -> App<MemoryStorage> {
        let storage = MemoryStorage::new();
        App::new(
            SubjectStore::open(storage.clone()),
            ResultsService::new(storage),
            std::env::temp_dir(),
        )
    }

    fn press(app: &mut App<MemoryStorage>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App<MemoryStorage>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut App<MemoryStorage>, line: &str) {
        press(app, KeyCode::Char('a'));
        type_str(app, line);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_add_through_form() {
        let mut app = app();
        add(&mut app, "Math credits:4 grade:8");

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state.selected(), Some(0));
        assert!(app.notification.is_some());
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_invalid_form_raises_alert_and_keeps_input() {
        let mut app = app();
        add(&mut app, "Math credits:40 grade:8");

        assert!(app.store.is_empty());
        assert_eq!(app.alert.as_ref().map(|a| a.title.as_str()), Some("Invalid Input"));
        assert_eq!(app.input_mode, InputMode::Adding);
        assert_eq!(app.input, "Math credits:40 grade:8");

        // Any key dismisses the alert without reaching the form.
        press(&mut app, KeyCode::Char('x'));
        assert!(app.alert.is_none());
        assert_eq!(app.input, "Math credits:40 grade:8");
    }

    #[test]
    fn test_duplicate_alert() {
        let mut app = app();
        add(&mut app, "Math c:4 g:8");
        add(&mut app, "MATH c:3 g:9");

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.alert.as_ref().map(|a| a.title.as_str()), Some("Duplicate Subject"));
    }

    #[test]
    fn test_calculate_requires_subjects() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));

        assert_eq!(app.view, View::Calculator);
        assert_eq!(app.alert.as_ref().map(|a| a.title.as_str()), Some("No Data"));
    }

    #[test]
    fn test_calculate_switches_to_results() {
        let mut app = app();
        add(&mut app, "Math c:4 g:8");
        add(&mut app, "Physics c:3 g:7");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.view, View::Results);
        let snapshot = app.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.sgpa, 7.57);
        assert_eq!(snapshot.percentage, 75.71);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Calculator);
    }

    #[test]
    fn test_remove_needs_confirmation() {
        let mut app = app();
        add(&mut app, "Math c:4 g:8");

        press(&mut app, KeyCode::Char('d'));
        assert!(app.confirm.is_some());
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.store.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_clear_all_from_results() {
        let mut app = app();
        add(&mut app, "Math c:4 g:8");
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.view, View::Results);

        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(app.view, View::Calculator);
        assert!(app.store.is_empty());
        assert!(app.snapshot.is_none());
        assert!(app.results.latest().is_none());
    }

    #[test]
    fn test_clear_all_reaches_snapshot_from_earlier_session() {
        let storage = MemoryStorage::new();
        {
            let mut store = SubjectStore::open(storage.clone());
            let results = ResultsService::new(storage.clone());
            let math = store.add("Math", 4, 8).unwrap();
            results.calculate(&store).unwrap();
            store.remove(&math.id).unwrap();
        }
        assert!(storage.contains(RESULTS_KEY));

        let mut app = App::new(
            SubjectStore::open(storage.clone()),
            ResultsService::new(storage.clone()),
            std::env::temp_dir(),
        );
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.confirm, Some(Confirm::ClearAll));
        press(&mut app, KeyCode::Char('y'));

        assert!(!storage.contains(RESULTS_KEY));
        assert!(app.results.latest().is_none());
    }

    #[test]
    fn test_clear_with_nothing_stored() {
        let mut app = app();
        press(&mut app, KeyCode::Char('C'));
        assert!(app.confirm.is_none());
        assert_eq!(app.notification.as_ref().map(|n| n.message.as_str()), Some("Nothing to clear."));
    }

    #[test]
    fn test_print_queues_report_and_quits() {
        let mut app = app();
        add(&mut app, "Math c:4 g:8");
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('p'));

        assert!(app.should_quit);
        assert!(app.report.as_ref().unwrap().contains("SGPA: 8.00"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut app = app();
        app.export_dir = dir.path().to_path_buf();
        add(&mut app, "Math c:4 g:8");
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('e'));

        assert!(app.alert.is_none());
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_cursor_editing_handles_multibyte() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Ümlaut");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "Ümlat");
        assert_eq!(app.cursor_position, 4);
    }

    #[test]
    fn test_notification_expires() {
        let mut app = app();
        app.notification = Some(Notification {
            message: "done".to_string(),
            shown_at: Instant::now() - NOTIFICATION_TTL,
        });
        app.tick();
        assert!(app.notification.is_none());
    }
}
