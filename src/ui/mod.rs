//! Mechanic UI - a single-screen repair console
//!
//! Layout:
//! ╔══════════════════════════════════════════════════════════════╗
//! ║                x a m p p   m e c h a n i c                   ║
//! ╠══════════════════════════════════════════════════════════════╣
//! ║  MYSQL DIRECTORY                                             ║
//! ║  (•) Use default path (C:/xampp/mysql)                       ║
//! ║  ( ) Use custom path                                         ║
//! ║      C:/xampp/mysql                                          ║
//! ╠══════════════════════════════════════════════════════════════╣
//! ║  LOG                                                         ║
//! ║  › Starting repair at: C:/xampp/mysql                        ║
//! ║  → Renaming 'data' to 'data_old'                             ║
//! ║  + 'backup' copied to 'data'                                 ║
//! ╠══════════════════════════════════════════════════════════════╣
//! ║  C:/xampp/mysql        r repair  p ports  ? help  q quit     ║
//! ╚══════════════════════════════════════════════════════════════╝

pub mod helpers;
pub mod render;
pub mod theme;

pub use render::render;

use crate::config::Config;
use crate::error::RepairError;
use crate::layout;
use crate::repair::{LogEntry, PathChoice, RepairOptions};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    EditingPath,
}

/// Which text field of the port inspector receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectorField {
    #[default]
    Port,
    Pid,
}

impl InspectorField {
    pub fn toggle(&self) -> Self {
        match self {
            InspectorField::Port => InspectorField::Pid,
            InspectorField::Pid => InspectorField::Port,
        }
    }
}

/// State of the "check port usage" dialog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortInspectorState {
    pub port_input: String,
    pub pid_input: String,
    pub field: InspectorField,
    /// Last lookup result, rendered as-is
    pub output: String,
}

impl PortInspectorState {
    pub fn new(port: u16) -> Self {
        Self {
            port_input: port.to_string(),
            ..Default::default()
        }
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            InspectorField::Port => &mut self.port_input,
            InspectorField::Pid => &mut self.pid_input,
        }
    }

    /// Only digits are accepted in either field
    pub fn push_char(&mut self, c: char) {
        if c.is_ascii_digit() {
            self.active_input().push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.active_input().pop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    #[default]
    Info,
    Success,
    Error,
}

/// Overlay state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Overlay {
    #[default]
    None,
    Help {
        scroll: usize,
    },
    /// Server process detected before a repair
    ServerRunning {
        matches: Vec<String>,
    },
    PortInspector(PortInspectorState),
    /// Blocking message; `previous` is restored when dismissed
    Alert {
        title: String,
        message: String,
        kind: AlertKind,
        previous: Option<Box<Overlay>>,
    },
}

/// Toast notification kind - affects duration and styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Duration in seconds before toast expires
    pub fn duration_secs(&self) -> u64 {
        match self {
            ToastKind::Info => 3,
            ToastKind::Success => 4,
            ToastKind::Error => 10,
        }
    }
}

/// Toast notification
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: &str, kind: ToastKind) -> Self {
        Self {
            message: message.to_string(),
            created_at: Instant::now(),
            kind,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.kind.duration_secs()
    }
}

/// Main application state
pub struct App {
    pub config: Config,
    /// Where the selection is saved after a successful repair; `None` keeps
    /// it in memory only
    pub config_path: Option<PathBuf>,
    /// Root given on the command line; used for this run but never saved
    pub root_override: Option<String>,

    // Path selection
    pub path_choice: PathChoice,
    pub path_input: String,
    pub input_mode: InputMode,

    // Append-only log pane
    pub log: Vec<LogEntry>,
    pub log_scroll: usize,
    pub follow_log: bool,

    pub overlay: Overlay,
    pub toast: Option<Toast>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut app = Self {
            path_choice: config.path_choice,
            path_input: String::new(),
            config,
            config_path: None,
            root_override: None,
            input_mode: InputMode::Normal,
            log: Vec::new(),
            log_scroll: 0,
            follow_log: true,
            overlay: Overlay::None,
            toast: None,
            should_quit: false,
        };
        match app.path_choice {
            PathChoice::Default => app.path_input = layout::DEFAULT_ROOT.to_string(),
            PathChoice::Custom => {
                app.path_input = app
                    .config
                    .custom_root
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
            }
        }
        app
    }

    /// Options for the repair as currently selected on screen
    pub fn repair_options(&self) -> RepairOptions {
        RepairOptions::resolve(self.path_choice, &self.path_input)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Path selection
    // ─────────────────────────────────────────────────────────────────────

    /// Preselect a root passed on the command line without touching the
    /// stored config
    pub fn use_root_override(&mut self, root: &Path) {
        let root = root.display().to_string();
        self.path_choice = PathChoice::Custom;
        self.path_input = root.clone();
        self.root_override = Some(root);
    }

    /// Switch to the default root; the entry is locked to it
    pub fn select_default_path(&mut self) {
        self.path_choice = PathChoice::Default;
        self.path_input = layout::DEFAULT_ROOT.to_string();
        self.input_mode = InputMode::Normal;
    }

    /// Switch to a custom root; the entry is cleared and opened for editing
    pub fn select_custom_path(&mut self) {
        if self.path_choice != PathChoice::Custom {
            self.path_choice = PathChoice::Custom;
            self.path_input.clear();
        }
        self.input_mode = InputMode::EditingPath;
    }

    pub fn start_editing_path(&mut self) {
        if self.path_choice == PathChoice::Custom {
            self.input_mode = InputMode::EditingPath;
        } else {
            self.show_toast("Select a custom path to edit it", ToastKind::Info);
        }
    }

    pub fn finish_editing_path(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn path_push_char(&mut self, c: char) {
        if self.input_mode == InputMode::EditingPath {
            self.path_input.push(c);
        }
    }

    pub fn path_backspace(&mut self) {
        if self.input_mode == InputMode::EditingPath {
            self.path_input.pop();
        }
    }

    /// Copy the on-screen selection into the config and persist it
    pub fn remember_selection(&mut self) {
        if self.path_choice == PathChoice::Custom
            && self.root_override.as_deref() == Some(self.path_input.trim())
        {
            return;
        }
        self.config.path_choice = self.path_choice;
        if self.path_choice == PathChoice::Custom && !self.path_input.trim().is_empty() {
            self.config.custom_root = Some(self.path_input.trim().into());
        }
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            tracing::warn!(error = %e, "failed to save config");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Log pane
    // ─────────────────────────────────────────────────────────────────────

    pub fn append_log(&mut self, entry: LogEntry) {
        self.log.push(entry);
        if self.follow_log {
            self.scroll_log_to_end();
        }
    }

    pub fn extend_log(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        for entry in entries {
            self.append_log(entry);
        }
    }

    pub fn scroll_log_up(&mut self, lines: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(lines);
        self.follow_log = false;
    }

    pub fn scroll_log_down(&mut self, lines: usize) {
        let last = self.log.len().saturating_sub(1);
        self.log_scroll = (self.log_scroll + lines).min(last);
        self.follow_log = self.log_scroll >= last;
    }

    pub fn scroll_log_to_end(&mut self) {
        self.log_scroll = self.log.len().saturating_sub(1);
        self.follow_log = true;
    }

    pub fn scroll_log_to_start(&mut self) {
        self.log_scroll = 0;
        self.follow_log = self.log.len() <= 1;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Overlays and toasts
    // ─────────────────────────────────────────────────────────────────────

    pub fn show_help(&mut self) {
        self.overlay = Overlay::Help { scroll: 0 };
    }

    pub fn show_server_running(&mut self, matches: Vec<String>) {
        self.overlay = Overlay::ServerRunning { matches };
    }

    pub fn open_port_inspector(&mut self) {
        self.overlay = Overlay::PortInspector(PortInspectorState::new(self.config.inspect_port));
    }

    pub fn port_inspector_mut(&mut self) -> Option<&mut PortInspectorState> {
        match &mut self.overlay {
            Overlay::PortInspector(state) => Some(state),
            _ => None,
        }
    }

    /// Show a blocking message on top of whatever overlay is open
    pub fn show_alert(&mut self, title: &str, message: &str, kind: AlertKind) {
        let previous = match std::mem::take(&mut self.overlay) {
            Overlay::None => None,
            other => Some(Box::new(other)),
        };
        self.overlay = Overlay::Alert {
            title: title.to_string(),
            message: message.to_string(),
            kind,
            previous,
        };
    }

    /// Show a blocking message and drop whatever overlay was open
    pub fn replace_with_alert(&mut self, title: &str, message: &str, kind: AlertKind) {
        self.overlay = Overlay::None;
        self.show_alert(title, message, kind);
    }

    pub fn show_error_alert(&mut self, err: &RepairError) {
        self.show_alert(err.title(), &err.to_string(), AlertKind::Error);
    }

    /// Close the top overlay; alerts fall back to what they covered
    pub fn close_overlay(&mut self) {
        self.overlay = match std::mem::take(&mut self.overlay) {
            Overlay::Alert {
                previous: Some(previous),
                ..
            } => *previous,
            _ => Overlay::None,
        };
    }

    pub fn overlay_scroll_down(&mut self) {
        if let Overlay::Help { scroll } = &mut self.overlay {
            *scroll += 1;
        }
    }

    pub fn overlay_scroll_up(&mut self) {
        if let Overlay::Help { scroll } = &mut self.overlay {
            *scroll = scroll.saturating_sub(1);
        }
    }

    pub fn show_toast(&mut self, message: &str, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().map(|t| t.is_expired()).unwrap_or(false) {
            self.toast = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default())
    }

    #[test]
    fn test_default_selection_locks_path() {
        let mut app = app();
        assert_eq!(app.path_input, "C:/xampp/mysql");

        app.path_push_char('x');
        assert_eq!(app.path_input, "C:/xampp/mysql");
        assert_eq!(app.repair_options().root, PathBuf::from("C:/xampp/mysql"));
    }

    #[test]
    fn test_custom_selection_clears_and_edits() {
        let mut app = app();
        app.select_custom_path();
        assert_eq!(app.path_input, "");
        assert_eq!(app.input_mode, InputMode::EditingPath);

        for c in "/srv/mysql".chars() {
            app.path_push_char(c);
        }
        app.path_backspace();
        app.finish_editing_path();

        assert_eq!(app.repair_options().root, PathBuf::from("/srv/mysq"));
        assert_eq!(app.repair_options().choice, PathChoice::Custom);

        app.select_default_path();
        assert_eq!(app.path_input, "C:/xampp/mysql");
    }

    #[test]
    fn test_custom_config_restores_path() {
        let config = Config {
            path_choice: PathChoice::Custom,
            custom_root: Some(PathBuf::from("/opt/lampp/var/mysql")),
            ..Config::default()
        };
        let app = App::new(config);
        assert_eq!(app.path_input, "/opt/lampp/var/mysql");
    }

    #[test]
    fn test_remember_selection_saves_only_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut app = app();
        app.select_custom_path();
        app.path_input = "/srv/mysql".to_string();
        app.remember_selection();
        assert!(!path.exists());

        app.config_path = Some(path.clone());
        app.remember_selection();
        let saved = Config::load_from(&path);
        assert_eq!(saved.path_choice, PathChoice::Custom);
        assert_eq!(saved.custom_root, Some(PathBuf::from("/srv/mysql")));
    }

    #[test]
    fn test_command_line_root_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let stored = Config {
            path_choice: PathChoice::Default,
            ..Config::default()
        };
        stored.save_to(&path).unwrap();

        let mut app = App::new(stored);
        app.config_path = Some(path.clone());
        app.use_root_override(Path::new("/tmp/other/mysql"));
        assert_eq!(app.path_choice, PathChoice::Custom);
        assert_eq!(app.path_input, "/tmp/other/mysql");
        assert_eq!(app.repair_options().root, PathBuf::from("/tmp/other/mysql"));

        app.remember_selection();
        let saved = Config::load_from(&path);
        assert_eq!(saved.path_choice, PathChoice::Default);
        assert_eq!(saved.custom_root, None);

        // a path typed by hand during the same run is still remembered
        app.path_input = "/srv/mysql".to_string();
        app.remember_selection();
        let saved = Config::load_from(&path);
        assert_eq!(saved.path_choice, PathChoice::Custom);
        assert_eq!(saved.custom_root, Some(PathBuf::from("/srv/mysql")));
    }

    #[test]
    fn test_log_follows_until_scrolled_up() {
        let mut app = app();
        for i in 0..5 {
            app.append_log(LogEntry::info(format!("line {}", i)));
        }
        assert_eq!(app.log_scroll, 4);

        app.scroll_log_up(2);
        assert!(!app.follow_log);
        app.append_log(LogEntry::info("line 5"));
        assert_eq!(app.log_scroll, 2);

        app.scroll_log_down(10);
        assert!(app.follow_log);
        assert_eq!(app.log_scroll, 5);
    }

    #[test]
    fn test_alert_restores_previous_overlay() {
        let mut app = app();
        app.open_port_inspector();
        app.show_alert("Error", "Please enter a valid PID.", AlertKind::Error);
        assert!(matches!(app.overlay, Overlay::Alert { .. }));

        app.close_overlay();
        assert_eq!(
            app.overlay,
            Overlay::PortInspector(PortInspectorState::new(3306))
        );

        app.replace_with_alert("Success", "done", AlertKind::Success);
        app.close_overlay();
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn test_inspector_fields_accept_digits_only() {
        let mut state = PortInspectorState::new(3306);
        state.push_char('7');
        state.push_char('x');
        assert_eq!(state.port_input, "33067");

        state.field = state.field.toggle();
        state.push_char('4');
        state.push_char('2');
        state.backspace();
        assert_eq!(state.pid_input, "4");
    }
}
