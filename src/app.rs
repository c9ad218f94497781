#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    event,
    execute,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use ftui::prelude::*;
use ftui::{KeyEventKind, Program, ProgramConfig};
use time::OffsetDateTime;

use crate::config;
use crate::keymap::{self, Action};
use crate::screen::Screen;
use crate::ui::{self, Theme};
use crate::views::dir::SortMode;

/// Top-level state: the screen stack, a transient status line, and the
/// draw plumbing. One key press turns into at most one action applied
/// to the top screen.
pub struct App {
    screen: Screen,
    sort: SortMode,
    status: Option<String>,
    theme: Theme,
    log: Option<File>,
    force_clear_frames: RefCell<u8>,
}

#[derive(Debug, Clone)]
pub enum Msg {
    Event(Event),
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

impl App {
    pub fn new(path: &Path, sort: SortMode) -> io::Result<Self> {
        let screen = Screen::dir(path, sort)?;
        let log = match std::env::var("BURROW_DEBUG_LOG") {
            Ok(_) => std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open("/tmp/burrow.log")
                .ok(),
            Err(_) => None,
        };
        Ok(Self {
            screen,
            sort,
            status: None,
            theme: Theme::default(),
            log,
            force_clear_frames: RefCell::new(0),
        })
    }

    fn log_event(&mut self, msg: &str) {
        if let Some(file) = self.log.as_mut() {
            let _ = writeln!(file, "{} {}", OffsetDateTime::now_utc(), msg);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.kind != KeyEventKind::Press {
            return Cmd::none();
        }
        self.log_event(&format!("key {:?} {:?}", key.code, key.modifiers));
        // any keypress dismisses a lingering status message
        self.status = None;
        let Some(action) = keymap::action_for(key.code, key.modifiers) else {
            return Cmd::none();
        };
        match self.apply(action) {
            Ok(cmd) => cmd,
            Err(err) => {
                self.status = Some(err.to_string());
                Cmd::none()
            }
        }
    }

    /// Row count of the top screen at its last known width.
    fn view_len(&self) -> usize {
        let width = self.screen.view.borrow().width;
        self.screen.content.as_provider().len(width)
    }

    fn apply(&mut self, action: Action) -> io::Result<Cmd<Msg>> {
        let len = self.view_len();
        match action {
            Action::Quit => return Ok(Cmd::quit()),
            Action::MoveUp => self.screen.view.borrow_mut().move_cursor(-1, len),
            Action::MoveDown => self.screen.view.borrow_mut().move_cursor(1, len),
            Action::PageUp => self.screen.view.borrow_mut().page_up(len),
            Action::PageDown => self.screen.view.borrow_mut().page_down(len),
            Action::GoToStart => self.screen.view.borrow_mut().to_start(len),
            Action::GoToEnd => self.screen.view.borrow_mut().to_end(len),
            Action::Back => {
                self.screen.back()?;
            }
            Action::Open => {
                let target = self.entry_under_cursor(|e| Some(e.path.clone()));
                if let Some(path) = target {
                    let next = Screen::open_path(&path, self.sort)?;
                    self.screen.push(next);
                }
            }
            Action::ToggleSelect => self.mark(None),
            Action::Select => self.mark(Some(true)),
            Action::Deselect => self.mark(Some(false)),
            Action::SelectAll => {
                if let Some(dir) = self.screen.content.as_dir_mut() {
                    dir.select_all();
                }
            }
            Action::DeselectAll => {
                if let Some(dir) = self.screen.content.as_dir_mut() {
                    dir.deselect_all();
                }
            }
            Action::GoHome => {
                // a folder-screen command, like the shell
                if self.screen.content.as_dir().is_some() {
                    match config::home_folder() {
                        Some(home) => {
                            let next = Screen::dir(&home, self.sort)?;
                            self.screen.replace(next);
                        }
                        None => self.status = Some(String::from("HOME is not set")),
                    }
                }
            }
            Action::Refresh => self.screen.refresh()?,
            Action::RunShell => {
                if let Some(path) = self.screen.content.as_dir().map(|d| d.path.clone()) {
                    run_shell(&path)?;
                    *self.force_clear_frames.borrow_mut() = 3;
                    self.screen.refresh()?;
                }
            }
            Action::ShowHelp => self.screen.push(Screen::help()),
            Action::ShowFileInfo => {
                let info = self.entry_under_cursor(|e| Some(Screen::info(e)));
                if let Some(screen) = info {
                    self.screen.push(screen);
                }
            }
            Action::ViewBinary => {
                let target =
                    self.entry_under_cursor(|e| (!e.is_dir).then(|| e.path.clone()));
                if let Some(path) = target {
                    self.screen.push(Screen::binary_file(&path)?);
                }
            }
        }
        Ok(Cmd::none())
    }

    fn entry_under_cursor<T>(
        &self,
        f: impl FnOnce(&crate::views::dir::FileEntry) -> Option<T>,
    ) -> Option<T> {
        let cursor = self.screen.view.borrow().cursor;
        self.screen.content.as_dir()?.entry(cursor).and_then(f)
    }

    /// Sets, clears, or toggles the selection flag under the cursor and
    /// steps one row down, the ergonomic sweep for marking a run of
    /// entries.
    fn mark(&mut self, on: Option<bool>) {
        let cursor = self.screen.view.borrow().cursor;
        if let Some(dir) = self.screen.content.as_dir_mut() {
            match on {
                Some(on) => dir.set_selected(cursor, on),
                None => dir.toggle_selected(cursor),
            }
            let len = self.view_len();
            self.screen.view.borrow_mut().move_cursor(1, len);
        }
    }
}

impl Model for App {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(Event::Key(key)) => self.handle_key(key),
            Msg::Event(_) => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        {
            let mut force_clear = self.force_clear_frames.borrow_mut();
            if *force_clear > 0 {
                frame.clear();
                *force_clear = force_clear.saturating_sub(1);
            }
        }
        ui::draw(frame, &self.screen, self.status.as_deref(), self.theme);
    }
}

/// Hands the terminal to an interactive subshell in `cwd` and takes it
/// back when the shell exits. Pending input queued while the shell ran
/// is drained so it cannot leak into the browser.
fn run_shell(cwd: &Path) -> io::Result<()> {
    let mut stdout = std::io::stdout();
    crossterm::terminal::disable_raw_mode().ok();
    execute!(stdout, LeaveAlternateScreen)?;
    let status = std::process::Command::new(config::shell())
        .current_dir(cwd)
        .status();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All), MoveTo(0, 0))?;
    crossterm::terminal::enable_raw_mode().ok();
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read();
    }
    status.map(|_| ())
}

pub fn run(path: &Path, sort: SortMode) -> io::Result<()> {
    let app = App::new(path, sort)?;
    let config = ProgramConfig::fullscreen();
    let mut program = Program::with_config(app, config)?;
    program.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn app_in(dir: &Path) -> App {
        let app = App::new(dir, SortMode::NameAsc).unwrap();
        let mut view = app.screen.view.borrow_mut();
        view.width = 80;
        view.height = 10;
        drop(view);
        app
    }

    #[test]
    fn open_descends_and_back_returns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("inner")).unwrap();
        File::create(dir.path().join("inner").join("leaf")).unwrap();
        let mut app = app_in(dir.path());
        app.apply(Action::Open).unwrap();
        let inner = app.screen.content.as_dir().unwrap();
        assert_eq!(inner.path, dir.path().join("inner"));
        app.apply(Action::Back).unwrap();
        assert_eq!(app.screen.content.as_dir().unwrap().path, dir.path());
    }

    #[test]
    fn marking_steps_the_cursor_down() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let mut app = app_in(dir.path());
        app.apply(Action::ToggleSelect).unwrap();
        app.apply(Action::Select).unwrap();
        let listing = app.screen.content.as_dir().unwrap();
        assert!(listing.selected(0));
        assert!(listing.selected(1));
        assert!(!listing.selected(2));
        assert_eq!(app.screen.view.borrow().cursor, 2);
        app.apply(Action::Deselect).unwrap();
        assert!(!app.screen.content.as_dir().unwrap().selected(2));
        // marking the last row clamps instead of walking off the end
        assert_eq!(app.screen.view.borrow().cursor, 2);
    }

    #[test]
    fn help_and_info_push_then_pop() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        let mut app = app_in(dir.path());
        app.apply(Action::ShowHelp).unwrap();
        assert!(app.screen.content.as_dir().is_none());
        app.apply(Action::Back).unwrap();
        app.apply(Action::ShowFileInfo).unwrap();
        assert_eq!(app.screen.title, "a.txt");
        app.apply(Action::Back).unwrap();
        assert!(app.screen.content.as_dir().is_some());
    }

    #[test]
    fn go_home_only_applies_to_folder_screens() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.apply(Action::ShowHelp).unwrap();
        app.apply(Action::GoHome).unwrap();
        assert!(app.screen.content.as_dir().is_none());
        assert_eq!(app.screen.title, "help");
        // the screen underneath is still the one we started in
        app.apply(Action::Back).unwrap();
        assert_eq!(app.screen.content.as_dir().unwrap().path, dir.path());
    }

    #[test]
    fn open_failure_leaves_the_screen_in_place() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("gone")).unwrap();
        let mut app = app_in(dir.path());
        std::fs::remove_file(dir.path().join("gone")).unwrap();
        assert!(app.apply(Action::Open).is_err());
        assert_eq!(app.screen.content.as_dir().unwrap().path, dir.path());
    }
}
