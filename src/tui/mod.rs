//! TUI module - screens and event loop with ratatui

mod screens;

use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::error;

use crate::auth::{self, LoginOutcome};
use crate::session::Session;
use crate::store::{HistoryEntry, Store};
use crate::theme::ThemeState;
use crate::workouts;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Home,
    WorkoutDetail,
    History,
}

/// Login form field with focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub show_password: bool,
    pub error: Option<&'static str>,
}

impl LoginForm {
    fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}

/// App state for TUI
pub struct App {
    store: Store,
    theme: ThemeState,
    nav: Vec<Screen>,
    login: LoginForm,
    selected: usize,
    session: Option<Session>,
    history: Vec<HistoryEntry>,
    last_tick: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(store: Store) -> Self {
        let theme = ThemeState::load(&store);
        // Token or stored credentials skip the login screen entirely
        let nav = if auth::check(&store).is_signed_in() {
            vec![Screen::Home]
        } else {
            vec![Screen::Auth]
        };
        Self {
            store,
            theme,
            nav,
            login: LoginForm::default(),
            selected: 0,
            session: None,
            history: Vec::new(),
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| screens::render(self, frame))?;
            self.handle_events()?;
            self.advance_clock();
        }

        restore_terminal()?;
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        self.nav.last().copied().unwrap_or(Screen::Auth)
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login
    }

    pub fn selected_workout(&self) -> usize {
        self.selected
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Push a screen. Entering the history view re-reads the stored list,
    /// so it always shows appends made since the last visit.
    fn navigate(&mut self, screen: Screen) {
        if screen == Screen::History {
            self.history = self.store.load_history();
        }
        self.nav.push(screen);
    }

    /// Replace the whole stack (login/logout transitions - no back route).
    fn navigate_root(&mut self, screen: Screen) {
        self.nav.clear();
        self.navigate(screen);
    }

    fn go_back(&mut self) {
        if self.nav.len() > 1
            && let Some(left) = self.nav.pop()
            && left == Screen::WorkoutDetail
        {
            // Leaving the countdown screen abandons the run
            self.session = None;
        }
    }

    /// Derive 1 Hz ticks from the monotonic clock while a countdown runs,
    /// and finish the session once the last countdown has elapsed.
    fn advance_clock(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.running && self.last_tick.elapsed() >= TICK_INTERVAL {
            session.tick();
            self.last_tick += TICK_INTERVAL;
        }
        if session.finished {
            self.complete_workout();
        }
    }

    /// Terminal transition: record the completed workout once and move to
    /// the history view. A failed write is logged, never shown.
    fn complete_workout(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let entry = HistoryEntry {
            name: session.workout().name.to_string(),
            date: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        };
        if let Err(e) = self.store.append_history(entry) {
            error!("Failed to save workout history: {}", e);
        }
        self.go_back();
        self.navigate(Screen::History);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }
        match self.screen() {
            Screen::Auth => self.handle_auth_key(key)?,
            Screen::Home => self.handle_home_key(key)?,
            Screen::WorkoutDetail => self.handle_detail_key(key),
            Screen::History => self.handle_history_key(key),
        }
        Ok(())
    }

    fn handle_auth_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('r') {
                self.login.show_password = !self.login.show_password;
            }
            return Ok(());
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => self.login.switch_focus(),
            KeyCode::Enter => self.submit_login()?,
            KeyCode::Backspace => {
                self.login.focused_field_mut().pop();
            }
            KeyCode::Char(c) => self.login.focused_field_mut().push(c),
            _ => {}
        }
        Ok(())
    }

    fn submit_login(&mut self) -> Result<()> {
        match auth::login(&self.store, &self.login.email, &self.login.password)? {
            LoginOutcome::Success => {
                self.login.error = None;
                self.navigate_root(Screen::Home);
            }
            LoginOutcome::EmptyFields => {
                self.login.error = Some("Please enter both email and password.");
            }
        }
        Ok(())
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < workouts::all().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                let workout = &workouts::all()[self.selected];
                self.session = Some(Session::new(workout));
                self.navigate(Screen::WorkoutDetail);
            }
            KeyCode::Char('t') => self.theme.toggle(&self.store),
            KeyCode::Char('h') => self.navigate(Screen::History),
            KeyCode::Char('l') => self.logout()?,
            _ => {}
        }
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        auth::logout(&self.store)?;
        // The wipe reset the persisted flag; follow it in memory
        self.theme = ThemeState::load(&self.store);
        self.login = LoginForm::default();
        self.session = None;
        self.navigate_root(Screen::Auth);
        Ok(())
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => {
                if session.shows_start() {
                    session.start();
                    self.last_tick = Instant::now();
                }
            }
            KeyCode::Char('p') => session.pause(),
            KeyCode::Char('n') => session.advance(),
            KeyCode::Char('t') => self.theme.toggle(&self.store),
            KeyCode::Esc | KeyCode::Char('b') => self.go_back(),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('t') => self.theme.toggle(&self.store),
            KeyCode::Esc | KeyCode::Char('b') => self.go_back(),
            _ => {}
        }
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
