//! Application state, event handling and screen routing.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use lumen_background::{
    BackgroundOptions, BackgroundSettings, BackgroundState, HostEvents, NetworkSettings,
    StreamSettings,
};
use lumen_config::AppConfig;
use lumen_core::{BackgroundKind, Clock, DisplayMode, SystemClock, Viewport};
use lumen_forms::{FormEvent, LoginPage, SiteSetupPage};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Position, Size},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Clear, Paragraph},
};

/// Longest time to wait for input when nothing else is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Which page is in front of the background.
#[derive(Debug)]
enum Screen {
    Home,
    Login(LoginPage),
    SiteSetup(SiteSetupPage),
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    config: AppConfig,
    /// Where display mode changes are persisted, if anywhere. Only the
    /// mode is written back, the rest of `config` is session state.
    config_path: Option<PathBuf>,
    mode: DisplayMode,
    clock: Box<dyn Clock>,
    host: HostEvents,
    settings: BackgroundSettings,
    background: BackgroundState,
    home_background: BackgroundKind,
    screen: Screen,
    /// Set by a page's back callback, consumed on the next tick.
    go_home: Rc<Cell<bool>>,
    terminal_size: Size,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        Self::with_clock(config, config_path, SystemClock::new())
    }

    pub fn with_clock(
        config: AppConfig,
        config_path: Option<PathBuf>,
        clock: impl Clock + 'static,
    ) -> Self {
        let settings = background_settings(&config);
        let mode = config.appearance.mode;
        let home_background = config.backgrounds.home;
        Self {
            running: false,
            background: BackgroundState::new(home_background, &settings, mode),
            settings,
            mode,
            home_background,
            config,
            config_path,
            clock: Box::new(clock),
            host: HostEvents::new(),
            screen: Screen::Home,
            go_home: Rc::new(Cell::new(false)),
            terminal_size: Size::new(0, 0),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.resize(terminal.size()?);
        while self.running {
            self.tick();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.background.teardown(&mut self.host);
        Ok(())
    }

    /// Advance forms and the background to the current time.
    fn tick(&mut self) {
        let now = self.clock.now_ms();
        match &mut self.screen {
            Screen::Home => {}
            Screen::Login(page) => {
                page.form_mut().tick(now);
            }
            Screen::SiteSetup(page) => {
                page.form_mut().tick(now);
            }
        }
        if self.go_home.take() {
            self.show_home();
        }
        self.background.tick(now);
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(&self.background, area);

        let [body, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        match &self.screen {
            Screen::Home => self.render_home(frame, body),
            Screen::Login(page) => frame.render_widget(page.form(), body),
            Screen::SiteSetup(page) => frame.render_widget(page.form(), body),
        }
        frame.render_widget(self.help_line(), help);
    }

    fn render_home(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let accent = self.accent();
        let lines = vec![
            Line::from("lumen".bold().fg(accent)),
            Line::from("Sign in, or set up a new site.".dark_gray()),
            Line::from(""),
            Line::from(vec!["l".bold().fg(accent), "  sign in".into()]),
            Line::from(vec!["s".bold().fg(accent), "  set up a site".into()]),
        ];

        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(lines.len() as u16 + 2),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, panel, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(40.min(area.width)),
            Constraint::Fill(1),
        ])
        .areas(middle);

        let (bg, fg) = match self.mode {
            DisplayMode::Dark => (Color::Rgb(15, 23, 42), Color::Rgb(226, 232, 240)),
            DisplayMode::Light => (Color::Rgb(255, 255, 255), Color::Rgb(15, 23, 42)),
        };
        frame.render_widget(Clear, panel);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(Style::new().fg(accent)))
                .style(Style::new().bg(bg).fg(fg)),
            panel,
        );
    }

    fn help_line(&self) -> Line<'static> {
        let accent = self.accent();
        let mut spans = match self.screen {
            Screen::Home => vec![
                "q".bold().fg(accent),
                " quit  ".dark_gray(),
                "b".bold().fg(accent),
                format!(" background: {}  ", self.background.kind().name()).dark_gray(),
                "d".bold().fg(accent),
            ],
            Screen::Login(_) | Screen::SiteSetup(_) => vec![
                "esc".bold().fg(accent),
                " back  ".dark_gray(),
                "ctrl+d".bold().fg(accent),
            ],
        };
        spans.push(format!(" mode: {}", self.mode.name()).dark_gray());
        Line::from(spans).centered()
    }

    fn accent(&self) -> Color {
        match self.mode {
            DisplayMode::Dark => Color::Rgb(34, 211, 238),
            DisplayMode::Light => Color::Rgb(2, 132, 199),
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the next frame or form deadline.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.poll_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                        self.host
                            .dispatch_pointer_move(Position::new(mouse.column, mouse.row));
                    }
                }
                Event::Resize(width, height) => self.resize(Size::new(width, height)),
                _ => {}
            }
        }
        Ok(())
    }

    fn poll_timeout(&self) -> Duration {
        let now = self.clock.now_ms();
        let form_deadline = match &self.screen {
            Screen::Home => None,
            Screen::Login(page) => page.form().time_until_complete(now),
            Screen::SiteSetup(page) => page.form().time_until_complete(now),
        };
        [self.background.time_until_next_frame(now), form_deadline]
            .into_iter()
            .flatten()
            .map(Duration::from_millis)
            .fold(IDLE_POLL, Duration::min)
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
                return self.quit();
            }
            (KeyModifiers::CONTROL, KeyCode::Char('d') | KeyCode::Char('D')) => {
                return self.toggle_mode();
            }
            _ => {}
        }

        let now = self.clock.now_ms();
        match &mut self.screen {
            Screen::Home => {}
            Screen::Login(page) => {
                if page.form_mut().handle_key(key, now) == FormEvent::Submitted {
                    tracing::info!(
                        email = page.email(),
                        password_set = !page.password().is_empty(),
                        "sign-in submitted"
                    );
                }
            }
            Screen::SiteSetup(page) => {
                if page.form_mut().handle_key(key, now) == FormEvent::Submitted {
                    tracing::info!(
                        site = page.site_name(),
                        url = page.site_url(),
                        admin = page.admin_email(),
                        password_set = !page.admin_password().is_empty(),
                        "site setup submitted"
                    );
                }
            }
        }
        if matches!(self.screen, Screen::Home) {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.quit(),
                KeyCode::Char('l') => self.show_login(),
                KeyCode::Char('s') => self.show_site_setup(),
                KeyCode::Char('b') => self.cycle_home_background(),
                KeyCode::Char('d') => self.toggle_mode(),
                _ => {}
            }
        } else if self.go_home.take() {
            self.show_home();
        }
    }

    fn back_callback(&self) -> impl FnMut() + 'static {
        let go_home = self.go_home.clone();
        move || go_home.set(true)
    }

    fn show_home(&mut self) {
        self.screen = Screen::Home;
        self.switch_background(self.home_background);
    }

    fn show_login(&mut self) {
        let mut page = LoginPage::new(self.config.forms.submit_delay_ms, self.back_callback());
        page.form_mut().set_mode(self.mode);
        self.screen = Screen::Login(page);
        self.switch_background(self.config.backgrounds.login);
    }

    fn show_site_setup(&mut self) {
        let mut page =
            SiteSetupPage::new(self.config.forms.submit_delay_ms, self.back_callback());
        page.form_mut().set_mode(self.mode);
        self.screen = Screen::SiteSetup(page);
        self.switch_background(self.config.backgrounds.site_setup);
    }

    fn cycle_home_background(&mut self) {
        self.home_background = self.home_background.next();
        self.switch_background(self.home_background);
    }

    /// Tear down the current background and mount one of `kind`.
    fn switch_background(&mut self, kind: BackgroundKind) {
        if kind == self.background.kind() && self.background.is_mounted() {
            return;
        }
        self.background.teardown(&mut self.host);
        self.background = BackgroundState::new(kind, &self.settings, self.mode);
        let now = self.clock.now_ms();
        self.background
            .mount(&mut self.host, self.terminal_size, now);
    }

    fn resize(&mut self, size: Size) {
        self.terminal_size = size;
        if self.background.is_mounted() {
            self.host.dispatch_resize(size);
        } else {
            let now = self.clock.now_ms();
            self.background.mount(&mut self.host, size, now);
        }
    }

    /// Switch between dark and light palettes and remember the choice.
    fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
        let now = self.clock.now_ms();
        self.background.set_mode(&mut self.host, self.mode, now);
        match &mut self.screen {
            Screen::Home => {}
            Screen::Login(page) => page.form_mut().set_mode(self.mode),
            Screen::SiteSetup(page) => page.form_mut().set_mode(self.mode),
        }

        self.config.appearance.mode = self.mode;
        if let Some(path) = &self.config_path
            && let Err(err) = lumen_config::save_mode(path, self.mode)
        {
            tracing::warn!(%err, "failed to save display mode");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Build background settings from the configuration file.
fn background_settings(config: &AppConfig) -> BackgroundSettings {
    BackgroundSettings {
        options: BackgroundOptions {
            viewport: Viewport::new(config.viewport.cell_width, config.viewport.cell_height),
            frame_rate: config.backgrounds.frame_rate,
            seed: config.backgrounds.seed.unwrap_or_else(time_seed),
        },
        network: NetworkSettings {
            node_count: config.network.node_count,
            ..NetworkSettings::default()
        },
        particles: StreamSettings {
            particle_count: config.particles.particle_count,
            ..StreamSettings::default()
        },
    }
}

/// Seed derived from the system time.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::ManualClock;
    use ratatui::{Terminal, backend::TestBackend};

    fn app(clock: &ManualClock) -> App {
        let mut config = AppConfig::default();
        config.backgrounds.seed = Some(1);
        let mut app = App::with_clock(config, None, clock.clone());
        app.resize(Size::new(80, 24));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_mounts_home_background_on_first_size() {
        let clock = ManualClock::new(0);
        let app = app(&clock);
        assert!(app.background.is_mounted());
        assert_eq!(app.background.kind(), BackgroundKind::Network);
        assert_eq!(app.host.pointer_listener_count(), 1);
    }

    #[test]
    fn test_login_submit_returns_home_after_delay() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock);

        press(&mut app, KeyCode::Char('l'));
        assert!(matches!(app.screen, Screen::Login(_)));
        for c in "me@example.com".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        clock.advance(1000);
        app.tick();
        assert!(matches!(app.screen, Screen::Login(_)));

        clock.advance(500);
        app.tick();
        assert!(matches!(app.screen, Screen::Home));
        assert_eq!(app.host.pointer_listener_count(), 1);
        assert_eq!(app.host.resize_listener_count(), 1);
    }

    #[test]
    fn test_site_setup_uses_particles_and_escape_goes_home() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock);

        press(&mut app, KeyCode::Char('s'));
        assert!(matches!(app.screen, Screen::SiteSetup(_)));
        assert_eq!(app.background.kind(), BackgroundKind::Particles);
        assert_eq!(app.background.entity_count(), 150);

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.screen, Screen::Home));
        assert_eq!(app.background.kind(), BackgroundKind::Network);
        assert_eq!(app.host.pointer_listener_count(), 1);
    }

    #[test]
    fn test_toggle_mode_reaches_background_and_form() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock);
        press(&mut app, KeyCode::Char('l'));
        app.on_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));

        assert_eq!(app.mode, DisplayMode::Light);
        assert_eq!(app.background.mode(), DisplayMode::Light);
        match &app.screen {
            Screen::Login(page) => assert_eq!(page.form().mode(), DisplayMode::Light),
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn test_toggle_mode_saves_only_mode() {
        use crate::cli::Cli;
        use clap::Parser;

        let dir = std::env::temp_dir().join(format!("lumen-app-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        Cli::parse_from(["lumen", "--seed", "7", "--background", "particles"]).apply(&mut config);
        let clock = ManualClock::new(0);
        let mut app = App::with_clock(config, Some(path.clone()), clock);
        app.resize(Size::new(80, 24));
        assert_eq!(app.background.kind(), BackgroundKind::Particles);

        app.on_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));

        let saved = AppConfig::load_from(&path).expect("load");
        assert_eq!(saved.appearance.mode, DisplayMode::Light);
        assert_eq!(saved.backgrounds.seed, None);
        assert_eq!(saved.backgrounds.home, BackgroundKind::Network);
        assert_eq!(app.config.backgrounds.seed, Some(7));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cycle_home_background() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.background.kind(), BackgroundKind::Particles);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.background.kind(), BackgroundKind::Network);
        assert_eq!(app.host.resize_listener_count(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock);
        app.running = true;
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);

        let mut app = self::app(&clock);
        app.running = true;
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_poll_timeout_bounded_by_frame() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock);
        app.tick();
        assert!(app.poll_timeout() <= Duration::from_millis(16));
    }

    #[test]
    fn test_render_draws_form_over_background() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock);
        press(&mut app, KeyCode::Char('l'));
        app.tick();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        terminal.draw(|frame| app.render(frame)).expect("draw");
        let buffer = terminal.backend().buffer();
        let screen: String = (0..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect();
        assert!(screen.contains("Sign in"));
        assert!(screen.contains("esc"));
        assert_eq!(buffer[(0, 0)].symbol(), "▀");
    }
}
