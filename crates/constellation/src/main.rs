use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use constellation_background::{ConstellationBackground, MountOptions};
use constellation_config::Config;
use constellation_core::Theme;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use tracing::{info, warn};

mod host;
mod logging;

use host::TerminalHost;

/// How long to wait for input when no frame is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// An animated constellation background for your terminal.
#[derive(Debug, Parser)]
#[command(name = "constellation", version, about, long_about = None)]
struct Cli {
    /// Palette: "dark", anything else selects the light palette
    #[arg(short, long, value_name = "NAME")]
    theme: Option<String>,

    /// Tag for the drawing surface
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Draw one static frame instead of animating
    #[arg(long)]
    reduced_motion: bool,

    /// Use this config file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init()?;

    let (mut config, config_path) = match cli.config {
        Some(path) => (Config::load_from(&path)?, Some(path)),
        None => (Config::load(), Config::path().ok()),
    };
    if let Some(name) = cli.theme.as_deref() {
        config.theme = Theme::from_name(name);
    }
    config.reduced_motion |= cli.reduced_motion;

    let terminal = ratatui::init();
    let result = run(terminal, config, config_path, cli.id);
    ratatui::restore();
    result
}

/// Mount the app on the initialized terminal and run it to completion.
fn run(
    terminal: DefaultTerminal,
    config: Config,
    config_path: Option<PathBuf>,
    id: Option<String>,
) -> color_eyre::Result<()> {
    let size = terminal.size()?;
    App::new(config, config_path, id, size.width, size.height).run(terminal)
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Active settings.
    config: Config,
    /// Where theme changes are persisted, if anywhere.
    config_path: Option<PathBuf>,
    /// Surface tag handed to every mount.
    id: Option<String>,
    /// The mounted background.
    background: ConstellationBackground<TerminalHost>,
}

impl App {
    /// Construct a new instance of [`App`] for a `cols` x `rows` terminal.
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        id: Option<String>,
        cols: u16,
        rows: u16,
    ) -> Self {
        let background = mount(&config, config.theme, id.clone(), cols, rows);
        Self {
            running: false,
            config,
            config_path,
            id,
            background,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            self.deliver_frame(Instant::now());
        }
        self.background.teardown();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(self.background.host().canvas_view(), area);

        let [_, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let accent: Color = self.background.palette().dot.into();
        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "t".bold().fg(accent),
            format!(" theme ({})", self.config.theme).dark_gray(),
        ])
        .centered();
        frame.render_widget(help, help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the time until the next scheduled frame.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self
            .background
            .host()
            .time_until_frame(Instant::now())
            .unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Run the background's frame callback if its frame is due.
    fn deliver_frame(&mut self, now: Instant) {
        if let Some(handle) = self.background.host_mut().take_due_frame(now) {
            self.background.on_frame(handle);
        }
    }

    /// Pass a terminal resize on to the background.
    fn on_resize(&mut self, cols: u16, rows: u16) {
        let host = self.background.host_mut();
        host.set_size(cols, rows);
        if host.has_resize_listener() {
            self.background.on_resize();
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.toggle_theme(),
            _ => {}
        }
    }

    /// Switch palettes. The old background is torn down and a fresh one
    /// mounted, so the particle population is regenerated.
    fn toggle_theme(&mut self) {
        let theme = self.config.theme.toggle();
        let (cols, rows) = self.background.host().size();
        self.background.teardown();
        self.background = mount(&self.config, theme, self.id.clone(), cols, rows);
        self.config.theme = theme;
        info!(%theme, "switched theme");

        if let Some(path) = &self.config_path {
            if let Err(e) = Config::save_theme_to(path, theme) {
                warn!("could not save theme preference: {e}");
            }
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Mount a background filling a `cols` x `rows` terminal.
fn mount(
    config: &Config,
    theme: Theme,
    id: Option<String>,
    cols: u16,
    rows: u16,
) -> ConstellationBackground<TerminalHost> {
    let host = TerminalHost::new(config, theme, cols, rows);
    ConstellationBackground::mount(host, MountOptions { theme, id })
}
