mod ui;

use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin, Write},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, KeyCode,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use hoverspell::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    content::WordList,
    cues::{Cue, CuePlayer},
    game::{Game, GameSettings},
    pointer::{CaptureFrame, DisplaySize, Point},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    session::GamePhase,
};

const TICK_RATE_MS: u64 = 33;

/// Virtual display units covered by one terminal cell.
pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 20.0;

/// dwell-to-select spelling game for the terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Spell the English word for each Chinese prompt by resting the mouse pointer on letter tiles. Five words in a row wins."
)]
pub struct Cli {
    /// milliseconds the pointer must rest on a tile to pick it
    #[clap(long)]
    hover_ms: Option<u64>,

    /// pointer speed (display units per ms) above which a dwell is cancelled
    #[clap(long)]
    speed_threshold: Option<f64>,

    /// number of recent pointer positions averaged together
    #[clap(long)]
    smoothing_window: Option<usize>,

    /// number of letter tiles per word
    #[clap(short = 't', long)]
    tiles: Option<usize>,

    /// words in a row needed to win
    #[clap(short = 'n', long)]
    win_streak: Option<u32>,

    /// JSON word list to use instead of the built-in one
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// seed for shuffling words and tiles
    #[clap(long)]
    seed: Option<u64>,

    /// do not ring the terminal bell
    #[clap(long)]
    mute: bool,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay the flags given on the command line onto stored settings
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(ms) = self.hover_ms {
            cfg.hover_threshold_ms = ms;
        }
        if let Some(speed) = self.speed_threshold {
            cfg.speed_threshold = speed;
        }
        if let Some(window) = self.smoothing_window {
            cfg.smoothing_window = window;
        }
        if let Some(tiles) = self.tiles {
            cfg.tile_count = tiles;
        }
        if let Some(streak) = self.win_streak {
            cfg.win_streak = streak;
        }
        if let Some(ref words) = self.words {
            cfg.word_list = Some(words.clone());
        }
        if self.mute {
            cfg.mute = true;
        }
        cfg.validated()
    }
}

/// Rings the terminal bell on verdicts. Hover cues stay silent.
struct BellCues;

impl CuePlayer for BellCues {
    fn play(&mut self, cue: Cue) {
        tracing::debug!(%cue, "cue");
        if cue != Cue::Hover {
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07").and_then(|_| out.flush());
        }
    }
}

pub fn display_for(columns: u16, rows: u16) -> DisplaySize {
    DisplaySize::new(columns as f64 * CELL_WIDTH, rows as f64 * CELL_HEIGHT)
}

/// The terminal grid is the capture frame; cells map onto the display unmirrored.
pub fn capture_for(columns: u16, rows: u16) -> CaptureFrame {
    CaptureFrame::new(columns as f64, rows as f64, false)
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub pointer: Option<(u16, u16)>,
    pub area: Rect,
    clock: Instant,
}

impl App {
    pub fn new(cfg: &Config, words: WordList, seed: Option<u64>, area: Rect) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut game = Game::new(
            words,
            GameSettings::from(cfg),
            display_for(area.width, area.height),
            capture_for(area.width, area.height),
            rng,
        );
        if !cfg.mute {
            game = game.with_cues(Box::new(BellCues));
        }

        Self {
            game,
            pointer: None,
            area,
            clock: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock
    }

    /// One display refresh: feed the last known pointer cell to the game.
    pub fn on_tick(&mut self, now: Instant) {
        self.clock = now;
        let fingertip = self
            .pointer
            .map(|(column, row)| Point::new(column as f64 + 0.5, row as f64 + 0.5));
        self.game.frame(fingertip, now);
    }

    pub fn on_resize(&mut self, columns: u16, rows: u16) {
        self.area = Rect::new(0, 0, columns, rows);
        self.game.set_capture(capture_for(columns, rows));
        self.game.resize(display_for(columns, rows));
    }

    pub fn on_click(&mut self, column: u16, row: u16) {
        if self.game.phase() == GamePhase::GameOver
            && ui::restart_button(self.area).contains(Position::new(column, row))
        {
            self.restart();
        }
    }

    pub fn restart(&mut self) {
        tracing::info!("restart requested");
        self.pointer = None;
        self.game.restart();
    }
}

fn load_words(cfg: &Config) -> Result<WordList, Box<dyn Error>> {
    let words = match cfg.word_list {
        Some(ref path) => WordList::from_path(path).map_err(|e| {
            tracing::warn!(path = %path.display(), "failed to load word list: {}", e);
            e
        })?,
        None => WordList::builtin()?,
    };
    tracing::info!(list = words.name(), count = words.len(), "word list loaded");
    Ok(words)
}

fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        return;
    }
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let cfg = cli.apply(store.load());
    if cli.save_config {
        store.save(&cfg)?;
    }
    let words = load_words(&cfg)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(&cfg, words, cli.seed, Rect::new(0, 0, size.width, size.height));
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let mut last_tick = Instant::now();
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Tick => {}
            GameEvent::Pointer { column, row } => {
                app.pointer = Some((column, row));
            }
            GameEvent::PointerLost => {
                app.pointer = None;
            }
            GameEvent::Click { column, row } => {
                app.pointer = Some((column, row));
                app.on_click(column, row);
            }
            GameEvent::Resize(columns, rows) => {
                app.on_resize(columns, rows);
            }
            GameEvent::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char('r') | KeyCode::Enter
                    if app.game.phase() == GamePhase::GameOver =>
                {
                    app.restart();
                }
                _ => {}
            },
        }

        // frames advance on the tick cadence no matter how busy the input is
        let now = Instant::now();
        if now.duration_since(last_tick) >= runner.interval() {
            last_tick = now;
            app.on_tick(now);
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
