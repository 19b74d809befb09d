use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::game::GameSettings;
use crate::hover::HoverConfig;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub hover_threshold_ms: u64,
    pub speed_threshold: f64,
    pub smoothing_window: usize,
    pub tile_count: usize,
    pub tile_size: f64,
    pub margin: f64,
    pub baseline_offset: f64,
    pub win_streak: u32,
    pub letter_points: u32,
    pub word_bonus: u32,
    pub word_list: Option<PathBuf>,
    pub mute: bool,
}

impl Default for Config {
    fn default() -> Self {
        let settings = GameSettings::default();
        Self {
            hover_threshold_ms: settings.hover.hover_threshold.as_millis() as u64,
            speed_threshold: settings.hover.speed_threshold,
            smoothing_window: settings.smoothing_window,
            tile_count: settings.session.tile_count,
            tile_size: settings.tile_size,
            margin: settings.margin,
            baseline_offset: settings.baseline_offset,
            win_streak: settings.session.win_streak,
            letter_points: settings.session.letter_points,
            word_bonus: settings.session.word_bonus,
            word_list: None,
            mute: false,
        }
    }
}

impl Config {
    /// Clamp values that would leave the game unplayable.
    pub fn validated(mut self) -> Self {
        self.smoothing_window = self.smoothing_window.max(1);
        self.tile_count = self.tile_count.max(1);
        self.win_streak = self.win_streak.max(1);
        if !self.speed_threshold.is_finite() || self.speed_threshold <= 0.0 {
            self.speed_threshold = Config::default().speed_threshold;
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            self.tile_size = Config::default().tile_size;
        }
        self
    }
}

impl From<&Config> for GameSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            hover: HoverConfig {
                hover_threshold: Duration::from_millis(cfg.hover_threshold_ms),
                speed_threshold: cfg.speed_threshold,
            },
            session: SessionConfig {
                tile_count: cfg.tile_count,
                win_streak: cfg.win_streak,
                letter_points: cfg.letter_points,
                word_bonus: cfg.word_bonus,
            },
            smoothing_window: cfg.smoothing_window,
            margin: cfg.margin,
            tile_size: cfg.tile_size,
            baseline_offset: cfg.baseline_offset,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "hoverspell") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hoverspell_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.validated(),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), "ignoring invalid config: {}", e)
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
