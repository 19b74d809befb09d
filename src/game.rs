//! Per-frame driver state.
//!
//! [`Game`] owns every piece of mutable state the interaction loop needs and is
//! owned in turn by whatever drives the frames. One call to [`Game::frame`] per
//! display refresh moves data one way through the pipeline:
//!
//! raw fingertip → pointer tracker → hover detector → session
//!
//! Renderers read a [`Snapshot`]; they never mutate the game.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use tracing::debug;

use crate::content::WordList;
use crate::cues::{Cue, CuePlayer};
use crate::hover::{HoverConfig, HoverDetector, HoverEvent};
use crate::pointer::{CaptureFrame, DisplaySize, Point, PointerSample, PointerTracker};
use crate::session::{GamePhase, Session, SessionConfig, Verdict};
use crate::targets::{Target, TargetId, TileLayout};

/// How long a verdict stays visible in snapshots.
pub const VERDICT_FLASH: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSettings {
    pub hover: HoverConfig,
    pub session: SessionConfig,
    pub smoothing_window: usize,
    pub margin: f64,
    pub tile_size: f64,
    pub baseline_offset: f64,
}

impl GameSettings {
    pub fn layout(&self, display: DisplaySize) -> TileLayout {
        TileLayout {
            display,
            margin: self.margin,
            tile_size: self.tile_size,
            baseline_offset: self.baseline_offset,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            hover: HoverConfig::default(),
            session: SessionConfig::default(),
            smoothing_window: crate::pointer::DEFAULT_SMOOTHING_WINDOW,
            margin: crate::targets::DEFAULT_MARGIN,
            tile_size: crate::targets::DEFAULT_TILE_SIZE,
            baseline_offset: crate::targets::DEFAULT_BASELINE_OFFSET,
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub sample: Option<PointerSample>,
    pub hover: Option<HoverEvent>,
    pub verdict: Option<Verdict>,
}

/// Read-only view of the game for presentation.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub pointer: Option<Point>,
    pub hovered: Option<TargetId>,
    pub dwell_progress: f64,
    pub targets: &'a [Target],
    pub prompt: &'a str,
    pub typed: &'a str,
    pub score: u32,
    pub streak: u32,
    pub win_streak: u32,
    /// Most recent verdict, while it is still fresh.
    pub flash: Option<Verdict>,
    pub display: DisplaySize,
}

pub struct Game {
    settings: GameSettings,
    display: DisplaySize,
    capture: CaptureFrame,
    tracker: PointerTracker,
    hover: HoverDetector,
    session: Session,
    cues: Option<Box<dyn CuePlayer>>,
    last_verdict: Option<(Verdict, Instant)>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("display", &self.display)
            .field("capture", &self.capture)
            .field("hover", &self.hover)
            .field("session", &self.session)
            .field("cues", &self.cues.is_some())
            .finish()
    }
}

impl Game {
    pub fn new(
        content: WordList,
        settings: GameSettings,
        display: DisplaySize,
        capture: CaptureFrame,
        rng: StdRng,
    ) -> Self {
        Self {
            session: Session::new(content, settings.session, settings.layout(display), rng),
            tracker: PointerTracker::new(settings.smoothing_window),
            hover: HoverDetector::new(settings.hover),
            settings,
            display,
            capture,
            cues: None,
            last_verdict: None,
        }
    }

    pub fn with_cues(mut self, cues: Box<dyn CuePlayer>) -> Self {
        self.cues = Some(cues);
        self
    }

    /// Advance one frame. `fingertip` is in capture-frame coordinates, `None`
    /// when tracking found no hand.
    pub fn frame(&mut self, fingertip: Option<Point>, now: Instant) -> FrameReport {
        if self.session.phase() == GamePhase::GameOver {
            // tracking is not consulted on the game over screen
            self.tracker.lose();
            self.hover.clear();
            return FrameReport::default();
        }

        let raw = match fingertip {
            Some(raw) => raw,
            None => {
                self.tracker.lose();
                self.hover.clear();
                return FrameReport::default();
            }
        };

        let position = self.capture.to_display(raw, self.display);
        let sample = self.tracker.observe(position, now);
        let hover = self
            .hover
            .update(sample.position, sample.speed, self.session.targets(), now);

        if self.hover.take_cue() {
            self.play(Cue::Hover);
        }

        let verdict = match hover {
            Some(HoverEvent::Selected(id)) => self.select(id, now),
            _ => None,
        };

        FrameReport {
            sample: Some(sample),
            hover,
            verdict,
        }
    }

    fn select(&mut self, id: TargetId, now: Instant) -> Option<Verdict> {
        let label = self.session.targets().get(id.0)?.label;
        let verdict = self.session.select(label);
        debug!(%label, ?verdict, score = self.session.score(), "letter selected");

        match verdict {
            Verdict::Ignored => return Some(verdict),
            v if v.is_correct() => self.play(Cue::Correct),
            _ => self.play(Cue::Wrong),
        }

        // targets may have been regenerated, ids no longer refer to the same tiles
        self.hover.clear();
        self.last_verdict = Some((verdict, now));
        Some(verdict)
    }

    fn play(&mut self, cue: Cue) {
        if let Some(cues) = self.cues.as_mut() {
            cues.play(cue);
        }
    }

    /// Start over. Every piece of session, pointer and hover state resets.
    pub fn restart(&mut self) {
        self.session.restart();
        self.tracker.lose();
        self.hover.clear();
        self.last_verdict = None;
    }

    pub fn resize(&mut self, display: DisplaySize) {
        self.display = display;
        self.session.resize(self.settings.layout(display));
        // smoothed history is in the old display's coordinates
        self.tracker.lose();
        self.hover.clear();
    }

    pub fn snapshot(&self, now: Instant) -> Snapshot<'_> {
        let flash = self
            .last_verdict
            .filter(|(_, at)| now.saturating_duration_since(*at) < VERDICT_FLASH)
            .map(|(v, _)| v);

        Snapshot {
            phase: self.session.phase(),
            pointer: self.tracker.position(),
            hovered: self.hover.active(),
            dwell_progress: self.hover.dwell_progress(now),
            targets: self.session.targets(),
            prompt: self.session.prompt(),
            typed: self.session.typed(),
            score: self.session.score(),
            streak: self.session.consecutive_correct(),
            win_streak: self.settings.session.win_streak,
            flash,
            display: self.display,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn hover(&self) -> &HoverDetector {
        &self.hover
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn capture(&self) -> CaptureFrame {
        self.capture
    }

    pub fn set_capture(&mut self, capture: CaptureFrame) {
        self.capture = capture;
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }
}
