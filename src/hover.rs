//! Dwell-based hover detection.
//!
//! A target is "clicked" by holding the pointer still inside it. Each frame
//! the detector scans the targets in order; the first target containing a
//! slow-enough pointer is the hover candidate and later targets are not
//! looked at, so overlapping tiles resolve to the lowest id. Fast movement
//! across a tile never starts or continues a dwell.
//!
//! Selections are edge-triggered: firing clears the hover state, and the
//! pointer has to establish a fresh dwell before anything fires again.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::pointer::Point;
use crate::targets::{Target, TargetId};

pub const DEFAULT_HOVER_THRESHOLD: Duration = Duration::from_millis(500);
/// Display units per millisecond.
pub const DEFAULT_SPEED_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverConfig {
    pub hover_threshold: Duration,
    pub speed_threshold: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            hover_threshold: DEFAULT_HOVER_THRESHOLD,
            speed_threshold: DEFAULT_SPEED_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverState {
    Idle,
    Dwelling {
        target: TargetId,
        since: Instant,
        /// whether the hover cue for this dwell has been handed out
        cued: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    /// The pointer settled on a new target.
    Entered(TargetId),
    /// The dwell on this target crossed the threshold.
    Selected(TargetId),
}

#[derive(Debug, Clone)]
pub struct HoverDetector {
    config: HoverConfig,
    state: HoverState,
}

impl HoverDetector {
    pub fn new(config: HoverConfig) -> Self {
        Self {
            config,
            state: HoverState::Idle,
        }
    }

    pub fn update(
        &mut self,
        pointer: Point,
        speed: f64,
        targets: &[Target],
        now: Instant,
    ) -> Option<HoverEvent> {
        let mut hovering = false;
        let mut event = None;

        for target in targets {
            if !target.contains(pointer) {
                continue;
            }

            if speed >= self.config.speed_threshold {
                // moving too fast to count as a dwell
                self.clear();
                continue;
            }

            match self.state {
                HoverState::Dwelling {
                    target: active,
                    since,
                    ..
                } if active == target.id => {
                    if now.saturating_duration_since(since) > self.config.hover_threshold {
                        debug!(target = target.id.0, label = %target.label, "dwell selected");
                        self.clear();
                        return Some(HoverEvent::Selected(target.id));
                    }
                }
                _ => {
                    debug!(target = target.id.0, label = %target.label, "hover entered");
                    self.state = HoverState::Dwelling {
                        target: target.id,
                        since: now,
                        cued: false,
                    };
                    event = Some(HoverEvent::Entered(target.id));
                }
            }

            hovering = true;
            break;
        }

        if !hovering && self.active().is_some() {
            self.clear();
        }

        event
    }

    pub fn clear(&mut self) {
        self.state = HoverState::Idle;
    }

    pub fn active(&self) -> Option<TargetId> {
        match self.state {
            HoverState::Idle => None,
            HoverState::Dwelling { target, .. } => Some(target),
        }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Returns true the first time it is called for the current dwell.
    pub fn take_cue(&mut self) -> bool {
        match &mut self.state {
            HoverState::Dwelling { cued, .. } if !*cued => {
                *cued = true;
                true
            }
            _ => false,
        }
    }

    /// Fraction of the hover threshold elapsed on the active target.
    pub fn dwell_progress(&self, now: Instant) -> f64 {
        match self.state {
            HoverState::Idle => 0.0,
            HoverState::Dwelling { since, .. } => {
                let threshold = self.config.hover_threshold.as_secs_f64();
                if threshold <= 0.0 {
                    return 1.0;
                }
                (now.saturating_duration_since(since).as_secs_f64() / threshold).min(1.0)
            }
        }
    }

    pub fn config(&self) -> HoverConfig {
        self.config
    }
}

impl Default for HoverDetector {
    fn default() -> Self {
        Self::new(HoverConfig::default())
    }
}
