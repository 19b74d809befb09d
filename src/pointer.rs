//! Pointer smoothing and speed estimation.
//!
//! Raw landmark coordinates arrive in the capture frame's space. They are
//! mapped into display space, averaged over a short window to take the jitter
//! out of the tracker, and differentiated against the previous smoothed sample
//! to get a speed in display units per millisecond.

use std::collections::VecDeque;
use std::time::Instant;

use crate::util::{distance, mean};

pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        distance((self.x, self.y), (other.x, other.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Width and height of the surface the game is laid out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Coordinate space of the landmark source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureFrame {
    pub width: f64,
    pub height: f64,
    /// Camera feeds are shown mirrored, so their x axis must be flipped.
    pub mirror: bool,
}

impl CaptureFrame {
    pub fn new(width: f64, height: f64, mirror: bool) -> Self {
        Self {
            width,
            height,
            mirror,
        }
    }

    /// Scale a raw capture point into display space, flipping x when mirrored.
    pub fn to_display(&self, raw: Point, display: DisplaySize) -> Point {
        let scale_x = if self.width > 0.0 {
            display.width / self.width
        } else {
            0.0
        };
        let scale_y = if self.height > 0.0 {
            display.height / self.height
        } else {
            0.0
        };

        let x = raw.x * scale_x;
        let y = raw.y * scale_y;

        if self.mirror {
            Point::new(display.width - x, y)
        } else {
            Point::new(x, y)
        }
    }
}

/// Moving average over the last `window` raw points.
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    window: usize,
    history: VecDeque<Point>,
}

impl PositionSmoother {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            history: VecDeque::with_capacity(window),
        }
    }

    pub fn observe(&mut self, raw: Point) -> Point {
        self.history.push_back(raw);
        while self.history.len() > self.window {
            self.history.pop_front();
        }

        // history is non-empty here, the fallback is never taken
        self.current().unwrap_or(raw)
    }

    /// Mean of the buffered points, `None` when nothing has been observed.
    pub fn current(&self) -> Option<Point> {
        let x = mean(self.history.iter().map(|p| p.x))?;
        let y = mean(self.history.iter().map(|p| p.y))?;
        Some(Point::new(x, y))
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for PositionSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}

/// A smoothed pointer observation together with its speed in units/ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Point,
    pub speed: f64,
}

#[derive(Debug, Clone)]
pub struct PointerTracker {
    smoother: PositionSmoother,
    last: Option<(Point, Instant)>,
}

impl PointerTracker {
    pub fn new(window: usize) -> Self {
        Self {
            smoother: PositionSmoother::new(window),
            last: None,
        }
    }

    /// Feed one display-space point observed at `now`.
    pub fn observe(&mut self, raw: Point, now: Instant) -> PointerSample {
        let position = self.smoother.observe(raw);

        let speed = match self.last {
            Some((previous, at)) => {
                let elapsed_ms = now.saturating_duration_since(at).as_secs_f64() * 1000.0;
                if elapsed_ms > 0.0 {
                    previous.distance_to(position) / elapsed_ms
                } else {
                    0.0
                }
            }
            None => 0.0,
        };

        self.last = Some((position, now));
        PointerSample { position, speed }
    }

    /// Tracking was lost this frame: forget history and the speed reference.
    pub fn lose(&mut self) {
        self.smoother.clear();
        self.last = None;
    }

    pub fn position(&self) -> Option<Point> {
        self.last.map(|(p, _)| p)
    }

    pub fn smoother(&self) -> &PositionSmoother {
        &self.smoother
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}
