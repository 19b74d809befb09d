use rand::seq::SliceRandom;
use rand::Rng;

use crate::pointer::{DisplaySize, Point};

pub const DEFAULT_TILE_COUNT: usize = 12;
pub const DEFAULT_TILE_SIZE: f64 = 80.0;
pub const DEFAULT_MARGIN: f64 = 80.0;
pub const DEFAULT_BASELINE_OFFSET: f64 = 150.0;

/// Index of a tile within the current target set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub usize);

/// A letter tile the pointer can dwell on.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub center: Point,
    pub size: f64,
    pub label: char,
}

impl Target {
    /// Tiles are hit-tested as circles of diameter `size`.
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance_to(p) < self.size / 2.0
    }
}

/// Where tiles go on the display: one row, evenly spaced, near the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayout {
    pub display: DisplaySize,
    pub margin: f64,
    pub tile_size: f64,
    pub baseline_offset: f64,
}

impl TileLayout {
    pub fn new(display: DisplaySize) -> Self {
        Self {
            display,
            margin: DEFAULT_MARGIN,
            tile_size: DEFAULT_TILE_SIZE,
            baseline_offset: DEFAULT_BASELINE_OFFSET,
        }
    }

    pub fn place(&self, letters: &[char]) -> Vec<Target> {
        let y = self.display.height - self.baseline_offset;
        let n = letters.len();

        let spacing = if n > 1 {
            (self.display.width - self.margin * 2.0) / (n - 1) as f64
        } else {
            0.0
        };

        letters
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                let x = if n > 1 {
                    self.margin + i as f64 * spacing
                } else {
                    self.display.width / 2.0
                };
                Target {
                    id: TargetId(i),
                    center: Point::new(x, y),
                    size: self.tile_size,
                    label,
                }
            })
            .collect()
    }
}

/// Every letter of `answer` (repeats included), padded with distinct random
/// uppercase letters that do not already appear, then shuffled.
pub fn tile_letters<R: Rng + ?Sized>(answer: &str, tile_count: usize, rng: &mut R) -> Vec<char> {
    let mut letters: Vec<char> = answer.chars().collect();

    // there are only 26 letters to pad with
    let mut pool: Vec<char> = ('A'..='Z').filter(|c| !letters.contains(c)).collect();
    pool.shuffle(rng);

    while letters.len() < tile_count {
        match pool.pop() {
            Some(c) => letters.push(c),
            None => break,
        }
    }

    letters.shuffle(rng);
    letters
}

pub fn generate<R: Rng + ?Sized>(
    answer: &str,
    tile_count: usize,
    layout: &TileLayout,
    rng: &mut R,
) -> Vec<Target> {
    layout.place(&tile_letters(answer, tile_count, rng))
}
