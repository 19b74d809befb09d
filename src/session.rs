//! Spelling rounds: the word queue, the letter cursor, scoring and the win
//! condition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::content::{Word, WordList};
use crate::targets::{self, Target, TileLayout, DEFAULT_TILE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub tile_count: usize,
    pub win_streak: u32,
    pub letter_points: u32,
    pub word_bonus: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            win_streak: 5,
            letter_points: 10,
            word_bonus: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// What a selected letter did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Correct next letter, word not finished yet.
    Letter,
    /// Correct last letter; the next word is loaded.
    WordComplete,
    /// Correct last letter and the streak reached the win condition.
    Won,
    /// Wrong letter; the word is abandoned.
    Miss,
    /// Selection arrived after the game ended.
    Ignored,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Letter | Verdict::WordComplete | Verdict::Won)
    }
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    content: WordList,
    layout: TileLayout,
    rng: StdRng,
    queue: Vec<Word>,
    index: usize,
    letter_index: usize,
    score: u32,
    consecutive_correct: u32,
    phase: GamePhase,
    targets: Vec<Target>,
}

impl Session {
    pub fn new(content: WordList, config: SessionConfig, layout: TileLayout, rng: StdRng) -> Self {
        let mut session = Self {
            config,
            content,
            layout,
            rng,
            queue: Vec::new(),
            index: 0,
            letter_index: 0,
            score: 0,
            consecutive_correct: 0,
            phase: GamePhase::Playing,
            targets: Vec::new(),
        };
        session.restart();
        session
    }

    /// Back to a fresh round: new shuffle, zero score and streak.
    pub fn restart(&mut self) {
        self.consecutive_correct = 0;
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.reshuffle();
        self.advance();
        info!(answer = %self.answer(), "session restarted");
    }

    pub fn select(&mut self, letter: char) -> Verdict {
        if self.phase == GamePhase::GameOver {
            return Verdict::Ignored;
        }

        if self.expected() != Some(letter) {
            debug!(%letter, answer = %self.answer(), "wrong letter, abandoning word");
            self.consecutive_correct = 0;
            self.index += 1;
            self.advance();
            return Verdict::Miss;
        }

        self.letter_index += 1;
        self.score = self.score.saturating_add(self.config.letter_points);

        if self.letter_index < self.answer().len() {
            return Verdict::Letter;
        }

        self.score = self.score.saturating_add(self.config.word_bonus);
        self.index += 1;
        self.consecutive_correct += 1;
        debug!(
            streak = self.consecutive_correct,
            score = self.score,
            "word complete"
        );

        if self.consecutive_correct >= self.config.win_streak {
            self.phase = GamePhase::GameOver;
            info!(score = self.score, "streak reached, game over");
            return Verdict::Won;
        }

        self.advance();
        Verdict::WordComplete
    }

    /// Load the word at the queue position, reshuffling when the queue ran out.
    pub fn advance(&mut self) {
        if self.consecutive_correct >= self.config.win_streak {
            self.phase = GamePhase::GameOver;
            return;
        }

        if self.index >= self.queue.len() {
            info!("word queue exhausted, reshuffling");
            self.reshuffle();
        }

        // content is non-empty, so a fresh queue always has a word at 0
        self.letter_index = 0;
        self.regenerate_targets();
    }

    /// Lay the current word out again for a new display size.
    pub fn resize(&mut self, layout: TileLayout) {
        self.layout = layout;
        if self.phase == GamePhase::Playing {
            self.regenerate_targets();
        }
    }

    fn reshuffle(&mut self) {
        self.queue = self.content.words().to_vec();
        self.queue.shuffle(&mut self.rng);
        self.index = 0;
    }

    fn regenerate_targets(&mut self) {
        let answer = self.queue[self.index].answer.clone();
        self.targets = targets::generate(
            &answer,
            self.config.tile_count,
            &self.layout,
            &mut self.rng,
        );
    }

    fn expected(&self) -> Option<char> {
        self.answer().chars().nth(self.letter_index)
    }

    pub fn word(&self) -> &Word {
        &self.queue[self.index.min(self.queue.len() - 1)]
    }

    pub fn prompt(&self) -> &str {
        &self.word().prompt
    }

    pub fn answer(&self) -> &str {
        &self.word().answer
    }

    /// The part of the answer spelled so far.
    pub fn typed(&self) -> &str {
        &self.answer()[..self.letter_index]
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn letter_index(&self) -> usize {
        self.letter_index
    }

    pub fn queue_position(&self) -> usize {
        self.index
    }

    pub fn queue(&self) -> &[Word] {
        &self.queue
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn consecutive_correct(&self) -> u32 {
        self.consecutive_correct
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn layout(&self) -> TileLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::DisplaySize;
    use assert_matches::assert_matches;
    use rand::SeedableRng;

    fn session_with(words: &[(&str, &str)], seed: u64) -> Session {
        let list = WordList::new(
            "test",
            words.iter().map(|(p, a)| Word::new(*p, *a)).collect(),
        )
        .unwrap();
        Session::new(
            list,
            SessionConfig::default(),
            TileLayout::new(DisplaySize::new(1280.0, 720.0)),
            StdRng::seed_from_u64(seed),
        )
    }

    fn spell(session: &mut Session) -> Vec<Verdict> {
        let answer = session.answer().to_string();
        answer.chars().map(|c| session.select(c)).collect()
    }

    #[test]
    fn test_new_session_loads_first_word() {
        let session = session_with(&[("貓", "CAT")], 1);

        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.answer(), "CAT");
        assert_eq!(session.prompt(), "貓");
        assert_eq!(session.letter_index(), 0);
        assert_eq!(session.targets().len(), 12);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_spelling_cat() {
        let mut session = session_with(&[("貓", "CAT")], 1);

        assert_eq!(session.select('C'), Verdict::Letter);
        assert_eq!(session.letter_index(), 1);
        assert_eq!(session.typed(), "C");
        assert_eq!(session.select('A'), Verdict::Letter);
        assert_eq!(session.letter_index(), 2);
        assert_eq!(session.select('T'), Verdict::WordComplete);

        assert_eq!(session.score(), 80);
        assert_eq!(session.consecutive_correct(), 1);
        // next word loaded from a reshuffled queue
        assert_eq!(session.letter_index(), 0);
        assert_eq!(session.queue_position(), 0);
    }

    #[test]
    fn test_wrong_letter_abandons_word_and_keeps_partial_score() {
        let mut session = session_with(&[("貓", "CAT"), ("狗", "DOG")], 5);
        let first = session.answer().to_string();
        let expected = first.chars().next().unwrap();

        assert_eq!(session.select(expected), Verdict::Letter);
        assert_eq!(session.select('X'), Verdict::Miss);

        // points for the first letter are not taken back
        assert_eq!(session.score(), 10);
        assert_eq!(session.consecutive_correct(), 0);
        assert_eq!(session.letter_index(), 0);
        assert_eq!(session.queue_position(), 1);
        assert_ne!(session.answer(), first);
    }

    #[test]
    fn test_score_saturates_on_huge_point_values() {
        let list = WordList::new("t", vec![Word::new("貓", "CAT")]).unwrap();
        let config = SessionConfig {
            letter_points: u32::MAX / 2,
            word_bonus: u32::MAX,
            ..SessionConfig::default()
        };
        let mut session = Session::new(
            list,
            config,
            TileLayout::new(DisplaySize::new(1280.0, 720.0)),
            StdRng::seed_from_u64(3),
        );

        assert_eq!(spell(&mut session).last(), Some(&Verdict::WordComplete));
        assert_eq!(session.score(), u32::MAX);
    }

    #[test]
    fn test_wrong_letter_resets_streak() {
        let mut session = session_with(&[("貓", "CAT"), ("狗", "DOG"), ("樹", "TREE")], 9);

        spell(&mut session);
        spell(&mut session);
        assert_eq!(session.consecutive_correct(), 2);

        session.select('Z');
        assert_eq!(session.consecutive_correct(), 0);
    }

    #[test]
    fn test_five_in_a_row_ends_game() {
        let mut session = session_with(
            &[
                ("一", "ONE"),
                ("二", "TWO"),
                ("三", "THREE"),
                ("四", "FOUR"),
                ("五", "FIVE"),
                ("六", "SIX"),
                ("七", "SEVEN"),
            ],
            11,
        );

        for _ in 0..4 {
            assert_eq!(spell(&mut session).last(), Some(&Verdict::WordComplete));
        }
        let targets_before = session.targets().to_vec();
        assert_eq!(spell(&mut session).last(), Some(&Verdict::Won));

        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.consecutive_correct(), 5);
        assert_eq!(session.queue_position(), 5);
        // no new word was laid out
        assert_eq!(session.targets(), targets_before.as_slice());
    }

    #[test]
    fn test_selection_after_game_over_is_ignored() {
        let mut session = session_with(&[("貓", "CAT")], 2);
        for _ in 0..5 {
            spell(&mut session);
        }
        assert_eq!(session.phase(), GamePhase::GameOver);

        let score = session.score();
        assert_matches!(session.select('C'), Verdict::Ignored);
        assert_eq!(session.score(), score);
    }

    #[test]
    fn test_exhausted_queue_reshuffles_and_continues() {
        let mut session = session_with(&[("貓", "CAT"), ("狗", "DOG")], 3);

        for _ in 0..7 {
            assert_eq!(session.select('#'), Verdict::Miss);
            assert_eq!(session.phase(), GamePhase::Playing);
            assert!(session.queue_position() < 2);
        }
        assert_eq!(session.queue().len(), 2);
    }

    #[test]
    fn test_single_word_list_reshuffles_every_word() {
        let mut session = session_with(&[("貓", "CAT")], 4);
        for streak in 1..5 {
            spell(&mut session);
            assert_eq!(session.consecutive_correct(), streak);
            assert_eq!(session.answer(), "CAT");
            assert_eq!(session.phase(), GamePhase::Playing);
        }
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = session_with(&[("貓", "CAT")], 6);
        for _ in 0..5 {
            spell(&mut session);
        }
        assert_eq!(session.phase(), GamePhase::GameOver);

        session.restart();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.consecutive_correct(), 0);
        assert_eq!(session.letter_index(), 0);
        assert_eq!(session.queue_position(), 0);
        assert_eq!(session.targets().len(), 12);
    }

    #[test]
    fn test_targets_contain_answer_letters() {
        let mut session = session_with(&[("蘋果", "APPLE"), ("水", "WATER")], 8);
        for _ in 0..4 {
            let labels: Vec<char> = session.targets().iter().map(|t| t.label).collect();
            for c in session.answer().chars() {
                assert!(labels.contains(&c));
            }
            session.select('#');
        }
    }

    #[test]
    fn test_resize_relays_targets() {
        let mut session = session_with(&[("貓", "CAT")], 10);
        let layout = TileLayout::new(DisplaySize::new(800.0, 600.0));

        session.resize(layout);
        assert_eq!(session.layout(), layout);
        assert!(session.targets().iter().all(|t| t.center.y == 450.0));
        let xs: Vec<f64> = session.targets().iter().map(|t| t.center.x).collect();
        assert!((xs[0] - 80.0).abs() < 1e-9);
        assert!((xs[11] - 720.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_scoring() {
        let list = WordList::new("t", vec![Word::new("貓", "CAT")]).unwrap();
        let mut session = Session::new(
            list,
            SessionConfig {
                tile_count: 4,
                win_streak: 1,
                letter_points: 1,
                word_bonus: 100,
            },
            TileLayout::new(DisplaySize::new(1280.0, 720.0)),
            StdRng::seed_from_u64(0),
        );

        assert_eq!(session.targets().len(), 4);
        assert_eq!(spell(&mut session).last(), Some(&Verdict::Won));
        assert_eq!(session.score(), 103);
    }
}
