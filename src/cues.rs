/// Sound cues the game asks for. Playback is fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Cue {
    Correct,
    Wrong,
    Hover,
}

/// Anything that can play a [`Cue`]. Failures stay inside the player.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

impl<F: FnMut(Cue)> CuePlayer for F {
    fn play(&mut self, cue: Cue) {
        self(cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_player() {
        let mut heard = Vec::new();
        {
            let mut player = |cue: Cue| heard.push(cue);
            player.play(Cue::Wrong);
            player.play(Cue::Hover);
        }
        assert_eq!(heard, vec![Cue::Wrong, Cue::Hover]);
    }

    #[test]
    fn test_cue_display() {
        assert_eq!(Cue::Correct.to_string(), "Correct");
        assert_eq!(Cue::Hover.to_string(), "Hover");
    }
}
