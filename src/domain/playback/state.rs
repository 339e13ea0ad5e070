//! Playback state machine.
//!
//! States are `(stage, playing | paused)`. The initial state is
//! `(Idle, paused)` and a run ends at `(SecureTunnel, paused)`, reached either
//! by stepping manually or by auto-advance exhausting the sequence.
//!
//! Navigation never fails: stepping past either end clamps silently. Forward
//! movement is always to the adjacent stage.

use serde::Serialize;

use crate::domain::stage::Stage;

/// Current position and auto-advance flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    current: Stage,
    auto_advancing: bool,
}

/// Before/after view of a single navigation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    pub was_playing: bool,
    pub is_playing: bool,
}

impl Transition {
    /// True when the operation moved to a different stage.
    pub fn stage_changed(&self) -> bool {
        self.from != self.to
    }

    /// True when auto-advance went from off to on.
    pub fn started_playing(&self) -> bool {
        !self.was_playing && self.is_playing
    }

    /// True when auto-advance went from on to off.
    pub fn stopped_playing(&self) -> bool {
        self.was_playing && !self.is_playing
    }
}

impl PlaybackState {
    /// Creates the initial `(Idle, paused)` state.
    pub fn new() -> Self {
        Self {
            current: Stage::first(),
            auto_advancing: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.current
    }

    pub fn current_index(&self) -> usize {
        self.current.index()
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto_advancing
    }

    pub fn is_at_end(&self) -> bool {
        self.current.is_terminal()
    }

    /// Moves one stage forward.
    ///
    /// At the terminal stage the index is left alone and auto-advance stops.
    /// Landing on the terminal stage also stops auto-advance, since there is
    /// nowhere further to go.
    pub fn advance(&mut self) -> Transition {
        self.apply(|state| match state.current.next() {
            Some(next) => {
                state.current = next;
                if next.is_terminal() {
                    state.auto_advancing = false;
                }
            }
            None => state.auto_advancing = false,
        })
    }

    /// Moves one stage back; a no-op at the first stage. Never wraps.
    pub fn retreat(&mut self) -> Transition {
        self.apply(|state| {
            if let Some(previous) = state.current.previous() {
                state.current = previous;
            }
        })
    }

    /// Returns to the first stage and stops auto-advance.
    pub fn reset(&mut self) -> Transition {
        self.apply(|state| {
            state.current = Stage::first();
            state.auto_advancing = false;
        })
    }

    /// Flips auto-advance, or replays from the start when at the terminal stage.
    pub fn toggle_play(&mut self) -> Transition {
        self.apply(|state| {
            if state.current.is_terminal() {
                state.current = Stage::first();
                state.auto_advancing = true;
            } else {
                state.auto_advancing = !state.auto_advancing;
            }
        })
    }

    fn apply(&mut self, op: impl FnOnce(&mut Self)) -> Transition {
        let from = self.current;
        let was_playing = self.auto_advancing;
        op(self);
        Transition {
            from,
            to: self.current,
            was_playing,
            is_playing: self.auto_advancing,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(stage: Stage, playing: bool) -> PlaybackState {
        PlaybackState {
            current: stage,
            auto_advancing: playing,
        }
    }

    #[test]
    fn starts_idle_and_paused() {
        let state = PlaybackState::new();
        assert_eq!(state.stage(), Stage::Idle);
        assert_eq!(state.current_index(), 0);
        assert!(!state.is_auto_advancing());
    }

    #[test]
    fn six_advances_reach_secure_tunnel_and_seventh_is_noop() {
        let mut state = PlaybackState::new();
        for _ in 0..6 {
            state.advance();
        }
        assert_eq!(state.current_index(), 6);
        assert_eq!(state.stage(), Stage::SecureTunnel);

        let transition = state.advance();
        assert_eq!(state.current_index(), 6);
        assert!(!transition.stage_changed());
    }

    #[test]
    fn advance_at_end_clears_auto_advance() {
        let mut state = at(Stage::SecureTunnel, true);
        let transition = state.advance();

        assert_eq!(state.stage(), Stage::SecureTunnel);
        assert!(!state.is_auto_advancing());
        assert!(transition.stopped_playing());
    }

    #[test]
    fn advance_onto_terminal_stage_pauses() {
        let mut state = at(Stage::ClientFinished, true);
        state.advance();

        assert_eq!(state.stage(), Stage::SecureTunnel);
        assert!(!state.is_auto_advancing());
    }

    #[test]
    fn advance_keeps_playing_mid_sequence() {
        let mut state = at(Stage::ClientHello, true);
        state.advance();

        assert_eq!(state.stage(), Stage::ServerHello);
        assert!(state.is_auto_advancing());
    }

    #[test]
    fn retreat_at_start_is_noop() {
        let mut state = PlaybackState::new();
        let transition = state.retreat();

        assert_eq!(state.current_index(), 0);
        assert!(!transition.stage_changed());
    }

    #[test]
    fn retreat_moves_back_one_stage() {
        let mut state = at(Stage::KeyDerivation, false);
        state.retreat();
        assert_eq!(state.stage(), Stage::ServerHello);
    }

    #[test]
    fn reset_returns_to_start_and_pauses() {
        let mut state = at(Stage::ServerFinished, true);
        let transition = state.reset();

        assert_eq!(state, PlaybackState::new());
        assert!(transition.stage_changed());
        assert!(transition.stopped_playing());
    }

    #[test]
    fn toggle_play_flips_flag_mid_sequence() {
        let mut state = at(Stage::ServerHello, false);

        assert!(state.toggle_play().started_playing());
        assert_eq!(state.stage(), Stage::ServerHello);

        assert!(state.toggle_play().stopped_playing());
        assert_eq!(state.stage(), Stage::ServerHello);
    }

    #[test]
    fn toggle_play_at_end_replays_from_start() {
        let mut state = at(Stage::SecureTunnel, false);
        let transition = state.toggle_play();

        assert_eq!(state.current_index(), 0);
        assert!(state.is_auto_advancing());
        assert_eq!(transition.from, Stage::SecureTunnel);
        assert_eq!(transition.to, Stage::Idle);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Advance,
        Retreat,
        Reset,
        TogglePlay,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Advance),
            Just(Op::Retreat),
            Just(Op::Reset),
            Just(Op::TogglePlay),
        ]
    }

    proptest! {
        #[test]
        fn navigation_keeps_index_in_range_and_adjacent(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let mut state = PlaybackState::new();
            for op in ops {
                let before = state.current_index();
                let transition = match op {
                    Op::Advance => state.advance(),
                    Op::Retreat => state.retreat(),
                    Op::Reset => state.reset(),
                    Op::TogglePlay => state.toggle_play(),
                };
                let after = state.current_index();

                prop_assert!(after < Stage::COUNT);
                prop_assert_eq!(transition.to.index(), after);
                match op {
                    Op::Advance => prop_assert!(after == before || after == before + 1),
                    Op::Retreat => prop_assert!(after == before || after + 1 == before),
                    Op::Reset => prop_assert!(after == 0 && !state.is_auto_advancing()),
                    Op::TogglePlay => prop_assert!(after == before || after == 0),
                }
                if state.is_at_end() {
                    prop_assert!(!state.is_auto_advancing());
                }
            }
        }
    }
}
