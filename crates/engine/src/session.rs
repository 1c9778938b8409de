//! Session - the host-side owner of a game.
//!
//! A `Session` serializes the two event sources a host has (player commands
//! and the fall timer) into one command stream over a single [`GameState`].
//! It also models the start screen: nothing is applied until [`Session::start`].

use pixel_tetris_core::{GameSnapshot, GameState};
use pixel_tetris_types::Command;

use crate::clock::FallClock;
use crate::log::TransitionLog;

/// Inputs that rebuild the fall timer when they change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cadence {
    level: u32,
    paused: bool,
    game_over: bool,
    has_active: bool,
}

impl Cadence {
    fn of(state: &GameState) -> Self {
        Self {
            level: state.level(),
            paused: state.paused(),
            game_over: state.game_over(),
            has_active: state.active().is_some(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    state: GameState,
    clock: FallClock,
    started: bool,
    log: TransitionLog,
}

impl Session {
    pub fn new(seed: u32) -> Self {
        Self::from_state(GameState::new(seed))
    }

    /// Wrap an existing state (scenario setup). The session still needs
    /// [`Session::start`] or [`Session::resume`] before it accepts input.
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            clock: FallClock::new(),
            started: false,
            log: TransitionLog::disabled(),
        }
    }

    pub fn with_log(mut self, log: TransitionLog) -> Self {
        self.log = log;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn clock(&self) -> &FallClock {
        &self.clock
    }

    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.state.snapshot_into(out);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// Leave the start screen and begin a fresh game: `Restart` then
    /// `SpawnPiece`. Also used for restarting mid-game.
    pub fn start(&mut self) -> bool {
        self.started = true;
        self.apply(Command::Restart);
        self.apply(Command::SpawnPiece);
        self.clock.reset();
        !self.state.game_over()
    }

    /// Leave the start screen without touching the current state.
    pub fn resume(&mut self) {
        self.started = true;
        self.clock.reset();
    }

    /// Apply one player command. Ignored before the game is started.
    pub fn submit(&mut self, command: Command) -> bool {
        if !self.started {
            return false;
        }

        let before = Cadence::of(&self.state);
        let accepted = self.apply(command);
        if Cadence::of(&self.state) != before {
            self.clock.reset();
        }
        accepted
    }

    /// Fold elapsed wall time into the game as fall ticks.
    ///
    /// The clock is suspended (and its accumulated time dropped) while the
    /// session is unstarted, paused, or over. Returns the number of ticks
    /// applied.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.ticking() {
            self.clock.reset();
            return 0;
        }

        self.clock.accumulate(elapsed_ms);
        let mut ticks = 0;
        while self.clock.take_tick(self.state.fall_interval_ms()) {
            let before = Cadence::of(&self.state);
            self.apply(Command::Tick);
            ticks += 1;
            if Cadence::of(&self.state) != before {
                self.clock.reset();
            }
            if !self.ticking() {
                break;
            }
        }
        ticks
    }

    /// Milliseconds until the next fall tick, or `None` while suspended.
    pub fn until_next_tick_ms(&self) -> Option<u32> {
        self.ticking()
            .then(|| self.clock.remaining_ms(self.state.fall_interval_ms()))
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.state.fall_interval_ms()
    }

    fn ticking(&self) -> bool {
        self.started && self.state.playable()
    }

    fn apply(&mut self, command: Command) -> bool {
        let accepted = self.state.apply_action(command);
        self.log.record(command, accepted, &self.state);
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_tetris_core::Phase;
    use pixel_tetris_types::PieceKind;

    #[test]
    fn input_before_start_is_ignored() {
        let mut session = Session::new(1);
        assert!(!session.submit(Command::SpawnPiece));
        assert_eq!(session.advance(5000), 0);
        assert_eq!(session.state().phase(), Phase::Unstarted);
    }

    #[test]
    fn start_restarts_and_spawns() {
        let mut session = Session::new(7);
        assert!(session.start());
        assert!(session.started());
        assert_eq!(session.state().phase(), Phase::Falling);
        assert_eq!(session.state().pieces_spawned(), 1);
    }

    #[test]
    fn advance_drops_piece_at_level_cadence() {
        let mut session = Session::new(7);
        session.start();
        let y0 = session.state().active().unwrap().y;

        assert_eq!(session.advance(999), 0);
        assert_eq!(session.advance(1), 1);
        assert_eq!(session.state().active().unwrap().y, y0 + 1);

        assert_eq!(session.advance(2000), 2);
        assert_eq!(session.state().active().unwrap().y, y0 + 3);
    }

    #[test]
    fn paused_session_does_not_tick() {
        let mut session = Session::new(7);
        session.start();
        session.advance(600);
        assert!(session.submit(Command::TogglePause));

        assert_eq!(session.advance(10_000), 0);
        assert_eq!(session.until_next_tick_ms(), None);

        assert!(session.submit(Command::TogglePause));
        // Pausing dropped the 600 ms already accumulated.
        assert_eq!(session.until_next_tick_ms(), Some(1000));
    }

    #[test]
    fn lock_resets_clock_and_next_tick_spawns() {
        let state = GameState::new(3).with_next(PieceKind::O);
        let mut session = Session::from_state(state);
        session.resume();
        assert!(session.submit(Command::SpawnPiece));

        session.advance(400);
        assert!(session.submit(Command::HardDrop));
        assert_eq!(session.state().phase(), Phase::SpawnNeeded);
        assert_eq!(session.until_next_tick_ms(), Some(1000));

        assert_eq!(session.advance(1000), 1);
        assert_eq!(session.state().phase(), Phase::Falling);
    }

    #[test]
    fn moves_do_not_reset_clock() {
        let mut session = Session::new(11);
        session.start();
        session.advance(700);
        session.submit(Command::MoveLeft);
        session.submit(Command::MoveRight);
        assert_eq!(session.until_next_tick_ms(), Some(300));
    }

    #[test]
    fn restart_mid_game_begins_fresh() {
        let mut session = Session::new(5);
        session.start();
        session.submit(Command::HardDrop);
        assert!(session.state().score() > 0);

        session.start();
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.state().phase(), Phase::Falling);
    }
}
