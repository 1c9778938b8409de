//! Session tests: timer cadence and logging seen from a host.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use pixel_tetris::core::{GameState, Phase};
use pixel_tetris::engine::{Session, TransitionLog};
use pixel_tetris::types::{Command, PieceKind};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn records(&self) -> Vec<serde_json::Value> {
        let text = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
        text.lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

#[test]
fn test_start_screen_ignores_time_and_input() {
    let mut session = Session::new(3);
    assert_eq!(session.until_next_tick_ms(), None);
    assert_eq!(session.advance(10_000), 0);
    assert!(!session.submit(Command::HardDrop));
    assert_eq!(session.state().phase(), Phase::Unstarted);
}

#[test]
fn test_gravity_walks_piece_to_the_floor() {
    let mut session = Session::from_state(GameState::new(3).with_next(PieceKind::O));
    session.resume();
    assert!(session.submit(Command::SpawnPiece));

    // O spawns at y=0 and rests at y=18.
    for expected_y in 1..=18 {
        assert_eq!(session.advance(1000), 1);
        assert_eq!(session.state().active().unwrap().y, expected_y);
    }

    // Locks on the next tick, then the following tick spawns.
    assert_eq!(session.advance(1000), 1);
    assert!(session.state().active().is_none());
    assert_eq!(session.state().phase(), Phase::SpawnNeeded);
    assert_eq!(session.advance(1000), 1);
    assert!(session.state().active().is_some());
    assert_eq!(session.state().pieces_spawned(), 2);
}

#[test]
fn test_faster_levels_tick_faster() {
    let mut session = Session::from_state(GameState::new(5).with_lines(40));
    session.resume();
    session.submit(Command::SpawnPiece);

    assert_eq!(session.fall_interval_ms(), 600);
    assert_eq!(session.until_next_tick_ms(), Some(600));
    assert_eq!(session.advance(599), 0);
    assert_eq!(session.advance(1), 1);

    let mut fast = Session::from_state(GameState::new(5).with_lines(500));
    fast.resume();
    fast.submit(Command::SpawnPiece);
    assert_eq!(fast.fall_interval_ms(), 50);
}

#[test]
fn test_pause_suspends_the_clock() {
    let mut session = Session::new(9);
    session.start();
    let y0 = session.state().active().unwrap().y;

    session.advance(700);
    assert!(session.submit(Command::TogglePause));
    assert_eq!(session.until_next_tick_ms(), None);
    assert_eq!(session.advance(60_000), 0);
    assert_eq!(session.state().active().unwrap().y, y0);

    assert!(session.submit(Command::TogglePause));
    assert_eq!(session.until_next_tick_ms(), Some(1000));
}

#[test]
fn test_restart_mid_game_spawns_immediately() {
    let mut session = Session::new(11);
    session.start();
    for _ in 0..5 {
        session.submit(Command::HardDrop);
        session.advance(1000);
    }
    assert!(session.state().score() > 0);

    assert!(session.start());
    let state = session.state();
    assert_eq!(state.score(), 0);
    assert_eq!(state.lines(), 0);
    assert_eq!(state.level(), 1);
    assert!(state.board().is_empty());
    assert_eq!(state.phase(), Phase::Falling);
}

#[test]
fn test_every_command_is_logged() {
    let buf = SharedBuf::default();
    let mut session =
        Session::new(21).with_log(TransitionLog::to_writer(Box::new(buf.clone())));

    session.start();
    session.submit(Command::MoveLeft);
    session.submit(Command::HardDrop);
    session.advance(1000);

    let records = buf.records();
    let commands: Vec<&str> = records
        .iter()
        .map(|r| r["command"].as_str().unwrap())
        .collect();
    assert_eq!(
        commands,
        ["restart", "spawnPiece", "moveLeft", "hardDrop", "tick"]
    );
    assert!(records.iter().all(|r| r["accepted"] == true));
    assert!(records[3]["score"].as_u64().unwrap() > 0);
}
