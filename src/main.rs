//! Pixel Tetris runner (default binary).
//!
//! `pixel-tetris` plays in the terminal; `pixel-tetris bridge` serves the
//! engine over JSON lines on stdin/stdout.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use pixel_tetris::adapter::{run_stdio_blocking, BridgeOptions};
use pixel_tetris::config::{Config, Mode, USAGE};
use pixel_tetris::core::GameSnapshot;
use pixel_tetris::input::{handle_key_event, is_actionable, is_start_key, should_quit};
use pixel_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use pixel_tetris::types::Command;

/// Upper bound on one input wait, so resizes and the clock stay responsive.
const MAX_POLL_MS: u64 = 50;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_env_and_args(&args)?;

    match config.mode {
        Mode::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Mode::Bridge => run_stdio_blocking(
            config.session(),
            BridgeOptions {
                manual_ticks: config.manual_ticks,
            },
        ),
        Mode::Terminal => {
            let mut term = TerminalRenderer::new();
            term.enter()?;

            let result = run(&mut term, &config);

            // Always try to restore terminal state.
            let _ = term.exit();
            result
        }
    }
}

fn run(term: &mut TerminalRenderer, config: &Config) -> Result<()> {
    let mut session = config.session();
    let view = GameView::new(config.cell_width);

    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut last_frame = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        if session.started() {
            session.snapshot_into(&mut snap);
            view.render_into(&snap, viewport, &mut fb);
        } else {
            view.render_start_into(viewport, &mut fb);
        }
        term.draw_swap(&mut fb)?;

        // Input with timeout until the next fall tick.
        let wait = session
            .until_next_tick_ms()
            .map_or(MAX_POLL_MS, |ms| (ms as u64).min(MAX_POLL_MS));

        if event::poll(Duration::from_millis(wait))? {
            match event::read()? {
                Event::Key(key) if is_actionable(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if !session.started() {
                        if is_start_key(key) {
                            session.start();
                        }
                    } else {
                        match handle_key_event(key) {
                            // Restart is the two-step start sequence.
                            Some(Command::Restart) => {
                                session.start();
                            }
                            Some(cmd) => {
                                session.submit(cmd);
                            }
                            None => {}
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Fall clock.
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(last_frame);
        last_frame = now;
        session.advance(u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX));
    }
}
