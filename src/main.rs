//! Terminal runner (default binary).
//!
//! Owns the gravity timing loop and the terminal; gameplay state lives
//! entirely in the engine. Redraws are driven by the engine's snapshot
//! stream via a dirty flag.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use blockfall::core::GameEngine;
use blockfall::input::{handle_key_event, should_quit};
use blockfall::leaderboard::Leaderboard;
use blockfall::term::{GameView, TerminalRenderer, Viewport};
use blockfall::types::{Command, Direction};

/// Frame granularity for input polling and gravity accumulation.
const FRAME_MS: u64 = 16;

/// Maximum length of a leaderboard name.
const NAME_LIMIT: usize = 12;

enum Mode {
    Playing,
    EnteringName(String),
}

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut engine = GameEngine::new(entropy_seed());
    let mut leaderboard = Leaderboard::open(scores_path());
    let view = GameView::default();

    // Redraw only when the engine publishes a change.
    let dirty = Rc::new(Cell::new(true));
    let flag = Rc::clone(&dirty);
    engine.on_state(move |_| flag.set(true));

    engine.start_game();

    let mut mode = Mode::Playing;
    let mut score_checked = false;
    let mut last_tick = Instant::now();
    let frame = Duration::from_millis(FRAME_MS);

    loop {
        let state = engine.game_state();

        // Route a finished game through the leaderboard once.
        if state.game_over && !score_checked {
            score_checked = true;
            if leaderboard.is_high_score(state.score) {
                mode = Mode::EnteringName(String::new());
            }
        }

        if dirty.replace(false) || matches!(mode, Mode::EnteringName(_)) {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let viewport = Viewport::new(w, h);
            let mut fb = view.render(&state, viewport);
            if let Mode::EnteringName(ref typed) = mode {
                view.draw_name_entry(&mut fb, viewport, typed);
            }
            term.draw(&fb)?;
        }

        // Input with timeout until the next gravity slice.
        let timeout = frame
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match mode {
                    Mode::EnteringName(ref mut typed) => match key.code {
                        KeyCode::Enter => {
                            leaderboard.add_score(
                                typed,
                                state.score,
                                state.level,
                                state.lines,
                            )?;
                            mode = Mode::Playing;
                            dirty.set(true);
                        }
                        KeyCode::Esc => {
                            mode = Mode::Playing;
                            dirty.set(true);
                        }
                        KeyCode::Backspace => {
                            typed.pop();
                        }
                        KeyCode::Char(c) if typed.chars().count() < NAME_LIMIT => {
                            typed.push(c);
                        }
                        _ => {}
                    },
                    Mode::Playing => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(command) = handle_key_event(key) {
                            dispatch(&mut engine, command, &mut score_checked);
                        }
                    }
                },
                Event::Resize(..) => {
                    term.invalidate();
                    dirty.set(true);
                }
                _ => {}
            }
        }

        // Gravity.
        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            engine.tick(elapsed.as_millis() as u32);
        }
    }
}

fn dispatch(engine: &mut GameEngine, command: Command, score_checked: &mut bool) {
    match command {
        Command::MoveLeft => engine.move_piece(Direction::Left),
        Command::MoveRight => engine.move_piece(Direction::Right),
        Command::MoveDown => engine.drop_piece(),
        Command::Rotate => engine.rotate_piece(),
        Command::HardDrop => engine.hard_drop(),
        Command::Pause => engine.pause_game(),
        Command::Restart => {
            engine.reset_game();
            engine.start_game();
            *score_checked = false;
        }
    }
}

fn entropy_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos().wrapping_add(d.as_secs() as u32))
        .unwrap_or(1)
}

fn scores_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".blockfall_scores.json"),
        None => PathBuf::from("blockfall_scores.json"),
    }
}
