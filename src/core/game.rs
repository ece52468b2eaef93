//! Game engine module - owns the grid, pieces, scoring, and gravity
//!
//! All mutation is synchronous: commands validate, commit, then publish a
//! fresh snapshot before returning. Invalid commands (illegal move, command
//! while paused or after game over) are silent no-ops.

use crate::core::board::{Board, ClearedRows};
use crate::core::pieces::Piece;
use crate::core::rng::PieceGenerator;
use crate::core::signal::{Signal, SubscriberId};
use crate::types::{
    Direction, BASE_DROP_MS, DROP_SPEEDUP_PER_LEVEL_MS, LINES_PER_LEVEL, MIN_DROP_MS,
    POINTS_PER_LINE,
};

/// Published snapshot of the complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub game_over: bool,
    pub paused: bool,
}

/// Rows cleared by one lock, in pre-shift indices (for animation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinesCleared {
    pub rows: ClearedRows,
}

/// Gravity interval for a level: 1000ms at level 1, 100ms faster per level,
/// floored at 100ms
pub fn drop_interval_ms(level: u32) -> u32 {
    BASE_DROP_MS
        .saturating_sub(level.saturating_sub(1) * DROP_SPEEDUP_PER_LEVEL_MS)
        .max(MIN_DROP_MS)
}

/// The engine's periodic drop clock.
///
/// The period is latched when the clock is (re)armed; interval changes from
/// level-ups take effect only at the next arm. Arming replaces any previous
/// schedule, so one engine never runs two gravity loops.
#[derive(Debug, Clone, Copy)]
struct GravityClock {
    armed: bool,
    period_ms: u32,
    acc_ms: u32,
}

impl GravityClock {
    fn new() -> Self {
        Self {
            armed: false,
            period_ms: BASE_DROP_MS,
            acc_ms: 0,
        }
    }

    fn arm(&mut self, period_ms: u32) {
        self.armed = true;
        self.period_ms = period_ms.max(1);
        self.acc_ms = 0;
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.acc_ms = 0;
    }

    /// Accumulate elapsed time; returns how many periods fired
    fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.armed {
            return 0;
        }
        self.acc_ms += elapsed_ms;
        let steps = self.acc_ms / self.period_ms;
        self.acc_ms %= self.period_ms;
        steps
    }
}

/// The game simulation engine
pub struct GameEngine {
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    score: u32,
    level: u32,
    lines: u32,
    game_over: bool,
    paused: bool,
    /// Recomputed on line clears; read by the clock only when (re)armed
    drop_speed_ms: u32,
    gravity: GravityClock,
    generator: PieceGenerator,
    state_signal: Signal<GameState>,
    lines_signal: Signal<LinesCleared>,
}

impl GameEngine {
    /// Create an engine with a fresh game and the given RNG seed
    pub fn new(seed: u32) -> Self {
        let mut engine = Self {
            board: Board::new(),
            current: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            game_over: false,
            paused: false,
            drop_speed_ms: BASE_DROP_MS,
            gravity: GravityClock::new(),
            generator: PieceGenerator::new(seed),
            state_signal: Signal::new(),
            lines_signal: Signal::new(),
        };
        engine.initialize_game();
        engine
    }

    fn initialize_game(&mut self) {
        self.board.clear();
        self.current = None;
        self.next = Some(Piece::spawn(self.generator.draw()));
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.game_over = false;
        self.paused = false;
        self.drop_speed_ms = BASE_DROP_MS;
        self.spawn_new_piece();
    }

    // --- observation surface ---

    /// Synchronous snapshot read
    pub fn game_state(&self) -> GameState {
        GameState {
            board: self.board.clone(),
            current: self.current,
            next: self.next,
            score: self.score,
            level: self.level,
            lines: self.lines,
            game_over: self.game_over,
            paused: self.paused,
        }
    }

    /// Subscribe to state snapshots (emitted after every state change)
    pub fn on_state(&mut self, callback: impl FnMut(&GameState) + 'static) -> SubscriberId {
        self.state_signal.subscribe(callback)
    }

    pub fn unsubscribe_state(&mut self, id: SubscriberId) -> bool {
        self.state_signal.unsubscribe(id)
    }

    /// Subscribe to line-clear events (emitted only on nonzero clears,
    /// strictly before the post-lock snapshot)
    pub fn on_lines_cleared(
        &mut self,
        callback: impl FnMut(&LinesCleared) + 'static,
    ) -> SubscriberId {
        self.lines_signal.subscribe(callback)
    }

    pub fn unsubscribe_lines_cleared(&mut self, id: SubscriberId) -> bool {
        self.lines_signal.unsubscribe(id)
    }

    /// Current gravity period as derived from the level
    pub fn drop_speed_ms(&self) -> u32 {
        self.drop_speed_ms
    }

    // --- commands ---

    /// Arm the gravity clock, replacing any previous schedule.
    ///
    /// The period is read from the current drop speed here and nowhere else.
    pub fn start_game(&mut self) {
        self.gravity.arm(self.drop_speed_ms);
    }

    /// Toggle the paused flag. The clock stays armed; ticks while paused
    /// are discarded. Game over is terminal, so pausing after it is a no-op.
    pub fn pause_game(&mut self) {
        if self.game_over {
            return;
        }
        self.paused = !self.paused;
        self.publish_state();
    }

    /// Disarm gravity and rebuild a fresh game (empty grid, score 0,
    /// level 1). The caller restarts gravity with `start_game`.
    pub fn reset_game(&mut self) {
        self.gravity.disarm();
        self.initialize_game();
        self.publish_state();
    }

    /// Move the current piece one cell. Left/right collisions reject the
    /// move; a down collision locks the piece instead.
    pub fn move_piece(&mut self, direction: Direction) {
        if self.command_disabled() {
            return;
        }
        let Some(piece) = self.current else {
            return;
        };

        let (dx, dy) = direction.delta();
        if !self.is_collision(&piece, dx, dy) {
            let moved = Piece {
                x: piece.x + dx,
                y: piece.y + dy,
                ..piece
            };
            self.current = Some(moved);
            self.publish_state();
        } else if direction == Direction::Down {
            self.lock_piece();
            self.publish_state();
        }
    }

    /// One gravity step (alias for a down move)
    pub fn drop_piece(&mut self) {
        self.move_piece(Direction::Down);
    }

    /// Rotate the current piece 90 degrees clockwise in place.
    ///
    /// The rotated bitmap is tested at the current anchor only; on collision
    /// the rotation is silently rejected.
    pub fn rotate_piece(&mut self) {
        if self.command_disabled() {
            return;
        }
        let Some(piece) = self.current else {
            return;
        };

        let rotated = piece.rotated();
        if !self.is_collision(&rotated, 0, 0) {
            self.current = Some(rotated);
            self.publish_state();
        }
    }

    /// Drop the current piece to its resting row and lock it, with a single
    /// publication at the final position
    pub fn hard_drop(&mut self) {
        if self.command_disabled() {
            return;
        }
        let Some(mut piece) = self.current else {
            return;
        };

        while !self.is_collision(&piece, 0, 1) {
            piece.y += 1;
        }
        self.current = Some(piece);

        self.lock_piece();
        self.publish_state();
    }

    /// Advance the gravity clock. Fired periods each perform one down move;
    /// elapsed time is discarded while paused or after game over.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if self.paused || self.game_over {
            return;
        }
        let steps = self.gravity.advance(elapsed_ms);
        for _ in 0..steps {
            if self.game_over {
                break;
            }
            self.move_piece(Direction::Down);
        }
    }

    // --- internals ---

    fn command_disabled(&self) -> bool {
        self.current.is_none() || self.game_over || self.paused
    }

    /// True if any occupied sub-cell of `piece`, displaced by (dx, dy), lands
    /// outside the side walls or floor, or on an occupied cell at row >= 0.
    /// Rows above the board never collide.
    pub fn is_collision(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece.board_cells(dx, dy).any(|(x, y)| self.board.blocks(x, y))
    }

    /// Write the current piece into the grid, clear completed rows, then
    /// spawn the next piece. Sub-cells above the top row are discarded.
    fn lock_piece(&mut self) {
        let Some(piece) = self.current else {
            return;
        };

        for (x, y) in piece.board_cells(0, 0) {
            if y >= 0 {
                self.board.set(x, y, Some(piece.kind));
            }
        }
        self.current = None;

        self.clear_lines();
        self.spawn_new_piece();
    }

    /// Remove completed rows, emit the pre-shift indices, and update
    /// score/level. The event goes out before the post-lock snapshot so
    /// consumers can animate against the board they already hold.
    fn clear_lines(&mut self) {
        let cleared = self.board.clear_full_rows();
        if cleared.is_empty() {
            return;
        }

        self.lines_signal.emit(&LinesCleared {
            rows: cleared.clone(),
        });

        let count = cleared.len() as u32;
        self.lines += count;
        self.score += count * POINTS_PER_LINE * self.level;
        self.level = self.lines / LINES_PER_LEVEL + 1;
        // Takes effect when gravity is next (re)armed, not mid-interval.
        self.drop_speed_ms = drop_interval_ms(self.level);
    }

    /// Promote next to current and draw a fresh next. A spawn that collides
    /// immediately ends the game.
    fn spawn_new_piece(&mut self) {
        self.current = self.next.take();
        self.next = Some(Piece::spawn(self.generator.draw()));

        if let Some(piece) = self.current {
            if self.is_collision(&piece, 0, 0) {
                self.game_over = true;
            }
        }
    }

    fn publish_state(&mut self) {
        let snapshot = self.game_state();
        self.state_signal.emit(&snapshot);
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub fn set_current(&mut self, piece: Option<Piece>) {
        self.current = piece;
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(1)
    }
}
