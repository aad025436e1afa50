//! Game controller: tick order, piece lifecycle, scoring, pause and reset.
//!
//! A piece spawns at the top, falls under timed gravity and player moves,
//! locks into the board as sand when a downward move is blocked, and the
//! reserved piece takes its place. If that new piece overlaps sand at its
//! spawn position the game is over. Pause and game over freeze everything;
//! only `reset` (and `toggle_pause`, while not over) changes state then.

use crate::board::{Board, Cell};
use crate::collision::collides;
use crate::config::{ConfigError, GameConfig};
use crate::connectivity::ConnectivityResolver;
use crate::highscores::HighScoreStore;
use crate::physics;
use crate::piece::{Piece, PieceFactory};
use crate::random::Randomness;
use log::{debug, info, trace, warn};
use std::time::Duration;

/// Offsets tried, in order, after a rotation.
pub const ROTATION_KICKS: [(i32, i32); 4] = [(0, 0), (-1, 0), (1, 0), (0, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Paused,
    GameOver,
}

/// Read-only view for the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    /// Hidden once the game is over.
    pub active: Option<&'a Piece>,
    pub next: &'a Piece,
    pub score: u64,
    pub high_score: u64,
    pub paused: bool,
    pub game_over: bool,
    /// Board indices emptied by the most recent tick.
    pub cleared: &'a [usize],
}

pub struct GameController<R, S> {
    config: GameConfig,
    board: Board,
    factory: PieceFactory,
    resolver: ConnectivityResolver,
    rng: R,
    store: S,
    active: Piece,
    next: Piece,
    score: u64,
    high_score: u64,
    paused: bool,
    game_over: bool,
    /// Time since the last tick.
    pending: Duration,
    /// Time since the active piece last dropped under gravity.
    gravity_counter: Duration,
}

impl<R: Randomness, S: HighScoreStore> GameController<R, S> {
    pub fn new(config: GameConfig, mut rng: R, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let factory = PieceFactory::new(config.cols);
        let active = factory.next(&mut rng);
        let next = factory.next(&mut rng);
        let high_score = store.load().unwrap_or_else(|e| {
            warn!("could not load high score: {e}");
            0
        });
        let board = Board::new(config.cols, config.rows);
        let game_over = collides(&board, &active, 0, 0);
        info!(
            "new game on {}x{} board, high score {}",
            config.cols, config.rows, high_score
        );
        Ok(Self {
            config,
            board,
            factory,
            resolver: ConnectivityResolver::new(),
            rng,
            store,
            active,
            next,
            score: 0,
            high_score,
            paused: false,
            game_over,
            pending: Duration::ZERO,
            gravity_counter: Duration::ZERO,
        })
    }

    /// Feeds wall-clock time in. Runs one tick once more than a tick interval
    /// has built up; the whole accumulated time counts toward gravity.
    /// Time passing while paused or over is dropped.
    ///
    /// Returns whether a tick ran.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        self.pending += elapsed;
        if self.pending <= self.config.tick_interval {
            return false;
        }
        let delta = std::mem::take(&mut self.pending);
        self.tick(delta);
        true
    }

    /// Settle, then clear, then gravity: clears see the settled grid and the
    /// piece sees the cleared one.
    fn tick(&mut self, delta: Duration) {
        physics::step(&mut self.board, &mut self.rng);

        let cleared = self.resolver.resolve(&mut self.board);
        if cleared > 0 {
            self.add_score(cleared as u64);
            info!(
                "cleared {} grains in {} bridge(s), score {}",
                cleared,
                self.resolver.last_bridges(),
                self.score
            );
        }

        self.gravity_counter += delta;
        let threshold = self.gravity_threshold();
        if self.gravity_counter > threshold {
            trace!("gravity drop after {:?} (threshold {:?})", self.gravity_counter, threshold);
            self.move_by(0, 1);
            self.gravity_counter = Duration::ZERO;
        }
    }

    fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(e) = self.store.save(self.high_score) {
                warn!("could not save high score {}: {e}", self.high_score);
            }
        }
    }

    /// Shifts the active piece if the target is free. A blocked straight-down
    /// move locks the piece instead.
    pub fn move_by(&mut self, d_col: i32, d_row: i32) {
        if self.paused || self.game_over {
            return;
        }
        if !collides(&self.board, &self.active, d_col, d_row) {
            self.active.col += d_col;
            self.active.row += d_row;
        } else if d_row > 0 && d_col == 0 {
            self.lock();
        }
    }

    pub fn move_left(&mut self) {
        self.move_by(-1, 0);
    }

    pub fn move_right(&mut self) {
        self.move_by(1, 0);
    }

    pub fn soft_drop(&mut self) {
        self.move_by(0, 1);
    }

    /// Rotates clockwise at the first free kick offset; otherwise leaves the
    /// piece as it was.
    pub fn rotate(&mut self) {
        if self.paused || self.game_over {
            return;
        }
        let shape = self.active.shape.rotated_cw();
        let candidate = Piece {
            shape,
            ..self.active.clone()
        };
        for (d_col, d_row) in ROTATION_KICKS {
            if !collides(&self.board, &candidate, d_col, d_row) {
                let (col, row) = (candidate.col + d_col, candidate.row + d_row);
                self.active = Piece { col, row, ..candidate };
                return;
            }
        }
    }

    /// Drops the piece as far as it goes and locks it there.
    pub fn hard_drop(&mut self) {
        if self.paused || self.game_over {
            return;
        }
        while !collides(&self.board, &self.active, 0, 1) {
            self.active.row += 1;
        }
        self.lock();
    }

    pub fn toggle_pause(&mut self) {
        if self.game_over {
            return;
        }
        self.paused = !self.paused;
        debug!("paused = {}", self.paused);
    }

    /// Fresh board and pieces; the high score carries over.
    pub fn reset(&mut self) {
        self.board.clear();
        self.resolver = ConnectivityResolver::new();
        self.active = self.factory.next(&mut self.rng);
        self.next = self.factory.next(&mut self.rng);
        self.score = 0;
        self.paused = false;
        self.game_over = false;
        self.pending = Duration::ZERO;
        self.gravity_counter = Duration::ZERO;
        info!("game reset");
    }

    /// Stamps the active piece into the board and brings in the next one.
    fn lock(&mut self) {
        let cols = self.board.cols() as i32;
        let rows = self.board.rows() as i32;
        let grain = Cell::Sand(self.active.color);
        for (c, r) in self.active.cells() {
            if (0..cols).contains(&c) && (0..rows).contains(&r) {
                self.board.set(c as usize, r as usize, grain);
            }
        }
        debug!(
            "locked {:?} {:?} at ({}, {})",
            self.active.kind, self.active.color, self.active.col, self.active.row
        );
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let incoming = std::mem::replace(&mut self.next, self.factory.next(&mut self.rng));
        self.active = incoming.respawned(self.board.cols());
        if collides(&self.board, &self.active, 0, 0) {
            self.game_over = true;
            info!("game over: no room for {:?}, score {}", self.active.kind, self.score);
        } else {
            debug!("spawned {:?} {:?}", self.active.kind, self.active.color);
        }
    }

    pub fn gravity_threshold(&self) -> Duration {
        self.config.gravity.threshold(self.score)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            active: (!self.game_over).then_some(&self.active),
            next: &self.next,
            score: self.score,
            high_score: self.high_score,
            paused: self.paused,
            game_over: self.game_over,
            cleared: self.resolver.last_cleared(),
        }
    }

    pub fn status(&self) -> Status {
        if self.game_over {
            Status::GameOver
        } else if self.paused {
            Status::Paused
        } else {
            Status::Playing
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn last_cleared(&self) -> &[usize] {
        self.resolver.last_cleared()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
