//! sandbridge: a falling-sand puzzle. Pieces land as sand, sand settles grain
//! by grain, and any single-colour region spanning the board from the left
//! wall to the right wall is cleared for points.

pub mod app;
pub mod board;
pub mod collision;
pub mod config;
pub mod connectivity;
pub mod game;
pub mod highscores;
pub mod input;
pub mod physics;
pub mod piece;
pub mod random;
pub mod ui;

pub use board::{Board, Cell, SandColor};
pub use config::{ConfigError, GameConfig};
pub use game::{GameController, Snapshot, Status};
pub use highscores::{FileHighScores, HighScoreError, HighScoreStore, MemoryHighScores};
pub use piece::{Piece, PieceFactory, TetrominoKind};
pub use random::{Randomness, SeededRandomness};
