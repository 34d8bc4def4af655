//! Detective Quest
//!
//! A mansion investigation game: walk a fixed tree of rooms, collect the
//! clues found along the way, and accuse the culprit once enough evidence
//! points at the same suspect.
//!
//! # Game Mechanics
//!
//! - **Exploration**: Move left or right through the mansion; walking past a
//!   dead end takes you back to the entrance hall
//! - **Clues**: Every clue you find is filed alphabetically in a search tree
//! - **Suspects**: A chained hash table links each clue to the suspect it implicates
//! - **Accusation**: Two clues against the same suspect let you accuse them
//!
//! # Architecture
//!
//! - `data` - Bounded text values, the mansion map and its reference content
//! - `game` - Clue index, suspect ledger, accusation engine and the session
//! - `tui` - Terminal user interface with ratatui

pub mod data;
pub mod game;
pub mod tui;

pub use data::*;
pub use game::{GameConfig, Session};

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = std::result::Result<T, GameError>;

/// Custom error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{kind} is {len} bytes long, the limit is {max}")]
    TooLong {
        kind: TextKind,
        len: usize,
        max: usize,
    },

    #[error("{0} must not be empty")]
    EmptyText(TextKind),

    #[error("{structure} is full ({capacity} nodes)")]
    CapacityExhausted {
        structure: &'static str,
        capacity: usize,
    },

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
