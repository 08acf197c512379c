//! # Spymaster Game
//!
//! One game of spymaster: the computer gives clues, the player guesses.
//!
//! ```text
//! wordlist ──> BoardSampler::deal ──> GameState
//!                                        │
//!        ┌───────────────────────────────┤
//!        ▼                               │
//!  next_round_request ──> select_clue ──> start_round ──> reveal … ──┐
//!        ▲                                                           │
//!        └──────────────────────── round over ───────────────────────┘
//!
//! game over ──> GameLog::compile, Stats::record
//! ```
//!
//! The state has no clock and no I/O; callers decide when rounds start.

mod config;
mod error;
mod history;
mod sampler;
mod state;
mod stats;

pub use config::GameConfig;
pub use error::{GameError, Result};
pub use history::{GameLog, GuessedWord, RoundLog};
pub use sampler::{daily_seed, days_since_epoch, BoardSampler, Deal};
pub use state::{GameState, RevealOutcome, RoundRequest};
pub use stats::Stats;
