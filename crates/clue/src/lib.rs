//! # Spymaster Clue
//!
//! Picks the spymaster's clue for a board of words.
//!
//! ## Scoring
//!
//! For every candidate word `w` and cluster size `n`:
//!
//! ```text
//! lower_bound(w) = max(-1, max over avoid words a of w·a)
//! gap(w, n)      = nth-best (w·secret) - lower_bound(w)
//! best[n]        = candidate with the largest gap(w, n)
//! combined(n)    = gap(best[n], n) * (n^aggressiveness - shift)
//! ```
//!
//! The clue is `best[n]` for the `n` with the largest combined score. Any
//! positive gap means every intended secret is closer to the clue than every
//! avoid word.
//!
//! ## Example
//!
//! ```no_run
//! use spymaster_clue::{select_clue, ClueRequest, SelectionParams};
//! use spymaster_vector_store::Corpus;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let corpus = Corpus::load("model").await?;
//! let board: Vec<String> = ["ICE", "FIRE", "SNOW"].map(String::from).to_vec();
//! let secret: Vec<String> = ["ICE", "SNOW"].map(String::from).to_vec();
//!
//! let request = ClueRequest::new(&board, &secret)
//!     .stopwords(&corpus.stopwords)
//!     .params(SelectionParams::default());
//! let hint = select_clue(&corpus.store, &request)?;
//! println!("{}", hint.announcement());
//! # Ok(())
//! # }
//! ```

mod error;
mod guess;
mod hint;
mod params;
mod selector;

pub use error::{ClueError, Result};
pub use guess::rank_guesses;
pub use hint::Hint;
pub use params::{SelectionParams, ALL_IN_AGGRESSIVENESS, DEFAULT_AGGRESSIVENESS, DEFAULT_SHIFT};
pub use selector::{score_candidates, select_clue, Candidates, ClueRequest, ClusterBest, ScoreTable};
