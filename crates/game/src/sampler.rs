use crate::config::GameConfig;
use crate::error::{GameError, Result};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1_442_695_040_888_963_407;
const DAY_SECS: u64 = 24 * 60 * 60;

/// A freshly dealt board and the secret words hidden in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub board: Vec<String>,
    pub secret: Vec<String>,
}

/// Seeded board generator. The same seed always deals the same board.
#[derive(Debug, Clone)]
pub struct BoardSampler {
    state: u64,
}

impl BoardSampler {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut sampler = Self {
            state: seed.wrapping_add(INCREMENT),
        };
        sampler.next_u64();
        sampler
    }

    /// Sampler for the daily puzzle `days_since_epoch`.
    #[must_use]
    pub fn daily(days_since_epoch: u64) -> Self {
        Self::new(daily_seed(days_since_epoch))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform-ish index in `0..bound`. `bound` must be non-zero.
    fn below(&mut self, bound: usize) -> usize {
        // high bits of an LCG are the well mixed ones
        ((self.next_u64() >> 33) % bound as u64) as usize
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }

    /// Shuffles the word list, takes a board, marks its first `secrets`
    /// words secret, then shuffles the board so secrets are not grouped.
    ///
    /// Repeated list entries (ignoring case) count once, so board words are
    /// always distinct.
    pub fn deal(&mut self, wordlist: &[String], config: &GameConfig) -> Result<Deal> {
        config.validate()?;
        let mut seen = HashSet::new();
        let mut words: Vec<String> = wordlist
            .iter()
            .filter(|w| seen.insert(w.to_lowercase()))
            .cloned()
            .collect();

        let needed = config.board_size();
        if words.len() < needed {
            return Err(GameError::NotEnoughWords {
                needed,
                available: words.len(),
            });
        }
        self.shuffle(&mut words);
        words.truncate(needed);

        let secret = words[..config.secrets].to_vec();
        self.shuffle(&mut words);
        Ok(Deal {
            board: words,
            secret,
        })
    }
}

#[must_use]
pub fn daily_seed(days_since_epoch: u64) -> u64 {
    days_since_epoch
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .rotate_left(17)
}

/// Days since the Unix epoch, in UTC.
#[must_use]
pub fn days_since_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() / DAY_SECS)
        .unwrap_or(0)
}
