use serde::{Deserialize, Serialize};

/// One round's clue: say `clue` and `n`, hoping for `intended_clues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub clue: String,
    pub n: usize,
    /// The `n` secret words the clue was optimized for, best match first.
    pub intended_clues: Vec<String>,
    /// Margin between the nth-best secret and the closest avoid word.
    pub gap: f32,
    pub combined_score: f64,
}

impl Hint {
    /// The clue as announced to players, e.g. `WINTER 2`.
    #[must_use]
    pub fn announcement(&self) -> String {
        format!("{} {}", self.clue.to_uppercase(), self.n)
    }
}
