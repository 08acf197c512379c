use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use spymaster_clue::{SelectionParams, ALL_IN_AGGRESSIVENESS, DEFAULT_AGGRESSIVENESS, DEFAULT_SHIFT};
use std::path::Path;

/// Board shape, round limit and clue risk settings.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// max_rounds = 8
/// aggressiveness = 0.8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    /// Words the guesser has to find.
    pub secrets: usize,
    pub max_rounds: usize,
    pub aggressiveness: f64,
    /// Used for the last round, when only a large cluster can still win.
    pub final_round_aggressiveness: f64,
    pub shift: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 3,
            secrets: 6,
            max_rounds: 6,
            aggressiveness: DEFAULT_AGGRESSIVENESS,
            final_round_aggressiveness: ALL_IN_AGGRESSIVENESS,
            shift: DEFAULT_SHIFT,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::invalid_config(format!(
                "board must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.secrets == 0 {
            return Err(GameError::invalid_config("secrets must be > 0"));
        }
        if self.secrets > self.board_size() {
            return Err(GameError::invalid_config(format!(
                "secrets ({}) cannot exceed board size ({})",
                self.secrets,
                self.board_size()
            )));
        }
        if self.max_rounds == 0 {
            return Err(GameError::invalid_config("max_rounds must be > 0"));
        }
        for (name, params) in [
            ("aggressiveness", self.round_params(false)),
            ("final_round_aggressiveness", self.round_params(true)),
        ] {
            params
                .validate()
                .map_err(|e| GameError::invalid_config(format!("{name}: {e}")))?;
        }
        Ok(())
    }

    /// Clue settings for the round that follows `hints_given` earlier clues.
    #[must_use]
    pub fn params_for_round(&self, hints_given: usize) -> SelectionParams {
        self.round_params(hints_given + 1 == self.max_rounds)
    }

    fn round_params(&self, final_round: bool) -> SelectionParams {
        let aggressiveness = if final_round {
            self.final_round_aggressiveness
        } else {
            self.aggressiveness
        };
        SelectionParams::new(aggressiveness).with_shift(self.shift)
    }
}
