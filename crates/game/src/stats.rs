use crate::error::{GameError, Result};
use crate::state::GameState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STATS_DIR: &str = ".spymaster";
const STATS_FILE_NAME: &str = "stats.json";

/// Lifetime results, persisted as JSON between games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub played: u32,
    pub wins: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    /// Wins by rounds used; index 0 is a first-round win.
    pub guess_distribution: Vec<u32>,
}

impl Stats {
    /// `~/.spymaster/stats.json`, if a home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(STATS_DIR).join(STATS_FILE_NAME))
    }

    /// Counts a finished game.
    pub fn record(&mut self, game: &GameState) -> Result<()> {
        if !game.is_over() {
            return Err(GameError::GameInProgress);
        }
        self.played += 1;
        if game.is_won() {
            self.wins += 1;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);

            let slots = game.config().max_rounds.max(game.round());
            if self.guess_distribution.len() < slots {
                self.guess_distribution.resize(slots, 0);
            }
            let rounds = game.round().max(1);
            self.guess_distribution[rounds - 1] += 1;
        } else {
            self.current_streak = 0;
        }
        Ok(())
    }

    /// Percentage of games won, rounded to the nearest whole number.
    #[must_use]
    pub fn win_percentage(&self) -> u32 {
        if self.played == 0 {
            return 0;
        }
        let (wins, played) = (u64::from(self.wins), u64::from(self.played));
        u32::try_from((wins * 200 + played) / (2 * played)).unwrap_or(100)
    }

    /// Missing file yields empty stats.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        log::debug!("Saved stats to {}", path.display());
        Ok(())
    }
}
