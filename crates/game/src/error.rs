use thiserror::Error;

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Word list has {available} words, a board needs {needed}")]
    NotEnoughWords { needed: usize, available: usize },

    #[error("The game is over")]
    GameOver,

    #[error("The game is still in progress")]
    GameInProgress,

    #[error("Finish the current round first")]
    RoundInProgress,

    #[error("The round is over, start the next round")]
    RoundOver,

    #[error("No clue has been given yet")]
    NoHint,

    #[error("'{0}' is not on the board")]
    NotOnBoard(String),

    #[error("Secret word '{0}' is not on the board")]
    SecretNotOnBoard(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GameError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
