use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClueError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClueError {
    #[error("No secret words left to hint at")]
    EmptySecret,

    #[error("Secret word '{0}' is not on the board")]
    SecretNotOnBoard(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Every candidate clue was filtered out")]
    ExhaustedCandidates,

    #[error("Unknown word: {0}")]
    UnknownWord(String),
}
