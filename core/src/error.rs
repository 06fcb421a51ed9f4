use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Tile index out of range")]
    InvalidIndex,
    #[error("Duplicate target index")]
    DuplicateIndex,
    #[error("Target count does not match the difficulty")]
    WrongTargetCount,
}

pub type Result<T> = core::result::Result<T, GameError>;
