use thiserror::Error;

use crate::Level;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Invalid cell index {0}, the board only has 9 cells")]
    InvalidCellIndex(u8),
    #[error("No sequence has been set up")]
    NoSequence,
    #[error("Sequence has {actual} steps, level {level} needs {expected}")]
    WrongSequenceLength {
        level: Level,
        expected: usize,
        actual: usize,
    },
    #[error("Round is past its preview, it cannot be previewed again")]
    NotPreviewable,
    #[error("Round is not accepting selections")]
    NotPlaying,
    #[error("Round already ended, no new selections are accepted")]
    AlreadyEnded,
    #[error("Preview tick belongs to a superseded round")]
    StalePreview,
}

pub type Result<T> = core::result::Result<T, RoundError>;
