//! Error types for roster loading

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed roster row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Roster row {row} has a blank worker id")]
    BlankId { row: usize },
    #[error("Roster row {row} ({id}) has a non-finite score")]
    NonFiniteScore { row: usize, id: String },
}

pub type Result<T> = std::result::Result<T, RosterError>;
