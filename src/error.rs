//! Crate-wide error type.
//!
//! A wrong password is never an error: the oracle reports it as
//! [`crate::oracle::Verdict::Wrong`]. Everything here is either a
//! configuration problem caught before the search starts or a structural
//! archive failure that aborts the whole search.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("alphabet contains duplicate symbol {0:?}")]
    DuplicateSymbol(char),

    #[error("password length must be at least 1")]
    ZeroLength,

    #[error("search space too large: {alphabet_len}^{length} overflows supported size")]
    SpaceTooLarge { alphabet_len: usize, length: usize },

    #[error("archive is not encrypted")]
    NotEncrypted,

    #[error("archive contains no entries")]
    EmptyArchive,

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
