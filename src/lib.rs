//! Brute-force password recovery for encrypted ZIP archives.
//!
//! The engine exhaustively enumerates every fixed-length candidate over a
//! fixed alphabet and tests each against the archive until one decrypts it or
//! the space is exhausted. The pieces compose leaf-first: a [`generator`]
//! produces candidates in odometer order, an [`oracle`] classifies each one
//! against the real archive, a [`progress`] snapshot derives throughput and
//! ETA on a fixed cadence, the [`search`] controller ties them together, and
//! a [`sink`] persists a found password.

pub mod error;
pub mod generator;
pub mod oracle;
pub mod progress;
pub mod search;
pub mod sink;

pub use error::{Error, Result};
pub use generator::SearchSpace;
pub use oracle::{Oracle, Verdict, ZipOracle};
pub use progress::ProgressSnapshot;
pub use search::{Outcome, SearchController, SearchResult};
pub use sink::PasswordFile;
