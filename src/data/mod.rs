//! Data ingestion
//!
//! Reads match results from delimited text files.

pub mod loader;
pub mod summary;

pub use loader::{load_matches, read_matches, LoadReport, LoadedMatches};
pub use summary::DatasetSummary;
