//! Corpus-level helpers that run outside an ingestion session.

pub mod prescan;

pub use prescan::{prescan_paths, PrescanError, PrescanIndex};
