//! Genius artist lookup: resolve free-text artist names to artist records
//! and summarize them as a fixed-column table.

pub mod batch;
pub mod config;
pub mod error;
pub mod gateway;
pub mod json_path;
pub mod models;
pub mod progress;
pub mod resolver;
pub mod similarity;

pub use batch::{resolve_batch, resolve_row};
pub use config::GeniusConfig;
pub use error::{ConfigError, TransportError};
pub use gateway::{GeniusClient, JsonFetch};
pub use models::{ArtistRecord, Candidate, MatchTier, ResolutionRow, ResultTable};
pub use resolver::ArtistResolver;
