//! Date extraction from free-form historical text.
//!
//! `extract` finds dates, eras, decades and ranges in a string, normalizes
//! each to a canonical key, attaches the text that explains it and returns
//! the result oldest first. Everything outside `sources`, `summary` and
//! `report` is pure and does no I/O.

pub mod config;
pub mod context;
pub mod date;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod sort;
pub mod sources;
pub mod summary;
pub mod types;

pub use config::{ContextConfig, ContextStrategy, DuplicatePolicy, ExtractConfig};
pub use date::{CanonicalDate, Era, RangeEnd, SortKey};
pub use error::{Error, Result};
pub use normalize::normalize;
pub use pipeline::{Extraction, Extractor, extract};
pub use sort::sort_chronologically;
pub use types::{ContextSpan, DateContextMap, RawMatch};
