//! Column mapper: binds sheet columns to canonical unit fields.
//!
//! - **state**: immutable mapping snapshots, summaries and validation gaps
//! - **engine**: fuzzy suggestions used for automatic mapping
//! - **utils**: text normalization shared by both

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod state;
pub mod utils;

pub use engine::{
    ConfidenceLevel, ConfidenceThresholds, MappingEngine, MappingResult, MappingSuggestion,
};
pub use error::MappingError;
pub use state::{
    DuplicateClaim, FieldMappingStatus, MappingState, MappingSummary, ValidationGap,
    duplicate_claims, init_mappings, summarize,
};
pub use utils::normalize_text;
