//! Grouping, delta tracking and asset assignment for unit records.
//!
//! - **engine**: composite-key grouping with merge and naming rules
//! - **delta**: added / removed / edited classification between runs
//! - **assets**: floor-plan and render assignment, manual before auto

#![deny(unsafe_code)]

pub mod assets;
pub mod bucket;
pub mod config;
pub mod delta;
pub mod engine;
pub mod error;
pub mod key;

pub use assets::{AssignedAsset, AssignmentBook, AssignmentSource, AssignmentStats, UnitAssets};
pub use bucket::{AreaBucket, DEFAULT_BUCKET_SIZE};
pub use config::{DEFAULT_KEY_FIELDS, GroupOptions, GroupingConfig, default_key_fields};
pub use delta::{DeltaOptions, DeltaSummary, diff, diff_with};
pub use engine::{GroupingEngine, GroupingOutcome, group, mint_group_id};
pub use error::{AssetError, GroupingError};
pub use key::{composite_key, synthesize_name};
