//! Data model for unit inventory sheet processing.
//!
//! Shared by the registry, mapper, transformation, grouping and CLI crates.
//! Every type that leaves the engine is serde-serializable so the caller can
//! hand it to a storage collaborator as plain JSON.

#![deny(unsafe_code)]

pub mod asset;
pub mod delta;
pub mod error;
pub mod field;
pub mod group;
pub mod lookup;
pub mod mapping;
pub mod record;
pub mod sheet;

pub use asset::{
    AreaRange, AssetAssignment, AssetCatalog, AssetKind, FloorPlan, RenderImage, RenderView,
};
pub use delta::{DeltaEntry, DeltaKind};
pub use error::{ModelError, Result};
pub use field::{FieldType, Importance, SystemField, ids};
pub use group::{Group, GroupKey, GroupSet, GroupStats, KeyPart};
pub use lookup::ColumnLookup;
pub use mapping::{ColumnHint, ColumnMapping};
pub use record::{FieldValue, UnitRecord, format_number};
pub use sheet::{SheetData, SheetInput};
