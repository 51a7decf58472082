//! Transformation engine for unit inventory sheets.
//!
//! - **transformation**: typed split / merge / static / formula steps
//! - **executors**: per-kind cell operations over a [`SheetData`]
//! - **pipeline**: ordered application, reports, preview and diagnostics
//! - **records**: typed [`UnitRecord`] extraction through the column mapping
//!
//! [`SheetData`]: unitsheet_model::SheetData
//! [`UnitRecord`]: unitsheet_model::UnitRecord

#![deny(unsafe_code)]

pub mod error;
pub mod executors;
pub mod numeric;
pub mod pipeline;
pub mod records;
pub mod transformation;

pub use error::{Result, TransformError};
pub use executors::DIVISION_BY_ZERO;
pub use pipeline::{
    ForwardReference, PipelineStats, ReservedCollision, TransformPipeline, TransformReport,
    apply, apply_with_report, preview,
};
pub use records::{ExtractReport, RecordSet, extract_records};
pub use transformation::{FormulaOp, TransformKind, Transformation};
