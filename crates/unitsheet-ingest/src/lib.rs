//! Sheet ingestion for unit inventory files.
//!
//! Reading files is the caller's side of the pipeline boundary; the engines
//! only ever see the resulting [`unitsheet_model::SheetInput`].

#![deny(unsafe_code)]

pub mod error;
pub mod hints;
pub mod sheet;

pub use error::{IngestError, Result};
pub use hints::build_column_hints;
pub use sheet::read_sheet;
