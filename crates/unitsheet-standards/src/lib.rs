//! Schema registry for the canonical unit fields.
//!
//! The registry is the leaf of the pipeline: the mapper seeds one mapping per
//! field, record extraction coerces cells by field type, and the grouping
//! engine reads well-known field ids from it.

#![deny(unsafe_code)]

pub mod builtin;
pub mod error;
pub mod hash;
pub mod loaders;
pub mod registry;

pub use crate::builtin::builtin_fields;
pub use crate::error::RegistryError;
pub use crate::loaders::{
    FIELDS_ENV_VAR, load_default_registry, load_registry, load_registry_csv, load_registry_toml,
};
pub use crate::registry::FieldRegistry;
