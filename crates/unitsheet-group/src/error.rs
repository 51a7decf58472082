use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("unit {0} is not waiting for a group")]
    UnitNotPending(String),
    #[error("no units selected")]
    EmptySelection,
    #[error("a group with key [{key}] already exists: {id}")]
    GroupExists { id: String, key: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found in catalog: {0}")]
    AssetNotFound(String),
    #[error("unit {unit_id} has no asset {asset_id}")]
    NotAssigned { unit_id: String, asset_id: String },
    #[error("no units selected")]
    EmptySelection,
}
