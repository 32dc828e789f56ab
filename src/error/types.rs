use thiserror::Error;

/// Unified result type for the navigation core.
pub type Result<T> = std::result::Result<T, NavError>;

/// Errors surfaced while building panels and chase maps.
///
/// All variants are static authoring mistakes caught at panel-build time;
/// runtime resolution never raises.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("panel has no cells")]
    EmptyPanel,
    #[error("cell `{id}` has invalid dimensions: {reason}")]
    InvalidDimension { id: String, reason: String },
    #[error("cell `{id}` is wider than the panel ({width}px into {available}px)")]
    CellTooWide {
        id: String,
        width: u32,
        available: u32,
    },
    #[error("duplicate cell id `{0}`")]
    DuplicateCell(String),
    #[error("cell `{cell}` references unknown alias `{alias}`")]
    UnknownAlias { cell: String, alias: String },
    #[error("cell `{0}` exceeded the collision retry bound while packing")]
    CollisionRetry(String),
    #[error("malformed navigation hint: {0}")]
    MalformedHint(String),
}
