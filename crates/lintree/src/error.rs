use thiserror::Error;

/// Failures reported by the linear tree.
///
/// Every fallible operation leaves the tree exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("subdivision level {level} is above the maximum of {max}")]
    LevelTooDeep { level: u32, max: u32 },
    #[error("{0}-dimensional trees are not supported")]
    UnsupportedDimension(usize),
    #[error("invalid domain: {0}")]
    InvalidDomain(&'static str),
    #[error("invalid bounds: {0}")]
    InvalidBounds(&'static str),
    #[error("bounds lie outside the configured domain")]
    OutOfDomain,
    #[error("cell index {index} is outside the {cells}-cell array")]
    CellOutOfRange { index: usize, cells: usize },
    #[error("node is already registered in cell {cell}")]
    AlreadyInCell { cell: usize },
    #[error("node is not registered in any cell")]
    NotRegistered,
    #[error("stale or unknown node handle")]
    StaleNode,
}
