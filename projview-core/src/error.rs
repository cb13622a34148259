/// Error types for projview-core
use thiserror::Error;

/// Main error type for core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("edge {edge} references vertex {index}, but the table only has {vertex_count} vertices")]
    EdgeOutOfRange {
        edge: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("unknown parameter group `{0}` (expected scale, rotation or translation)")]
    UnknownGroup(String),

    #[error("unknown axis `{0}` (expected x, y or z)")]
    UnknownAxis(String),

    #[error("invalid parameter command: {0}")]
    Command(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
