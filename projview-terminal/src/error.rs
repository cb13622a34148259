/// Error types for the terminal viewer
use std::io;

use thiserror::Error;

use crate::viewport::ViewRole;

/// Failure of a single render target
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("render surface lost: {0}")]
    ContextLost(String),

    #[error("render surface already released")]
    Released,

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewportError {
    #[error("a {0} viewport is already registered")]
    DuplicateRole(ViewRole),

    #[error("no viewport with id {0}")]
    UnknownViewport(u64),

    #[error("the {0} viewport has a fixed camera")]
    NotNavigable(ViewRole),
}

/// Main error type for the terminal viewer
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] projview_core::Error),

    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Result type alias for the terminal viewer
pub type Result<T> = std::result::Result<T, Error>;
