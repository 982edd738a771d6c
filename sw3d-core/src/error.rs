//! Error types for the core library.

use thiserror::Error;

/// The core error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Camera or projection parameters that cannot produce a valid frame
    /// (degenerate clip range, non-positive field of view or zoom, empty
    /// render target). Raised at construction or mutation time, never
    /// silently clamped.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Source geometry that violates the mesh invariants (out-of-range
    /// indices, missing vertex components, too-short faces). Raised at
    /// load time, never at render time.
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    /// A pipeline combination this renderer deliberately refuses rather
    /// than producing a corrupted partial image.
    #[error("not supported: {0}")]
    NotSupported(&'static str),

    /// File access failure while loading geometry.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
