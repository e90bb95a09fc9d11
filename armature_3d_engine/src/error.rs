//! Error types for the Armature3D engine
//!
//! This module defines the error types used throughout the engine,
//! including backend calls, node initialisation, and resource management.

use std::fmt;

/// Result type for Armature3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Armature3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (device, buffer upload, draw submission, etc.)
    BackendError(String),

    /// Invalid resource (mesh, texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, renderer, scene nodes)
    InitializationFailed(String),

    /// Operation on a scene node that does not exist or has the wrong kind
    InvalidNode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidNode(msg) => write!(f, "Invalid node: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR (with file:line) and build an `Error::BackendError` from the same message
///
/// # Example
///
/// ```no_run
/// # use armature_3d_engine::engine_err;
/// let err = engine_err!("armature3d::ModelNode", "Mesh '{}' has no submeshes", "airplane.x");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::armature3d::Engine::log_detailed(
            $crate::armature3d::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::armature3d::Error::BackendError(message)
    }};
}

/// Log an ERROR and return early with an `Error::BackendError`
///
/// # Example
///
/// ```no_run
/// # use armature_3d_engine::engine_bail;
/// fn check(count: u32) -> armature_3d_engine::armature3d::Result<()> {
///     if count == 0 {
///         engine_bail!("armature3d::Mesh", "Index count is zero");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
