//! Error types for template resolution and rendering.
//!
//! This module provides [`RenderError`], the error type for all resolver
//! operations. It abstracts over the underlying template engine's errors,
//! providing a stable public API.
//!
//! "No template found" is deliberately not an error: resolution reports it
//! as `Ok(None)` (or `false` from `has_template`), and callers decide their
//! own fallback behavior.

use std::fmt;

/// Error type for template resolution and rendering operations.
#[derive(Debug)]
pub enum RenderError {
    /// Template syntax or evaluation failure in a rendering engine.
    ///
    /// Engine failures propagate to the caller unmodified; the resolver
    /// neither wraps nor suppresses them.
    Template(String),

    /// Data mapping could not be serialized for the engine.
    Serialization(String),

    /// I/O error reading a template file.
    Io(std::io::Error),

    /// A resolved record carries a suffix with no registered engine.
    ///
    /// Unreachable for records produced by the suffix table itself; kept as
    /// a loud failure in case the table and dispatch ever drift apart.
    UnknownSuffix(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Template(msg) => write!(f, "template error: {}", msg),
            RenderError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            RenderError::Io(err) => write!(f, "I/O error: {}", err),
            RenderError::UnknownSuffix(suffix) => {
                write!(f, "no rendering engine registered for suffix: {}", suffix)
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err.to_string())
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::BadSerialization => {
                RenderError::Serialization(err.to_string())
            }
            _ => RenderError::Template(err.to_string()),
        }
    }
}
