//! Filesystem access as an injectable capability.
//!
//! The resolver only ever asks two questions of the filesystem: does a path
//! exist, and what text does it contain. [`Filesystem`] captures exactly
//! that surface, so hosts can substitute [`MemoryFilesystem`] in tests and
//! observe how often the resolver touches the disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::RenderError;

/// The filesystem operations consumed by the resolver.
pub trait Filesystem: Send + Sync {
    /// Returns whether `path` exists as a readable file.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the full contents of `path` as a string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String, RenderError>;
}

/// Production filesystem backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFilesystem;

impl Filesystem for DiskFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, RenderError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// In-memory filesystem for tests.
///
/// Files live in a shared map, so cloned handles observe each other's
/// changes. Every `exists` and `read_to_string` call is counted, which makes
/// the resolver's probing behavior observable: cached lookups stop touching
/// the filesystem, while default-template fallbacks re-probe on every call.
///
/// # Example
///
/// ```rust
/// use blueprint_templates::{Filesystem, MemoryFilesystem};
/// use std::path::Path;
///
/// let fs = MemoryFilesystem::new();
/// fs.insert("/tpl/posts/article.jinja", "Hello {{ name }}");
///
/// assert!(fs.exists(Path::new("/tpl/posts/article.jinja")));
/// assert_eq!(fs.exists_calls(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    exists_calls: Arc<AtomicUsize>,
    read_calls: Arc<AtomicUsize>,
}

impl MemoryFilesystem {
    /// Creates an empty in-memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filesystem pre-populated with files.
    pub fn with_files(files: HashMap<PathBuf, String>) -> Self {
        Self {
            files: Arc::new(Mutex::new(files)),
            ..Self::default()
        }
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), contents.into());
    }

    /// Removes a file, returning its contents if it existed.
    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().remove(path)
    }

    /// Number of existence checks performed so far.
    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    /// Number of file reads performed so far.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, RenderError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            ))
        })
    }
}
