//! Source cache shared by both parse passes.
//!
//! Every file is read once per session: discovery reads it, completion and diagnostics rendering reuse the cached
//! text. Reads go through a [`SourceLoader`] so the whole pipeline can run against an in-memory file set.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_syntax::diagnostics::line_col;

/// Where source text and manifests come from.
pub trait SourceLoader {
    fn read(&self, path: &Path) -> io::Result<String>;

    fn is_file(&self, path: &Path) -> bool;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// A fixed set of in-memory files.
#[derive(Debug, Clone, Default)]
pub struct MemLoader {
    files: HashMap<PathBuf, String>,
}

impl MemLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }
}

impl SourceLoader for MemLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display())))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

/// Path → source text cache.
pub struct CodeMap {
    loader: Box<dyn SourceLoader>,
    files: HashMap<PathBuf, Arc<str>>,
}

impl CodeMap {
    pub fn new(loader: Box<dyn SourceLoader>) -> Self {
        Self {
            loader,
            files: HashMap::new(),
        }
    }

    pub fn loader(&self) -> &dyn SourceLoader {
        self.loader.as_ref()
    }

    /// Return the cached text of `path`, reading it on first use.
    pub fn load(&mut self, path: &Path) -> io::Result<Arc<str>> {
        if let Some(source) = self.files.get(path) {
            return Ok(Arc::clone(source));
        }
        let source: Arc<str> = Arc::from(self.loader.read(path)?);
        tracing::debug!(path = %path.display(), bytes = source.len(), "loaded source");
        self.files.insert(path.to_path_buf(), Arc::clone(&source));
        Ok(source)
    }

    /// Register text that did not come from the loader (e.g. a buffer handed to `parse_from`).
    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<Arc<str>>) {
        self.files.insert(path.into(), source.into());
    }

    /// Cached text, without touching the loader.
    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        self.files.get(path).cloned()
    }

    /// 1-based line and column of a byte offset in a cached file.
    pub fn line_col(&self, path: &Path, offset: usize) -> Option<(usize, usize)> {
        self.files.get(path).map(|source| line_col(source, offset))
    }
}

impl std::fmt::Debug for CodeMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeMap").field("files", &self.files.keys().collect::<Vec<_>>()).finish()
    }
}
