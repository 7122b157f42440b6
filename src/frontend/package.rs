//! Package manifests and module lookup.
//!
//! A package is a directory tree with a `quill.json` manifest:
//!
//! ```json
//! {
//!   "name": "app",
//!   "version": "0.1.0",
//!   "source-directories": ["src"],
//!   "dependencies": { "geometry": "../geometry" }
//! }
//! ```
//!
//! Module `A.B` lives at `A/B.quill` (or `A/B.rs` for a native module) below one of the source directories. A
//! directory without a manifest is an implicit package whose only source directory is the directory itself.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::source::SourceLoader;

pub const MANIFEST_FILE: &str = "quill.json";
pub const SOURCE_EXTENSION: &str = "quill";
pub const NATIVE_EXTENSION: &str = "rs";

/// Contents of `quill.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_source_directories")]
    pub source_directories: Vec<PathBuf>,
    /// Package name → directory, relative to the manifest.
    #[serde(default)]
    pub dependencies: BTreeMap<String, PathBuf>,
}

fn default_source_directories() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("package dependency cycle through {}", path.display())]
    Cycle { path: PathBuf },
}

impl ManifestError {
    /// The manifest the error is about.
    pub fn path(&self) -> &Path {
        match self {
            ManifestError::Io { path, .. } | ManifestError::Json { path, .. } | ManifestError::Cycle { path } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FindModuleError {
    #[error("Cannot find module '{0}'")]
    NotFound(String),

    #[error("'{0}' is not a valid module name")]
    InvalidName(String),
}

/// A loaded package and, recursively, the packages it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
    /// `None` for an implicit package.
    pub manifest: Option<PathBuf>,
    /// Absolute-or-relative as given, normalized, in manifest order.
    pub source_dirs: Vec<PathBuf>,
    pub dependencies: Vec<Project>,
}

impl Project {
    /// Load the package that `dir` belongs to.
    ///
    /// `dir` and its ancestors are searched for a manifest. Without one, `dir` itself becomes an implicit package.
    ///
    /// ## Errors
    /// An unreadable or malformed manifest (this package's or a dependency's), or a dependency cycle.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path, loader: &dyn SourceLoader) -> Result<Self, ManifestError> {
        let dir = normalize(dir);
        let found = dir
            .ancestors()
            .map(|ancestor| ancestor.join(MANIFEST_FILE))
            .find(|candidate| loader.is_file(candidate));

        match found {
            Some(manifest) => Self::from_manifest(&manifest, loader, &mut Vec::new()),
            None => {
                tracing::debug!("no manifest, using implicit package");
                Ok(Self::implicit(&dir))
            }
        }
    }

    /// A package without a manifest, rooted at `dir`.
    pub fn implicit(dir: &Path) -> Self {
        let root = normalize(dir);
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "main".to_string());
        Self {
            name,
            source_dirs: vec![root.clone()],
            root,
            manifest: None,
            dependencies: Vec::new(),
        }
    }

    fn from_manifest(path: &Path, loader: &dyn SourceLoader, stack: &mut Vec<PathBuf>) -> Result<Self, ManifestError> {
        let path = normalize(path);
        if stack.contains(&path) {
            return Err(ManifestError::Cycle { path });
        }

        let text = loader.read(&path).map_err(|source| ManifestError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest = Manifest::from_json(&text).map_err(|source| ManifestError::Json {
            path: path.clone(),
            source,
        })?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(package = %manifest.name, root = %root.display(), "loaded manifest");

        stack.push(path.clone());
        let mut dependencies = Vec::with_capacity(manifest.dependencies.len());
        for dir in manifest.dependencies.values() {
            let dep_manifest = root.join(dir).join(MANIFEST_FILE);
            dependencies.push(Self::from_manifest(&dep_manifest, loader, stack)?);
        }
        stack.pop();

        Ok(Self {
            name: manifest.name,
            source_dirs: manifest.source_directories.iter().map(|d| normalize(&root.join(d))).collect(),
            root,
            manifest: Some(path),
            dependencies,
        })
    }

    /// Source directories of this package followed by those of its dependencies, depth first.
    pub fn search_path(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = self.source_dirs.iter().map(PathBuf::as_path).collect();
        for dep in &self.dependencies {
            dirs.extend(dep.search_path());
        }
        dirs
    }

    /// Locate the file that defines module `name`.
    ///
    /// Each source directory is tried in order; within one directory a `.quill` file is preferred over a native
    /// `.rs` file.
    pub fn find_module(&self, name: &str, loader: &dyn SourceLoader) -> Result<PathBuf, FindModuleError> {
        let relative = module_relative_path(name).ok_or_else(|| FindModuleError::InvalidName(name.to_string()))?;

        for dir in self.search_path() {
            for extension in [SOURCE_EXTENSION, NATIVE_EXTENSION] {
                let candidate = normalize(&dir.join(&relative).with_extension(extension));
                if loader.is_file(&candidate) {
                    tracing::trace!(module = name, path = %candidate.display(), "found module");
                    return Ok(candidate);
                }
            }
        }
        Err(FindModuleError::NotFound(name.to_string()))
    }

    /// Module name implied by where `path` sits below a source directory, or `None` outside all of them.
    pub fn module_name_for(&self, path: &Path) -> Option<String> {
        let path = normalize(path);
        let extension = path.extension()?.to_str()?;
        if extension != SOURCE_EXTENSION && extension != NATIVE_EXTENSION {
            return None;
        }

        self.search_path().into_iter().find_map(|dir| {
            let rest = path.strip_prefix(dir).ok()?.with_extension("");
            let segments: Vec<String> = rest
                .components()
                .map(|c| match c {
                    Component::Normal(s) => s.to_str().map(str::to_string),
                    _ => None,
                })
                .collect::<Option<_>>()?;
            if segments.is_empty() {
                None
            } else {
                Some(segments.join("."))
            }
        })
    }
}

/// `true` for host-interop modules.
pub fn is_native(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == NATIVE_EXTENSION)
}

/// `Math.Vector` → `Math/Vector`
fn module_relative_path(name: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for segment in name.split('.') {
        let mut chars = segment.chars();
        let first = chars.next()?;
        if !first.is_ascii_uppercase() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        path.push(segment);
    }
    Some(path)
}

/// Lexically clean a path: drop `.` components and fold `dir/..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
