//! Discovery of schema source files

use globwalk::{FileType, GlobWalkerBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::digest::{ContentDigest, digest_files};
use crate::error::{DocguardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Only files directly inside the directory
    Flat,
    /// Every matching file below the directory
    Recursive,
}

/// Schema source files, kept sorted by their root-relative path so the
/// digest never depends on filesystem enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl SourceSet {
    /// Build a set from arbitrary paths; relative paths are taken as relative to `root`.
    pub fn from_paths<I, P>(root: impl Into<PathBuf>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let root = root.into();
        let mut files: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                p.strip_prefix(&root).unwrap_or(p).to_path_buf()
            })
            .collect();
        files.sort_by_cached_key(|p| sort_key(p));
        files.dedup();
        Self { root, files }
    }

    /// Collect every `*.{extension}` file in `dir`.
    ///
    /// A missing directory is reported as [`DocguardError::MissingInput`] so
    /// callers can decide whether that is fatal or "not yet applicable".
    /// Symlinked schema files are included under their link path.
    pub fn discover(root: &Path, dir: &Path, extension: &str, scan: Scan) -> Result<Self> {
        if !dir.is_dir() {
            return Err(DocguardError::MissingInput {
                what: "schema source directory",
                path: dir.to_path_buf(),
            });
        }

        let pattern = format!("*.{extension}");
        let mut builder = GlobWalkerBuilder::from_patterns(dir, &[pattern.as_str()])
            .file_type(FileType::FILE)
            .follow_links(true);
        if scan == Scan::Flat {
            builder = builder.max_depth(1);
        }
        let walker = builder.build().map_err(|e| DocguardError::Discovery {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut found = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| DocguardError::Discovery {
                dir: dir.to_path_buf(),
                message: e.to_string(),
            })?;
            found.push(entry.path().to_path_buf());
        }

        let set = Self::from_paths(root, found);
        debug!(
            "Discovered {} *.{extension} file(s) in {} ({scan:?})",
            set.len(),
            dir.display()
        );
        Ok(set)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Paths relative to the project root, in digest order
    pub fn relative_paths(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn absolute_paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|p| self.root.join(p)).collect()
    }

    /// Forward-slash display form of each path, in digest order
    pub fn display_paths(&self) -> Vec<String> {
        self.files.iter().map(|p| sort_key(p)).collect()
    }

    pub fn digest(&self) -> Result<ContentDigest> {
        digest_files(&self.absolute_paths())
    }

    /// Read every file as text, in digest order
    pub fn read_contents(&self) -> Result<Vec<String>> {
        self.absolute_paths()
            .iter()
            .map(|path| {
                std::fs::read_to_string(path).map_err(|e| DocguardError::io("read", path, e))
            })
            .collect()
    }
}

fn sort_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
