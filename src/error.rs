//! Error types shared by the engine

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = DocguardError> = std::result::Result<T, E>;

#[derive(Error, Debug, Diagnostic)]
pub enum DocguardError {
    /// A required source directory or file is absent
    #[error("{what} not found: {}", path.display())]
    #[diagnostic(
        code(docguard::missing_input),
        help("create it first, or point docguard.yml at the right location")
    )]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("no *.{extension} files found in {}", dir.display())]
    #[diagnostic(
        code(docguard::empty_source_set),
        help("an empty schema section would look like a placeholder, so nothing was written")
    )]
    EmptySourceSet { dir: PathBuf, extension: String },

    #[error("failed to {action} {}", path.display())]
    #[diagnostic(code(docguard::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to discover source files under {}: {message}", dir.display())]
    #[diagnostic(code(docguard::discovery))]
    Discovery { dir: PathBuf, message: String },

    #[error("failed to render artifact")]
    #[diagnostic(code(docguard::render))]
    Render(#[source] minijinja::Error),

    #[error("invalid metadata block in {}: {message}", path.display())]
    #[diagnostic(
        code(docguard::metadata),
        help("regenerate the artifact with `docguard generate`")
    )]
    Metadata { path: PathBuf, message: String },

    #[error("failed to read config {}: {message}", path.display())]
    #[diagnostic(code(docguard::config))]
    Config { path: PathBuf, message: String },

    #[error("config {} does not match the schema:\n{}", path.display(), violations.join("\n"))]
    #[diagnostic(code(docguard::config_schema))]
    ConfigSchema {
        path: PathBuf,
        violations: Vec<String>,
    },
}

impl DocguardError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
