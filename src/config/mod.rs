//! Project configuration: where the schema, the artifact and the code live

mod schema;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{DocguardError, Result};

pub use schema::validate_config_value;

/// Config file looked up in the project root when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "docguard.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub schema: SchemaConfig,
    pub artifact: ArtifactConfig,
    pub architecture: ArchitectureConfig,
    pub build_check: BuildCheckConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Directory scanned (non-recursively) when generating
    pub generate_dir: PathBuf,
    /// Directory scanned recursively when validating
    pub validate_root: PathBuf,
    /// The freshness stage only applies once this directory exists
    pub gate_dir: PathBuf,
    /// File extension of schema sources, without the dot
    pub extension: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            generate_dir: PathBuf::from("proto/adr/v1"),
            validate_root: PathBuf::from("proto"),
            gate_dir: PathBuf::from("proto/adr/v1"),
            extension: "proto".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    pub path: PathBuf,
    pub title: String,
    pub regenerate_command: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("docs/api/GRPC.md"),
            title: "gRPC API Reference".to_string(),
            regenerate_command: "pnpm docs:generate".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchitectureConfig {
    /// Reference document that describes the module layout
    pub overview: PathBuf,
    /// Directory whose immediate subdirectories are the observed modules
    pub modules_dir: PathBuf,
    /// Modules the architecture docs claim exist
    pub expected: Vec<String>,
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self {
            overview: PathBuf::from("docs/architecture/OVERVIEW.md"),
            modules_dir: PathBuf::from("crates"),
            expected: ["adr-domain", "adr-sdk", "adr-adapters", "adr-service", "adr-cli"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildCheckConfig {
    pub enabled: bool,
    pub program: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for BuildCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "cargo".to_string(),
            args: vec!["check".to_string(), "--workspace".to_string()],
            timeout_secs: 60,
        }
    }
}

impl BuildCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Config {
    /// Parse and schema-check a YAML config document
    pub fn from_yaml(content: &str, source_path: &Path) -> Result<Self> {
        // A file holding only comments is an empty document
        let has_document = content.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#') && line != "---"
        });
        if !has_document {
            return Ok(Self::default());
        }

        let value: serde_json::Value =
            serde_yaml::from_str(content).map_err(|e| DocguardError::Config {
                path: source_path.to_path_buf(),
                message: e.to_string(),
            })?;

        // `~` or `null` on its own also means "all defaults"
        if value.is_null() {
            return Ok(Self::default());
        }

        validate_config_value(&value, source_path)?;

        serde_json::from_value(value).map_err(|e| DocguardError::Config {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the config for a project rooted at `root`.
    ///
    /// An explicit path must exist. Without one, `docguard.yml` in the root is
    /// used when present and the built-in defaults otherwise.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) if path.is_absolute() => (path.to_path_buf(), true),
            Some(path) => (root.join(path), true),
            None => (root.join(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(DocguardError::MissingInput {
                    what: "config file",
                    path,
                });
            }
            debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| DocguardError::io("read config file", &path, e))?;
        debug!("Loading config from {}", path.display());
        Self::from_yaml(&content, &path)
    }
}

/// A loaded config bound to the directory its relative paths resolve against
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn load(root: impl Into<PathBuf>, explicit_config: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let config = Config::load(&root, explicit_config)?;
        Ok(Self { root, config })
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn generate_dir(&self) -> PathBuf {
        self.resolve(&self.config.schema.generate_dir)
    }

    pub fn validate_root(&self) -> PathBuf {
        self.resolve(&self.config.schema.validate_root)
    }

    pub fn gate_dir(&self) -> PathBuf {
        self.resolve(&self.config.schema.gate_dir)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.resolve(&self.config.artifact.path)
    }

    pub fn overview_path(&self) -> PathBuf {
        self.resolve(&self.config.architecture.overview)
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.resolve(&self.config.architecture.modules_dir)
    }
}
