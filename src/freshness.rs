//! Decides whether the rendered artifact still matches its sources

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::artifact::EmbeddedState;
use crate::artifact::metadata::inspect;
use crate::digest::ContentDigest;
use crate::error::{DocguardError, Result};
use crate::sources::SourceSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    DigestMismatch {
        embedded: ContentDigest,
        current: ContentDigest,
    },
    MissingDigest,
    MalformedMetadata(String),
}

/// Outcome of a freshness check, in the order the states are tested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    NoArtifact { path: PathBuf },
    Placeholder { path: PathBuf },
    Stale { path: PathBuf, reason: StaleReason },
    Fresh { digest: ContentDigest },
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh { .. })
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Freshness::NoArtifact { path } => {
                write!(f, "API docs don't exist yet ({})", path.display())
            }
            Freshness::Placeholder { path } => {
                write!(f, "API docs not yet generated ({})", path.display())
            }
            Freshness::Stale { path, reason } => match reason {
                StaleReason::DigestMismatch { embedded, current } => write!(
                    f,
                    "API docs out of date ({}): embedded digest {} != current {}",
                    path.display(),
                    embedded.display_prefix(),
                    current.display_prefix()
                ),
                StaleReason::MissingDigest => write!(
                    f,
                    "API docs carry no embedded digest ({})",
                    path.display()
                ),
                StaleReason::MalformedMetadata(message) => write!(
                    f,
                    "API docs metadata is unreadable ({}): {message}",
                    path.display()
                ),
            },
            Freshness::Fresh { digest } => {
                write!(f, "API docs are current (digest {})", digest.display_prefix())
            }
        }
    }
}

/// Compare the artifact at `artifact_path` against the current `sources`.
///
/// Only I/O failures are errors; every document state maps to a [`Freshness`].
/// Sources are hashed only once the artifact is known to claim a digest.
pub fn check_freshness(artifact_path: &Path, sources: &SourceSet) -> Result<Freshness> {
    if !artifact_path.exists() {
        return Ok(Freshness::NoArtifact {
            path: artifact_path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(artifact_path)
        .map_err(|e| DocguardError::io("read", artifact_path, e))?;

    let path = artifact_path.to_path_buf();
    let freshness = match inspect(&content) {
        EmbeddedState::Placeholder => Freshness::Placeholder { path },
        EmbeddedState::NoDigest => Freshness::Stale {
            path,
            reason: StaleReason::MissingDigest,
        },
        EmbeddedState::Malformed(message) => Freshness::Stale {
            path,
            reason: StaleReason::MalformedMetadata(message),
        },
        EmbeddedState::Digest(embedded) => {
            let current = sources.digest()?;
            debug!(
                "Embedded digest {} vs current {}",
                embedded.display_prefix(),
                current.display_prefix()
            );
            if embedded == current {
                Freshness::Fresh { digest: current }
            } else {
                Freshness::Stale {
                    path,
                    reason: StaleReason::DigestMismatch { embedded, current },
                }
            }
        }
    };

    Ok(freshness)
}
