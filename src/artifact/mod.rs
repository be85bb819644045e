//! The generated documentation artifact: rendering, writing, and the metadata
//! block that lets validation tell a fresh document from a stale one.

pub mod metadata;
mod render;

use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{DocguardError, Result};

pub use metadata::{ArtifactMetadata, ArtifactStatus, EmbeddedState};
pub use render::ArtifactRenderer;

#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub metadata: ArtifactMetadata,
    pub body: String,
}

impl RenderedArtifact {
    /// Replace whatever is at `path` with this document
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| DocguardError::io("create directory", parent, e))?;
        }
        fs::write(path, &self.body).map_err(|e| DocguardError::io("write", path, e))?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArtifactConfig;
    use crate::digest::ContentDigest;
    use crate::sources::SourceSet;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn renderer() -> ArtifactRenderer {
        ArtifactRenderer::new(&ArtifactConfig::default(), "proto").unwrap()
    }

    fn sources(temp_dir: &TempDir) -> SourceSet {
        let dir = temp_dir.path().join("proto/adr/v1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.proto"), "message B {}").unwrap();
        fs::write(dir.join("a.proto"), "syntax = \"proto3\";").unwrap();
        SourceSet::from_paths(temp_dir.path(), [dir.join("b.proto"), dir.join("a.proto")])
    }

    #[test]
    fn test_render_embeds_digest_sources_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let sources = sources(&temp_dir);
        let when = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let artifact = renderer().render(&sources, when).unwrap();
        let digest = sources.digest().unwrap();

        assert_eq!(artifact.metadata.status, ArtifactStatus::Generated);
        assert_eq!(artifact.metadata.digest(), Some(digest));
        assert!(artifact.body.starts_with(metadata::BLOCK_OPEN));
        assert!(artifact.body.contains("**Last Generated**: 2026-03-01T12:00:00Z"));
        assert!(artifact.body.contains(&format!("`{}`", digest.display_prefix())));
        assert!(artifact.body.contains(&format!("- Schema Hash: {digest}")));
        assert!(artifact.body.contains(
            "Generated from: `proto/adr/v1/a.proto, proto/adr/v1/b.proto`"
        ));
        assert!(
            artifact
                .body
                .contains("```protobuf\nsyntax = \"proto3\";\n\nmessage B {}\n```")
        );
        assert_eq!(
            metadata::inspect(&artifact.body),
            EmbeddedState::Digest(digest)
        );
    }

    #[test]
    fn test_render_twice_keeps_digest() {
        let temp_dir = TempDir::new().unwrap();
        let sources = sources(&temp_dir);
        let first = renderer()
            .render(&sources, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
            .unwrap();
        let second = renderer()
            .render(&sources, Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap())
            .unwrap();

        assert_ne!(first.body, second.body);
        assert_eq!(first.metadata.digest, second.metadata.digest);
    }

    #[test]
    fn test_render_refuses_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        let empty = SourceSet::from_paths(temp_dir.path(), Vec::<&Path>::new());
        let result = renderer().render(&empty, Utc::now());
        assert!(matches!(result, Err(DocguardError::EmptySourceSet { .. })));
    }

    #[test]
    fn test_placeholder_is_recognised() {
        let artifact = renderer().render_placeholder().unwrap();
        assert_eq!(artifact.metadata.status, ArtifactStatus::Placeholder);
        assert!(artifact.body.contains(metadata::PLACEHOLDER_MARKER));
        assert_eq!(metadata::inspect(&artifact.body), EmbeddedState::Placeholder);
    }

    #[test]
    fn test_write_replaces_existing_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docs/api/GRPC.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "old content that is much longer than the new one").unwrap();

        let artifact = RenderedArtifact {
            metadata: ArtifactMetadata::generated(
                &ContentDigest::from_bytes([1; 32]),
                "now".to_string(),
                vec![],
            ),
            body: "new".to_string(),
        };
        artifact.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
