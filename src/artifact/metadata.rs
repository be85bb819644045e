//! The machine-readable block at the top of a rendered artifact

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;

/// Opening marker of the metadata block; the block ends at the next `-->`
pub const BLOCK_OPEN: &str = "<!-- docguard";

/// Phrase placeholder documents carry for readers without the metadata block
pub const PLACEHOLDER_MARKER: &str = "Not yet generated";

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A\s*<!-- docguard[ \t]*\r?\n(?P<body>.*?)-->")
        .expect("metadata block regex is valid")
});

// Trailing "- Schema Hash: <hex>" line written in the metadata list at the end
static TRAILING_DIGEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^- (?:Schema|Proto) Hash: `?(?P<digest>[0-9a-fA-F]{64})`?\s*$")
        .expect("trailing digest regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Placeholder,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub status: ArtifactStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    /// Full hex digest of the sources; never the display prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl ArtifactMetadata {
    pub fn placeholder() -> Self {
        Self {
            status: ArtifactStatus::Placeholder,
            generated_at: None,
            digest: None,
            sources: Vec::new(),
        }
    }

    pub fn generated(digest: &ContentDigest, generated_at: String, sources: Vec<String>) -> Self {
        Self {
            status: ArtifactStatus::Generated,
            generated_at: Some(generated_at),
            digest: Some(digest.to_hex()),
            sources,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn digest(&self) -> Option<ContentDigest> {
        self.digest.as_deref().and_then(ContentDigest::from_hex)
    }
}

/// What could be learned about an artifact from its text alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedState {
    /// The artifact declares itself a placeholder
    Placeholder,
    /// A full digest was found
    Digest(ContentDigest),
    /// Neither a placeholder marker nor a usable full digest
    NoDigest,
    /// The metadata block exists but could not be parsed
    Malformed(String),
}

/// Parse the leading metadata block, if there is one
pub fn parse_block(content: &str) -> Option<Result<ArtifactMetadata, serde_yaml::Error>> {
    let captures = BLOCK_RE.captures(content)?;
    let body = captures.name("body").map(|m| m.as_str()).unwrap_or_default();
    Some(serde_yaml::from_str(body))
}

/// Classify an artifact's text.
///
/// The structured block wins when present. Documents without one fall back to
/// the placeholder phrase and the trailing full-digest line.
pub fn inspect(content: &str) -> EmbeddedState {
    match parse_block(content) {
        Some(Ok(metadata)) => match metadata.status {
            ArtifactStatus::Placeholder => EmbeddedState::Placeholder,
            ArtifactStatus::Generated => match (&metadata.digest, metadata.digest()) {
                (_, Some(digest)) => EmbeddedState::Digest(digest),
                (Some(raw), None) => {
                    EmbeddedState::Malformed(format!("digest '{raw}' is not a full SHA-256 value"))
                }
                (None, None) => EmbeddedState::NoDigest,
            },
        },
        Some(Err(e)) => EmbeddedState::Malformed(e.to_string()),
        None => {
            if content.contains(PLACEHOLDER_MARKER) {
                return EmbeddedState::Placeholder;
            }
            TRAILING_DIGEST_RE
                .captures_iter(content)
                .last()
                .and_then(|c| c.name("digest"))
                .and_then(|m| ContentDigest::from_hex(m.as_str()))
                .map(EmbeddedState::Digest)
                .unwrap_or(EmbeddedState::NoDigest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f";

    #[test]
    fn test_block_round_trip() {
        let digest = ContentDigest::from_hex(DIGEST).unwrap();
        let metadata = ArtifactMetadata::generated(
            &digest,
            "2026-01-01T00:00:00Z".to_string(),
            vec!["proto/adr/v1/adr.proto".to_string()],
        );
        let doc = format!("{BLOCK_OPEN}\n{}-->\n# Title\n", metadata.to_yaml().unwrap());

        let parsed = parse_block(&doc).unwrap().unwrap();
        assert_eq!(parsed, metadata);
        assert_eq!(inspect(&doc), EmbeddedState::Digest(digest));
    }

    #[test]
    fn test_placeholder_block() {
        let doc = "<!-- docguard\nstatus: placeholder\n-->\n# API\n";
        assert_eq!(inspect(doc), EmbeddedState::Placeholder);
    }

    #[test]
    fn test_block_must_lead_the_document() {
        let doc = format!("# API\n\n<!-- docguard\nstatus: generated\ndigest: {DIGEST}\n-->\n");
        assert!(parse_block(&doc).is_none());
        assert_eq!(inspect(&doc), EmbeddedState::NoDigest);
    }

    #[test]
    fn test_truncated_digest_in_block_is_malformed() {
        let doc = "<!-- docguard\nstatus: generated\ndigest: 0f0f0f0f0f0f0f0f\n-->\n";
        assert!(matches!(inspect(doc), EmbeddedState::Malformed(_)));
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let doc = "<!-- docguard\nstatus: pending\n-->\n";
        assert!(matches!(inspect(doc), EmbeddedState::Malformed(_)));
    }

    #[test]
    fn test_legacy_placeholder_phrase() {
        let doc = "# gRPC API Reference\n\n**Status**: ⏳ Not yet generated\n";
        assert_eq!(inspect(doc), EmbeddedState::Placeholder);
    }

    #[test]
    fn test_legacy_trailing_digest_ignores_display_prefix() {
        let doc = format!(
            "# gRPC API Reference\n\n**Proto Hash**: `0f0f0f0f0f0f0f0f...`\n\n\
             **Metadata**:\n- Generated: now\n- Proto Hash: {DIGEST}\n"
        );
        assert_eq!(
            inspect(&doc),
            EmbeddedState::Digest(ContentDigest::from_hex(DIGEST).unwrap())
        );
    }

    #[test]
    fn test_document_without_any_digest() {
        assert_eq!(inspect("# Hand-written API notes\n"), EmbeddedState::NoDigest);
    }
}
