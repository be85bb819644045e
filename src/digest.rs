//! Combined content digest over an ordered list of files

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{DocguardError, Result};

/// Number of hex characters shown where a short digest is enough
pub const DISPLAY_PREFIX_LEN: usize = 16;

/// SHA-256 over the raw bytes of every input file, concatenated in the order
/// given. No separators or names are mixed in, so callers must sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a full 64-character hex digest. Truncated values are rejected.
    pub fn from_hex(value: &str) -> Option<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(value.trim(), &mut bytes).ok()?;
        Some(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short form for human display, e.g. `3a7bd3e2360a3d29...`
    pub fn display_prefix(&self) -> String {
        let full = self.to_hex();
        format!("{}...", &full[..DISPLAY_PREFIX_LEN])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Stream every file into one accumulator and return the final digest.
///
/// An empty slice yields the digest of zero bytes. Any unreadable file aborts
/// the whole computation.
pub fn digest_files<P: AsRef<Path>>(paths: &[P]) -> Result<ContentDigest> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 1024 * 64];

    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DocguardError::io("open", path, e))?;
        let mut reader = BufReader::new(file);

        loop {
            let read = reader
                .read(&mut buffer)
                .map_err(|e| DocguardError::io("read", path, e))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
    }

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Ok(ContentDigest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sha256_hex(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    #[test]
    fn test_digest_is_sha256_of_concatenation() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.proto");
        let b = temp_dir.path().join("b.proto");
        fs::write(&a, "syntax = \"proto3\";\n").unwrap();
        fs::write(&b, "message B {}\n").unwrap();

        let digest = digest_files(&[&a, &b]).unwrap();
        assert_eq!(
            digest.to_hex(),
            sha256_hex(b"syntax = \"proto3\";\nmessage B {}\n")
        );
    }

    #[test]
    fn test_digest_depends_on_order() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.proto");
        let b = temp_dir.path().join("b.proto");
        fs::write(&a, "first").unwrap();
        fs::write(&b, "second").unwrap();

        let forward = digest_files(&[&a, &b]).unwrap();
        let backward = digest_files(&[&b, &a]).unwrap();
        assert_ne!(forward, backward);
        assert_eq!(forward, digest_files(&[&a, &b]).unwrap());
    }

    #[test]
    fn test_single_byte_change_changes_digest() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.proto");
        fs::write(&a, "message A { string id = 1; }").unwrap();
        let before = digest_files(&[&a]).unwrap();

        fs::write(&a, "message A { string id = 2; }").unwrap();
        let after = digest_files(&[&a]).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_empty_input_is_digest_of_nothing() {
        let digest = digest_files::<&Path>(&[]).unwrap();
        assert_eq!(digest.to_hex(), sha256_hex(b""));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.proto");
        let result = digest_files(&[&missing]);
        assert!(matches!(result, Err(DocguardError::Io { .. })));
    }

    #[test]
    fn test_hex_round_trip_and_prefix() {
        let digest = ContentDigest::from_bytes([0xab; 32]);
        assert_eq!(ContentDigest::from_hex(&digest.to_hex()), Some(digest));
        assert_eq!(digest.display_prefix(), "abababababababab...");
        assert_eq!(ContentDigest::from_hex("abababababababab"), None);
    }
}
