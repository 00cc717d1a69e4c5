//! A single emitted artifact: a relative path plus its rendered bytes.
//! Every emitter in this crate returns [`File`] values; only [`crate::writer`]
//! touches the filesystem.

use sha2::{Digest, Sha256};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub path: PathBuf,
    pub contents: String,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self { path: path.into(), contents: contents.into() }
    }

    /// Hex-encoded SHA-256 of the rendered contents, logged alongside each
    /// written file so a run's output is independently checkable without
    /// diffing the full tree.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.contents.as_bytes());
        hex_encode(&hasher.finalize())
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
