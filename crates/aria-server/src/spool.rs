//! Transient on-disk storage for inbound audio payloads.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// One inbound audio payload, spooled to a named temp file for the duration
/// of a single turn.
///
/// The file is owned exclusively by the handler that created it and is
/// removed when the value drops, on every exit path (success, pipeline
/// failure, or panic unwind). Names combine the caller's tag (channel or
/// request identity plus a per-message discriminator) with the random
/// suffix from `tempfile`, so concurrent turns never collide.
#[derive(Debug)]
pub struct TransientAudio {
    file: NamedTempFile,
}

impl TransientAudio {
    /// Spools `payload` into a fresh temp file under `dir`.
    pub fn create(dir: &Path, tag: &str, payload: &[u8]) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("aria-{tag}-"))
            .suffix(".audio")
            .tempfile_in(dir)?;

        file.write_all(payload)?;
        file.flush()?;

        Ok(Self { file })
    }

    /// Path of the spooled file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the spooled payload back.
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.file.path())
    }
}
