//! Artifact writer: streams one download into a private temp file next to the
//! final path and renames it into place only when the transfer succeeded.
//!
//! A half-written file never sits at the final path, so skip-existing on a
//! later run can trust whatever it finds there. Each writer owns its temp
//! file, so two writers targeting the same path both succeed and the last
//! rename wins.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const PART_SUFFIX: &str = ".part";

/// Sequential writer for one artifact. Dropping it without [`finish`](Self::finish)
/// removes the temp file.
pub struct ArtifactWriter {
    file: NamedTempFile,
    final_path: PathBuf,
    written: u64,
}

impl ArtifactWriter {
    /// Create parent directories and a fresh `<name>.XXXXXX.part` temp file beside `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let parent = match final_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let mut prefix = final_path.file_name().unwrap_or_default().to_os_string();
        prefix.push(".");
        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(PART_SUFFIX)
            .tempfile_in(parent)?;
        Ok(Self {
            file,
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    #[cfg(test)]
    fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Flush, sync and rename the temp file onto the final path. Returns bytes written.
    /// On error the temp file is removed.
    pub fn finish(mut self) -> io::Result<u64> {
        self.file.flush()?;
        self.file.as_file().sync_all()?;
        self.file.persist(&self.final_path).map_err(|e| e.error)?;
        Ok(self.written)
    }
}
