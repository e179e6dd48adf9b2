use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::TextBehindResult;

/// Destination for an encoded export.
///
/// `emit` is only called with a complete, successfully encoded file.
pub trait ExportSink {
    /// Store `bytes` under `file_name`, returning the written path when there is one.
    fn emit(&mut self, file_name: &str, bytes: &[u8]) -> TextBehindResult<Option<PathBuf>>;
}

/// Writes exports into a directory, creating it on first use.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn emit(&mut self, file_name: &str, bytes: &[u8]) -> TextBehindResult<Option<PathBuf>> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(Some(path))
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitted files in order, as `(file_name, bytes)`.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    pub fn last(&self) -> Option<&(String, Vec<u8>)> {
        self.files.last()
    }
}

impl ExportSink for InMemorySink {
    fn emit(&mut self, file_name: &str, bytes: &[u8]) -> TextBehindResult<Option<PathBuf>> {
        self.files.push((file_name.to_owned(), bytes.to_vec()));
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
