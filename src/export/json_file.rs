use super::{ExportResult, ExportSink};
use crate::model::{CrawlResult, Place};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each result as `<dir>/<title-key>.json`
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the result will be written to
    pub fn path_for(&self, result: &CrawlResult) -> PathBuf {
        self.dir.join(format!("{}.json", result.file_key()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for JsonFileSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&mut self, _place: &Place, result: &CrawlResult) -> ExportResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(result);
        fs::write(&path, serde_json::to_string(result)?)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
