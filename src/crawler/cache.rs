//! Single-slot holder for the most recent crawl result
//!
//! A result lives here between a successful crawl and its export. Exporting
//! always empties the slot, whether or not the sink succeeds, so a result is
//! never written twice.

use crate::export::ExportSink;
use crate::model::{CrawlResult, Place};
use crate::CrawlerError;

/// Holds at most one crawl result awaiting export
#[derive(Debug, Default)]
pub struct ResultCache {
    slot: Option<CrawlResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `result`, replacing any result that was never exported
    pub fn store(&mut self, result: CrawlResult) {
        if let Some(previous) = self.slot.replace(result) {
            tracing::warn!("Discarding unexported result for '{}'", previous.title);
        }
    }

    /// The cached result, if any
    pub fn peek(&self) -> Option<&CrawlResult> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Drops the cached result without exporting it
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Exports the cached result through one sink
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The sink wrote the result
    /// * `Err(CrawlerError::NoResult)` - Nothing was cached
    /// * `Err(CrawlerError::Export)` - The sink failed; the result is gone
    pub fn export_as(&mut self, place: &Place, sink: &mut dyn ExportSink) -> Result<(), CrawlerError> {
        let result = self.slot.take().ok_or(CrawlerError::NoResult)?;
        sink.export(place, &result)?;
        tracing::info!(place = %place.name, sink = sink.name(), "Exported '{}'", result.title);
        Ok(())
    }

    /// Exports the cached result through every sink
    ///
    /// Each sink is attempted even if an earlier one fails. The first failure
    /// is returned after all sinks ran.
    pub fn export_all(
        &mut self,
        place: &Place,
        sinks: &mut [Box<dyn ExportSink>],
    ) -> Result<(), CrawlerError> {
        let result = self.slot.take().ok_or(CrawlerError::NoResult)?;

        let mut first_error = None;
        for sink in sinks.iter_mut() {
            match sink.export(place, &result) {
                Ok(()) => {
                    tracing::info!(place = %place.name, sink = sink.name(), "Exported '{}'", result.title);
                }
                Err(e) => {
                    tracing::error!(place = %place.name, sink = sink.name(), "Export failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
