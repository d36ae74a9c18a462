//! Chunked event extraction with filesystem-derived resumption
//!
//! [`RangeExtractor`] walks a height range in fixed-size chunks, persisting
//! one JSON artifact per chunk. The artifact filenames already present in the
//! export folder are the sole source of truth for resumption; there is no
//! separate progress ledger.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::info;

use crate::client::ApiResult;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::rpc::{EthRpcService, FetchLogs};

/// Heights per artifact unless configured otherwise
pub const DEFAULT_CHUNK_SIZE: u64 = 10_000;

static ARTIFACT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-fx0-9]+)_events_([0-9]+)_to_([0-9]+)\.json$").unwrap());

/// Invoked after each persisted chunk with (highest height done, end height)
pub type ProgressCallback = Box<dyn Fn(u64, u64)>;

/// Height-ordered chunked extractor for one contract and export folder
pub struct RangeExtractor {
    service: Box<dyn FetchLogs>,
    contract: String,
    export_dir: PathBuf,
    chunk_size: u64,
    progress: Option<ProgressCallback>,
}

impl RangeExtractor {
    pub fn new(
        service: Box<dyn FetchLogs>,
        contract: impl Into<String>,
        export_dir: impl Into<PathBuf>,
        chunk_size: u64,
    ) -> Self {
        Self {
            service,
            contract: contract.into(),
            export_dir: export_dir.into(),
            // A zero chunk size would never advance the loop.
            chunk_size: chunk_size.max(1),
            progress: None,
        }
    }

    /// Wire up the full production stack from a [`Config`]
    pub fn from_config(config: &Config) -> Result<Self> {
        let service = EthRpcService::new(config.build_client()?, config.contract.clone());
        Ok(Self::new(
            Box::new(service),
            config.contract.clone(),
            config.export_dir.clone(),
            config.chunk_size,
        ))
    }

    /// Set a progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(u64, u64) + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Extract and persist all events for heights `start..=end` inclusive,
    /// resuming from whatever the export folder already covers.
    ///
    /// Chunks are fetched and persisted strictly in increasing height order;
    /// a chunk whose fetch fails aborts the run, leaving no artifact for it,
    /// so the next invocation retries that chunk in full.
    pub fn export_range(&self, start_height: u64, end_height: u64) -> Result<()> {
        info!(
            "Start to extract events from height {} to {}...",
            start_height, end_height
        );
        fs::create_dir_all(&self.export_dir)?;

        let mut current_height = self.processed_height()?;
        if current_height >= start_height {
            info!("Already extracted up to height {}", current_height);
            if current_height < end_height {
                info!("Continue from height {}...", current_height + 1);
            }
        } else {
            current_height = start_height.saturating_sub(1);
        }

        while current_height < end_height {
            let from_height = current_height + 1;
            let to_height = (from_height + self.chunk_size - 1).min(end_height);
            self.export_chunk(from_height, to_height)?;
            current_height = to_height;
            info!(
                "Extracted events from height {} to {}",
                from_height, to_height
            );
            if let Some(callback) = &self.progress {
                callback(current_height, end_height);
            }
        }

        Ok(())
    }

    /// Highest height already covered by an artifact in the export folder;
    /// 0 when nothing matches the artifact naming pattern.
    pub fn processed_height(&self) -> Result<u64> {
        let mut current_height = 0;
        for entry in fs::read_dir(&self.export_dir)? {
            let file_name = entry?.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(captures) = ARTIFACT_NAME.captures(name) {
                if let Ok(to_height) = captures[3].parse::<u64>() {
                    current_height = current_height.max(to_height);
                }
            }
        }
        Ok(current_height)
    }

    // Fetch one chunk and persist it; both heights inclusive.
    fn export_chunk(&self, from_height: u64, to_height: u64) -> Result<()> {
        match self.service.get_logs(from_height, to_height) {
            ApiResult::Success { body } => self.write_artifact(from_height, to_height, &body),
            ApiResult::Error { code, message } => Err(Error::Fetch { code, message }),
        }
    }

    // The artifact appears under its final name only once the chunk's data is
    // fully on disk; a crash mid-chunk leaves nothing behind.
    fn write_artifact(&self, from_height: u64, to_height: u64, body: &Value) -> Result<()> {
        let name = format!(
            "{}_events_{}_to_{}.json",
            self.contract, from_height, to_height
        );
        let mut tmp = NamedTempFile::new_in(&self.export_dir)?;
        serde_json::to_writer_pretty(&mut tmp, body)?;
        tmp.flush()?;
        tmp.persist(self.export_dir.join(name))
            .map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}
