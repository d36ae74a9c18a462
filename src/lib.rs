//! eth-event-exporter - chunked on-chain event log extraction
//!
//! Fetches event logs from a blockchain node over a JSON RPC-style interface
//! and persists them as one JSON artifact per fixed-size height range. The
//! artifact filenames already on disk are the only progress ledger, so an
//! interrupted run resumes exactly where it stopped without re-fetching or
//! skipping chunks.
//!
//! # Example
//!
//! ```rust,no_run
//! use eth_event_exporter::{Config, RangeExtractor};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new(
//!         "http://127.0.0.1:18888/rpc",
//!         "0x7d73424a8256c0b2ba245e5d5a3de8820e45f390",
//!         "events",
//!     );
//!
//!     let extractor = RangeExtractor::from_config(&config)?;
//!     extractor.export_range(1, 25_000)?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod rpc;
pub mod transport;

// Re-exports for convenience
pub use client::{ApiErrorCode, ApiResult, RequestClient};
pub use config::{Config, TransportKind};
pub use error::{ConfigError, Error, Result};
pub use extractor::{RangeExtractor, DEFAULT_CHUNK_SIZE};
pub use rpc::{EthRpcService, FetchLogs};
pub use transport::{CurlTransport, HttpMethod, HttpTransport, RequestPayload, Transport};
