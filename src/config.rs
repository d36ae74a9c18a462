//! Runtime configuration for the exporter

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::RequestClient;
use crate::error::{ConfigError, Result};
use crate::extractor::DEFAULT_CHUNK_SIZE;
use crate::transport::{CurlTransport, HttpTransport, Transport};

/// Which backend performs outbound calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Pooled in-process HTTP client
    #[default]
    Http,
    /// One `curl` child process per call
    Curl,
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(TransportKind::Http),
            "curl" => Ok(TransportKind::Curl),
            other => Err(ConfigError::UnknownTransport(other.to_string())),
        }
    }
}

/// Configuration surface consumed by the core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the RPC endpoint
    pub rpc_url: String,
    /// Contract address whose events are extracted
    pub contract: String,
    /// Folder receiving one artifact per chunk
    pub export_dir: PathBuf,
    /// Heights per artifact
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
    /// Transport backend selection
    #[serde(default)]
    pub transport: TransportKind,
    /// Optional bearer/session token forwarded to the transport
    #[serde(default)]
    pub token: Option<String>,
    /// Whether TLS certificate validation is enforced. Disabling is meant for
    /// self-signed/test endpoints only.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Request timeout in seconds (http backend)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Create a config with defaults for everything but the required fields
    pub fn new(
        rpc_url: impl Into<String>,
        contract: impl Into<String>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract: contract.into(),
            export_dir: export_dir.into(),
            chunk_size: default_chunk_size(),
            transport: TransportKind::default(),
            token: None,
            verify_tls: default_verify_tls(),
            timeout_secs: default_timeout(),
        }
    }

    /// Builder-style setter for chunk_size
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Builder-style setter for transport
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    /// Builder-style setter for token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builder-style setter for verify_tls
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Builder-style setter for timeout_secs
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Build the configured transport backend, token attached
    pub fn build_transport(&self) -> Result<Box<dyn Transport>> {
        let mut transport: Box<dyn Transport> = match self.transport {
            TransportKind::Http => Box::new(HttpTransport::new(self.timeout_secs)?),
            TransportKind::Curl => Box::new(CurlTransport::new()),
        };
        if let Some(token) = &self.token {
            transport.update_token(token);
        }
        Ok(transport)
    }

    /// Build a request client against the configured endpoint
    pub fn build_client(&self) -> Result<RequestClient> {
        Ok(RequestClient::new(
            self.rpc_url.as_str(),
            self.build_transport()?,
            self.verify_tls,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("http://node/rpc", "0xabc", "events");
        assert_eq!(config.chunk_size, 10_000);
        assert_eq!(config.transport, TransportKind::Http);
        assert!(config.verify_tls);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new("http://node/rpc", "0xabc", "events")
            .with_chunk_size(500)
            .with_transport(TransportKind::Curl)
            .with_token("tok")
            .with_verify_tls(false)
            .with_timeout_secs(5);

        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.transport, TransportKind::Curl);
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert!(!config.verify_tls);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
rpc_url = "http://127.0.0.1:18888/rpc"
contract = "0x7d73424a8256c0b2ba245e5d5a3de8820e45f390"
export_dir = "events"
transport = "curl"
token = "session-1"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.rpc_url, "http://127.0.0.1:18888/rpc");
        assert_eq!(config.transport, TransportKind::Curl);
        assert_eq!(config.token.as_deref(), Some("session-1"));
        // Unspecified fields fall back to defaults.
        assert_eq!(config.chunk_size, 10_000);
        assert!(config.verify_tls);
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        let err = "carrier-pigeon".parse::<TransportKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTransport(t) if t == "carrier-pigeon"));
    }
}
