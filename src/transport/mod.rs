//! Pluggable outbound call mechanisms
//!
//! A [`Transport`] performs one HTTP-style call and hands back the raw body
//! text. Two interchangeable backends exist: [`HttpTransport`] goes through a
//! pooled in-process client, [`CurlTransport`] shells out to `curl`. Ordinary
//! network failures are not fatal here; they surface either as a transport
//! error or as an empty/garbled body that the request layer rejects at decode
//! time.

mod curl;
mod http;

pub use curl::CurlTransport;
pub use http::HttpTransport;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::Error;

/// Ordered request parameters. Serialized into a query string for read
/// operations and into a JSON body for mutating ones.
pub type RequestPayload = serde_json::Map<String, Value>;

/// HTTP-style methods with a transport mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

/// A single outbound call
pub trait Transport {
    /// Send one request and return the unparsed body text. Non-2xx responses
    /// are returned as-is; only connection/spawn-level failures are errors.
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        payload: &RequestPayload,
        verify_tls: bool,
    ) -> crate::error::Result<String>;

    /// Store an opaque token for backends that attach it to later calls
    fn update_token(&mut self, token: &str);
}

/// Render the payload as a query string: empty payload yields an empty string,
/// otherwise `?k1=v1&k2=v2` in payload insertion order.
pub(crate) fn assemble_query_string(payload: &RequestPayload) -> String {
    if payload.is_empty() {
        return String::new();
    }
    let mut query = String::from("?");
    for (i, (key, value)) in payload.iter().enumerate() {
        if i > 0 {
            query.push('&');
        }
        query.push_str(key);
        query.push('=');
        query.push_str(&param_value(value));
    }
    query
}

// String values go in bare; everything else keeps its JSON rendering.
fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(pairs: &[(&str, Value)]) -> RequestPayload {
        let mut map = RequestPayload::new();
        for (key, value) in pairs {
            map.insert(key.to_string(), value.clone());
        }
        map
    }

    #[test]
    fn test_empty_payload_yields_empty_query() {
        assert_eq!(assemble_query_string(&RequestPayload::new()), "");
    }

    #[test]
    fn test_query_string_joins_pairs_in_order() {
        let payload = payload(&[
            ("fromBlock", json!("0x1")),
            ("toBlock", json!("0x2710")),
            ("limit", json!(50)),
        ]);
        assert_eq!(
            assemble_query_string(&payload),
            "?fromBlock=0x1&toBlock=0x2710&limit=50"
        );
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);

        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(m) if m == "PATCH"));
    }
}
