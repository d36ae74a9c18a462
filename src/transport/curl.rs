//! Process-backed transport that shells out to curl

use std::process::Command;

use super::{assemble_query_string, HttpMethod, RequestPayload, Transport};
use crate::error::{Error, Result};

/// Transport that renders each call as a `curl` command line and captures
/// stdout as the raw response.
///
/// The upstream server requires a `Content-Type` header on every non-GET
/// call, `X-Auth-User` on DELETE, and `X-Auth-Token` on POST/PUT.
#[derive(Debug, Default)]
pub struct CurlTransport {
    token: Option<String>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_command(
        &self,
        method: HttpMethod,
        url: &str,
        payload: &RequestPayload,
        verify_tls: bool,
    ) -> Result<String> {
        let insecure = if verify_tls { "" } else { " -k" };

        let command = match method {
            HttpMethod::Get => {
                let full_url = format!("{}{}", url, assemble_query_string(payload));
                format!("curl{} \"{}\"", insecure, full_url)
            }
            HttpMethod::Delete => {
                let body = escape_payload(payload)?;
                format!(
                    "curl{} -X DELETE -H \"Content-Type: application/json\"{} {} -d '{}'",
                    insecure,
                    self.auth_header("X-Auth-User"),
                    url,
                    body
                )
            }
            HttpMethod::Post | HttpMethod::Put => {
                let body = escape_payload(payload)?;
                format!(
                    "curl{} -X {} -H \"Content-Type: application/json\"{} {} -d '{}'",
                    insecure,
                    method,
                    self.auth_header("X-Auth-Token"),
                    url,
                    body
                )
            }
        };

        Ok(command)
    }

    fn auth_header(&self, name: &str) -> String {
        match &self.token {
            Some(token) => format!(" -H \"{}: {}\"", name, token),
            None => String::new(),
        }
    }
}

/// JSON-encode the payload with single quotes rewritten to their `'`
/// escape, so the body survives inside the shell's single quotes.
fn escape_payload(payload: &RequestPayload) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    Ok(json.replace('\'', "\\u0027"))
}

impl Transport for CurlTransport {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        payload: &RequestPayload,
        verify_tls: bool,
    ) -> Result<String> {
        let command = self.render_command(method, url, payload, verify_tls)?;
        tracing::debug!("curl command: {}", command);

        // One child process per call; a failed request still yields whatever
        // curl printed, which the request layer rejects at decode time.
        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .map_err(|e| Error::Transport(format!("failed to spawn curl: {}", e)))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn update_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }
}
