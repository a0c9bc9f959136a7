use thiserror::Error;
use url::Url;

use crate::config::BACKEND;

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid server URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("unsupported scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

/// Resolved backend addresses. The stream scheme follows the server scheme (http -> ws, https -> wss).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    http_base: Url,
    stream_url: Url,
}

impl Endpoints {
    pub fn from_server(server: &str) -> Result<Self, EndpointError> {
        let http_base =
            Url::parse(server.trim()).map_err(|e| EndpointError::InvalidUrl(server.to_string(), e))?;

        let ws_scheme = match http_base.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        };

        let mut stream_url = http_base.clone();
        // http <-> ws are both "special" schemes, so this cannot fail.
        let _ = stream_url.set_scheme(ws_scheme);
        stream_url.set_path(BACKEND.stream.path);
        stream_url.set_query(None);
        stream_url.set_fragment(None);

        Ok(Self {
            http_base,
            stream_url,
        })
    }

    pub fn stream_url(&self) -> &str {
        self.stream_url.as_str()
    }

    pub fn http_base(&self) -> &Url {
        &self.http_base
    }

    /// Absolute URL for a control endpoint path (`/bot/start`, ...).
    pub fn http_url(&self, path: &str) -> String {
        let base = self.http_base.as_str().trim_end_matches('/');
        format!("{}{}", base, path)
    }

    /// `/analysis/{symbol}` with the symbol percent-encoded as one segment.
    pub fn analysis_url(&self, symbol: &str) -> String {
        let mut url = self.http_base.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}/", base_path, BACKEND.http.analysis_path));
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(symbol);
        }
        url.to_string()
    }
}
