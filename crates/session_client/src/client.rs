//! Session service HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Each remote
//! operation is one request with an empty body; everything the service
//! needs is in the path.

use std::time::Duration;

use gridsync_protocol::{
    Ack, BulkEditCommand, GridAddress, RemoteError, RemoteSession, Request, SelectionRect,
};
use url::Url;

/// Error building a client.
#[derive(Debug)]
pub enum ClientError {
    /// Endpoint is not an absolute http(s) URL
    InvalidEndpoint(String),
    /// TLS / HTTP stack could not be initialised
    Build(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::InvalidEndpoint(msg) => write!(f, "Invalid endpoint: {}", msg),
            ClientError::Build(msg) => write!(f, "Failed to create HTTP client: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Session service client (blocking).
#[derive(Clone)]
pub struct SessionClient {
    http: reqwest::blocking::Client,
    base: Url,
}

impl SessionClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(endpoint).map_err(|e| ClientError::InvalidEndpoint(e.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidEndpoint(endpoint.to_string()));
        }

        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gridsync/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Full URL for a request. Path segments are percent-encoded
    /// (`Move Forward` -> `Move%20Forward`).
    pub fn url_for(&self, request: &Request) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Network(format!("cannot route against {}", self.base)))?
            .pop_if_empty()
            .extend(request.path_segments());
        Ok(url)
    }

    pub fn execute(&self, request: &Request) -> Result<Ack, RemoteError> {
        let url = self.url_for(request)?;
        let builder = match request.method() {
            "PUT" => self.http.put(url),
            _ => self.http.post(url),
        };
        let response = builder
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Http(status, body));
        }

        log::debug!("{} -> {}", request.describe(), status);
        Ok(Ack::Accepted)
    }
}

impl RemoteSession for SessionClient {
    fn sync_selection(&mut self, rect: &SelectionRect) -> Result<Ack, RemoteError> {
        self.execute(&Request::SyncSelection { rect: *rect })
    }

    fn sync_focus(&mut self, focus: Option<GridAddress>) -> Result<Ack, RemoteError> {
        self.execute(&Request::SyncFocus { focus })
    }

    fn apply_bulk_edit(&mut self, command: BulkEditCommand) -> Result<Ack, RemoteError> {
        self.execute(&Request::BulkEdit { command })
    }
}
