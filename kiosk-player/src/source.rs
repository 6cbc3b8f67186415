//! Content backend client
//!
//! The backend exposes two endpoints per screen:
//! - `GET {server_url}/screens/{id}/status` returning `{"status": "paired" | ...}`
//! - `GET {server_url}/screens/{id}/playlist` returning the playlist records

use std::time::Duration;

use async_trait::async_trait;
use kiosk_common::record::{PlaylistPayload, PlaylistRecord};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Pairing status reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingStatus {
    Paired,
    /// Any other status string; the screen must return to pairing
    Other(String),
}

impl PairingStatus {
    pub fn from_wire(status: &str) -> Self {
        if status.trim().eq_ignore_ascii_case("paired") {
            PairingStatus::Paired
        } else {
            PairingStatus::Other(status.to_string())
        }
    }

    pub fn is_paired(&self) -> bool {
        matches!(self, PairingStatus::Paired)
    }
}

/// Source of pairing status and playlist content
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fails with [`Error::Transport`] on network or backend failure
    async fn fetch_status(&self, screen_id: &str) -> Result<PairingStatus>;

    /// Fails with [`Error::Transport`] on network or backend failure
    async fn fetch_playlist(&self, screen_id: &str) -> Result<Vec<PlaylistRecord>>;
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

/// HTTP/JSON implementation of [`PlaylistSource`]
pub struct HttpPlaylistSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpPlaylistSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kiosk-player/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid server URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Server URL '{}' cannot be a base", base_url)));
        }

        Ok(Self { client, base_url })
    }

    /// Screen endpoint URL; the screen id is percent-encoded as one segment
    fn screen_url(&self, screen_id: &str, endpoint: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Server URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["screens", screen_id, endpoint]);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl PlaylistSource for HttpPlaylistSource {
    async fn fetch_status(&self, screen_id: &str) -> Result<PairingStatus> {
        let url = self.screen_url(screen_id, "status")?;
        let body: StatusResponse = self.get(url).await?.json().await?;
        Ok(PairingStatus::from_wire(&body.status))
    }

    async fn fetch_playlist(&self, screen_id: &str) -> Result<Vec<PlaylistRecord>> {
        let url = self.screen_url(screen_id, "playlist")?;
        let payload: PlaylistPayload = self.get(url).await?.json().await?;
        Ok(payload.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_status_from_wire() {
        assert_eq!(PairingStatus::from_wire("paired"), PairingStatus::Paired);
        assert_eq!(PairingStatus::from_wire(" PAIRED "), PairingStatus::Paired);
        assert_eq!(
            PairingStatus::from_wire("unpaired"),
            PairingStatus::Other("unpaired".to_string())
        );
        assert!(!PairingStatus::from_wire("pending").is_paired());
    }

    #[test]
    fn test_screen_url_strips_trailing_slash() {
        let source = HttpPlaylistSource::new("http://cms.local/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.screen_url("lobby", "playlist").unwrap().as_str(),
            "http://cms.local/api/screens/lobby/playlist"
        );

        let bare = HttpPlaylistSource::new("http://cms.local", Duration::from_secs(1)).unwrap();
        assert_eq!(
            bare.screen_url("lobby", "status").unwrap().as_str(),
            "http://cms.local/screens/lobby/status"
        );
    }

    #[test]
    fn test_screen_id_is_one_encoded_segment() {
        let source = HttpPlaylistSource::new("http://cms.local/api", Duration::from_secs(1)).unwrap();
        let url = source.screen_url("lobby/east?x=1#top", "playlist").unwrap();

        assert_eq!(
            url.as_str(),
            "http://cms.local/api/screens/lobby%2Feast%3Fx=1%23top/playlist"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_server_url_is_config_error() {
        let result = HttpPlaylistSource::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(Error::Config(_))));

        let result = HttpPlaylistSource::new("mailto:ops@example.com", Duration::from_secs(1));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let source = HttpPlaylistSource::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = source.fetch_status("lobby").await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
