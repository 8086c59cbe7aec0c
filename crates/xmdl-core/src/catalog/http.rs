//! HTTP catalog client against the live JSON endpoints.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::Deserialize;
use std::io;
use std::time::Duration;

use super::{AlbumSummary, AudioStream, Catalog, CatalogError, TrackMetadata};
use crate::ledger::{AlbumId, TrackId};

const USER_AGENT: &str = concat!("xmdl/", env!("CARGO_PKG_VERSION"));

/// Catalog backed by the public web API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base: String,
}

impl HttpCatalog {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.ximalaya.com";

    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Point the client at another host (mirror, or a test server).
    pub fn with_base_url(base: &str) -> Result<Self> {
        let parsed = url::Url::parse(base).with_context(|| format!("invalid base URL: {base}"))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(15))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            client,
            base: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }
}

// Wire shapes. Field names follow the remote API.

#[derive(Debug, Deserialize)]
struct TrackResponse {
    title: String,
    album_title: String,
    /// Stream URL; absent for tracks without a freely downloadable stream.
    play_path_64: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TracksListResponse {
    data: TracksListData,
}

#[derive(Debug, Deserialize)]
struct TracksListData {
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    #[serde(rename = "trackId")]
    track_id: TrackId,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    data: AlbumData,
}

#[derive(Debug, Deserialize)]
struct AlbumData {
    #[serde(rename = "mainInfo")]
    main_info: AlbumMainInfo,
    #[serde(rename = "tracksInfo")]
    tracks_info: Option<AlbumTracksInfo>,
}

#[derive(Debug, Deserialize)]
struct AlbumMainInfo {
    album_title: String,
}

#[derive(Debug, Deserialize)]
struct AlbumTracksInfo {
    #[serde(rename = "pageSize")]
    page_size: u32,
    #[serde(rename = "trackTotalCount")]
    track_total_count: u32,
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn track_metadata(&self, id: TrackId) -> Result<TrackMetadata, CatalogError> {
        let url = format!("{}/tracks/{}.json", self.base, id);
        let resp = self.client.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("track {id}")));
        }
        let body: TrackResponse = resp
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CatalogError::Decode(format!("track {id} metadata: {e}")))?;

        let stream_url = match body.play_path_64 {
            Some(url) if !url.is_empty() => url,
            _ => {
                return Err(CatalogError::NotFound(format!(
                    "track {id} has no downloadable stream"
                )))
            }
        };

        Ok(TrackMetadata {
            title: body.title,
            album_title: body.album_title,
            stream_url,
        })
    }

    async fn page_tracks(
        &self,
        album_id: AlbumId,
        page: u32,
    ) -> Result<Vec<TrackId>, CatalogError> {
        let url = format!("{}/revision/album/v1/getTracksList", self.base);
        let resp = self
            .client
            .get(&url)
            .query(&[("albumId", album_id.to_string()), ("pageNum", page.to_string())])
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("album {album_id} page {page}")));
        }
        let body: TracksListResponse = resp
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CatalogError::Decode(format!("album {album_id} page {page}: {e}")))?;

        Ok(body.data.tracks.into_iter().map(|t| t.track_id).collect())
    }

    async fn album_summary(&self, album_id: AlbumId) -> Result<AlbumSummary, CatalogError> {
        let url = format!("{}/revision/album", self.base);
        let resp = self
            .client
            .get(&url)
            .query(&[("albumId", album_id.to_string())])
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("album {album_id}")));
        }
        let body: AlbumResponse = resp
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CatalogError::Decode(format!("album {album_id} summary: {e}")))?;

        let tracks_info = body.data.tracks_info.ok_or_else(|| {
            CatalogError::Decode(format!("album {album_id} summary is missing tracksInfo"))
        })?;

        Ok(AlbumSummary {
            title: body.data.main_info.album_title,
            total_track_count: tracks_info.track_total_count,
            page_size: tracks_info.page_size,
        })
    }

    async fn open_stream(&self, url: &str) -> Result<AudioStream, CatalogError> {
        let resp = self.client.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("audio at {url}")));
        }
        let resp = resp.error_for_status()?;
        let stream = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(io::Error::other))
            .boxed();
        Ok(stream)
    }
}
