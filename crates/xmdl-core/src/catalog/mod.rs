//! Catalog interface for resolving tracks, pages, and albums.
//!
//! The engine only depends on this trait; the concrete HTTP client and the
//! remote response shapes live in [`http`].

mod http;

pub use http::HttpCatalog;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use std::io;
use thiserror::Error;

use crate::ledger::{AlbumId, TrackId};

/// Finite, non-restartable stream of audio bytes.
pub type AudioStream = BoxStream<'static, io::Result<Bytes>>;

/// Metadata for a single track.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub title: String,
    pub album_title: String,
    pub stream_url: String,
}

/// Album-level listing info used to paginate a whole-album download.
#[derive(Debug, Clone)]
pub struct AlbumSummary {
    pub title: String,
    pub total_track_count: u32,
    /// Tracks per listing page as paginated by the remote catalog.
    pub page_size: u32,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Remote catalog the downloader pulls metadata, listings, and bytes from.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve title, album title, and stream URL for one track.
    async fn track_metadata(&self, id: TrackId) -> Result<TrackMetadata, CatalogError>;

    /// Ordered track ids on one listing page of an album (1-based page).
    async fn page_tracks(&self, album_id: AlbumId, page: u32)
        -> Result<Vec<TrackId>, CatalogError>;

    /// Album title plus pagination totals.
    async fn album_summary(&self, album_id: AlbumId) -> Result<AlbumSummary, CatalogError>;

    /// Open a streaming read of the audio payload behind `url`.
    async fn open_stream(&self, url: &str) -> Result<AudioStream, CatalogError>;
}
