//! Track fetcher: resolves one track's metadata and streams its audio to
//! disk under an optional deadline.
//!
//! The fetcher owns its ledger record through the whole lifecycle; siblings
//! running in the same group never touch it. The deadline is a soft cancel:
//! the read stream is dropped, bytes already buffered may still flush, and
//! the partial file stays on disk.

use futures_util::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::catalog::{AudioStream, Catalog, CatalogError};
use crate::filename::sanitize_component;
use crate::ledger::{TaskLedger, TrackId};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("metadata lookup failed for track {id}: {source}")]
    Metadata {
        id: TrackId,
        #[source]
        source: CatalogError,
    },

    #[error("could not create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("download timed out for track {id}")]
    Timeout { id: TrackId },

    #[error("stream I/O failed for track {id}: {source}")]
    Io {
        id: TrackId,
        #[source]
        source: io::Error,
    },
}

/// Downloads a single track to `<dest_dir>/<album title>/<title>.mp3`.
///
/// The task is admitted to the ledger before any network call and its record
/// reflects the outcome when this returns. One attempt only; the caller
/// decides what partial failure means for the batch.
pub async fn fetch_track(
    catalog: &dyn Catalog,
    ledger: &TaskLedger,
    dest_dir: &Path,
    id: TrackId,
    timeout: Option<Duration>,
) -> Result<(), FetchError> {
    ledger.admit(id);

    let meta = match catalog.track_metadata(id).await {
        Ok(meta) => meta,
        Err(source) => {
            ledger.mark_failed(id);
            return Err(FetchError::Metadata { id, source });
        }
    };

    let album_dir = dest_dir.join(sanitize_component(&meta.album_title));
    if let Err(source) = ensure_directory(&album_dir).await {
        ledger.mark_failed(id);
        return Err(FetchError::Directory {
            path: album_dir,
            source,
        });
    }

    ledger.start(id, &meta.title, &meta.stream_url);
    tracing::info!(id, title = %meta.title, "track download started");

    let mut stream = match catalog.open_stream(&meta.stream_url).await {
        Ok(stream) => stream,
        Err(source) => {
            ledger.mark_failed(id);
            return Err(FetchError::Io {
                id,
                source: io::Error::other(source),
            });
        }
    };

    let file_path = album_dir.join(format!("{}.mp3", sanitize_component(&meta.title)));
    let mut file = match fs::File::create(&file_path).await {
        Ok(file) => file,
        Err(source) => {
            ledger.mark_failed(id);
            return Err(FetchError::Io { id, source });
        }
    };

    let copied = match timeout {
        Some(limit) => tokio::time::timeout(limit, copy_stream(&mut stream, &mut file)).await,
        None => Ok(copy_stream(&mut stream, &mut file).await),
    };

    match copied {
        // Deadline fired before the write pipeline finished. Detach the
        // reader and close the file; whatever was buffered may still land.
        Err(_elapsed) => {
            ledger.mark_timed_out(id);
            drop(stream);
            let _ = file.flush().await;
            tracing::warn!(id, title = %meta.title, "track download timed out");
            Err(FetchError::Timeout { id })
        }
        Ok(Ok(())) => {
            if ledger.complete(id) {
                tracing::info!(id, title = %meta.title, "track download finished");
                Ok(())
            } else {
                // The timeout already claimed the terminal state; do not
                // report success a second time.
                Err(FetchError::Timeout { id })
            }
        }
        Ok(Err(source)) => {
            ledger.mark_failed(id);
            tracing::warn!(id, title = %meta.title, "track download failed: {source}");
            Err(FetchError::Io { id, source })
        }
    }
}

/// Pipes the audio stream into the file chunk by chunk; memory use is
/// bounded by chunk size, not file size.
async fn copy_stream(stream: &mut AudioStream, file: &mut fs::File) -> io::Result<()> {
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await
}

/// Create-if-absent: a pre-existing directory is success, anything else is
/// fatal for the calling task.
async fn ensure_directory(path: &Path) -> io::Result<()> {
    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(err),
    }
}
