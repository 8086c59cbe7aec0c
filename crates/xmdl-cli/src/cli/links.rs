//! Classification of catalog URLs into download targets.
//!
//! Three shapes are accepted, mirroring the site's album pages:
//!
//! - `https://www.ximalaya.com/ertong/10078066/` (whole album)
//! - `https://www.ximalaya.com/ertong/12891461/p2/` (one listing page)
//! - `https://www.ximalaya.com/ertong/12891461/211393643` (single track)

use anyhow::{anyhow, bail, Result};
use url::Url;
use xmdl_core::ledger::{AlbumId, TrackId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    Album(AlbumId),
    Page { album_id: AlbumId, page: u32 },
    Track(TrackId),
}

pub fn classify(input: &str) -> Result<LinkTarget> {
    let url = Url::parse(input.trim())
        .map_err(|e| anyhow!("not a valid URL ({e}); expected an album, page, or track link"))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [category, album] if is_category(category) => {
            if let Ok(album_id) = album.parse() {
                return Ok(LinkTarget::Album(album_id));
            }
        }
        [category, album, last] if is_category(category) => {
            if let Ok(album_id) = album.parse::<AlbumId>() {
                if let Some(page) = last
                    .strip_prefix('p')
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|&p| p > 0)
                {
                    return Ok(LinkTarget::Page { album_id, page });
                }
                if let Ok(track_id) = last.parse::<TrackId>() {
                    return Ok(LinkTarget::Track(track_id));
                }
            }
        }
        _ => {}
    }

    bail!(
        "unrecognized URL; expected one of:\n  \
         …/<category>/<albumId>/        (whole album)\n  \
         …/<category>/<albumId>/p<N>/   (one page)\n  \
         …/<category>/<albumId>/<trackId>  (single track)"
    )
}

fn is_category(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_lowercase())
}
