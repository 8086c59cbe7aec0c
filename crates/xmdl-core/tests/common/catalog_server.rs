//! Minimal HTTP/1.1 catalog + audio server for integration tests.
//!
//! Serves the three catalog JSON endpoints and the audio bodies they point
//! at. Individual tracks can be configured to 404 on metadata lookup or to
//! drip their audio body slowly (for deadline tests). Listing-page requests
//! are recorded so tests can assert page order.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CatalogServerOptions {
    /// Total tracks in the album, with ids `1..=total_tracks`.
    pub total_tracks: u32,
    /// Tracks per listing page.
    pub page_size: u32,
    pub album_title: String,
    /// Audio body length per track.
    pub audio_len: usize,
    /// Track ids whose metadata endpoint returns 404.
    pub missing_tracks: Vec<u64>,
    /// Track ids whose audio body is dripped slowly.
    pub slow_tracks: Vec<u64>,
    /// Chunk size and delay between chunks for slow tracks.
    pub drip_chunk: usize,
    pub drip_delay: Duration,
}

impl Default for CatalogServerOptions {
    fn default() -> Self {
        Self {
            total_tracks: 5,
            page_size: 30,
            album_title: "Night Tales".to_string(),
            audio_len: 4096,
            missing_tracks: Vec::new(),
            slow_tracks: Vec::new(),
            drip_chunk: 1024,
            drip_delay: Duration::from_millis(50),
        }
    }
}

pub struct CatalogServer {
    pub base_url: String,
    pages_seen: Arc<Mutex<Vec<u32>>>,
}

impl CatalogServer {
    /// Listing pages requested so far, in request order.
    pub fn pages_seen(&self) -> Vec<u32> {
        self.pages_seen.lock().unwrap().clone()
    }
}

/// Deterministic audio body for a track; tests assert against the same bytes.
pub fn audio_body(id: u64, len: usize) -> Vec<u8> {
    (0..len).map(|i| (id as u8).wrapping_add(i as u8)).collect()
}

struct State {
    opts: CatalogServerOptions,
    base_url: String,
    pages_seen: Arc<Mutex<Vec<u32>>>,
}

/// Starts the server in background threads. It runs until the process exits.
pub fn start(opts: CatalogServerOptions) -> CatalogServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{port}");
    let pages_seen = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(State {
        opts,
        base_url: base_url.clone(),
        pages_seen: Arc::clone(&pages_seen),
    });

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            thread::spawn(move || handle(stream, &state));
        }
    });

    CatalogServer {
        base_url,
        pages_seen,
    }
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let target = match request_target(request) {
        Some(t) => t,
        None => return,
    };
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p, q),
        None => (target, ""),
    };

    if let Some(id) = path
        .strip_prefix("/tracks/")
        .and_then(|rest| rest.strip_suffix(".json"))
        .and_then(|id| id.parse::<u64>().ok())
    {
        if state.opts.missing_tracks.contains(&id) {
            respond(&mut stream, "404 Not Found", "application/json", b"{}");
            return;
        }
        let body = serde_json::json!({
            "title": format!("Track {id:03}"),
            "album_title": state.opts.album_title,
            "play_path_64": format!("{}/audio/{id}.mp3", state.base_url),
        });
        respond_json(&mut stream, &body);
        return;
    }

    if path == "/revision/album/v1/getTracksList" {
        let page = query_param(query, "pageNum").unwrap_or(1) as u32;
        state.pages_seen.lock().unwrap().push(page);
        let start = (page - 1) * state.opts.page_size + 1;
        let end = (page * state.opts.page_size).min(state.opts.total_tracks);
        let tracks: Vec<serde_json::Value> = (start..=end)
            .map(|id| serde_json::json!({ "trackId": id }))
            .collect();
        let body = serde_json::json!({ "data": { "tracks": tracks } });
        respond_json(&mut stream, &body);
        return;
    }

    if path == "/revision/album" {
        let body = serde_json::json!({
            "data": {
                "mainInfo": { "album_title": state.opts.album_title },
                "tracksInfo": {
                    "pageSize": state.opts.page_size,
                    "trackTotalCount": state.opts.total_tracks,
                },
            }
        });
        respond_json(&mut stream, &body);
        return;
    }

    if let Some(id) = path
        .strip_prefix("/audio/")
        .and_then(|rest| rest.strip_suffix(".mp3"))
        .and_then(|id| id.parse::<u64>().ok())
    {
        let body = audio_body(id, state.opts.audio_len);
        if state.opts.slow_tracks.contains(&id) {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: audio/mpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            if stream.write_all(header.as_bytes()).is_err() {
                return;
            }
            for chunk in body.chunks(state.opts.drip_chunk.max(1)) {
                if stream.write_all(chunk).is_err() || stream.flush().is_err() {
                    return;
                }
                thread::sleep(state.opts.drip_delay);
            }
        } else {
            respond(&mut stream, "200 OK", "audio/mpeg", &body);
        }
        return;
    }

    respond(&mut stream, "404 Not Found", "text/plain", b"no such route");
}

/// Returns the request-target from the request line ("GET /x?y HTTP/1.1").
fn request_target(request: &str) -> Option<&str> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    parts.next()
}

fn query_param(query: &str, name: &str) -> Option<u64> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == name).then(|| v.parse().ok()).flatten()
    })
}

fn respond_json(stream: &mut TcpStream, body: &serde_json::Value) {
    respond(stream, "200 OK", "application/json", body.to_string().as_bytes());
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let header = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(body);
}
