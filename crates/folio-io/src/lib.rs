//! IO services for loading page fragments without blocking the event loop.
//!
//! Requests are tagged with a caller-chosen `request_id` and their results
//! are collected later through [`FetchService::poll`].

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread::{self, JoinHandle},
    time::Duration,
};

use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

/// Errors reported through [`HttpResult::error`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("blocked: unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("blocked: origin not allowed")]
    OriginNotAllowed,
    #[error("worker disconnected")]
    Disconnected,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A single fragment request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub request_id: u64,
    pub url: Url,
    /// Bypass any caching layer between the shell and the fragment source.
    pub no_cache: bool,
}

impl FetchRequest {
    pub fn get(request_id: u64, url: Url) -> Self {
        Self {
            request_id,
            url,
            no_cache: true,
        }
    }
}

#[derive(Debug)]
pub struct HttpResult {
    pub request_id: u64,
    pub status: Option<i32>,
    pub content_type: Option<String>,
    pub body: Option<String>,
    pub error: Option<String>,
}

impl HttpResult {
    pub fn ok(request_id: u64, status: i32, body: impl Into<String>) -> Self {
        Self {
            request_id,
            status: Some(status),
            content_type: Some("text/html".to_string()),
            body: Some(body.into()),
            error: None,
        }
    }

    /// A 404 without a body.
    pub fn not_found(request_id: u64) -> Self {
        Self {
            request_id,
            status: Some(404),
            content_type: None,
            body: None,
            error: None,
        }
    }

    pub fn failed(request_id: u64, error: FetchError) -> Self {
        Self {
            request_id,
            status: None,
            content_type: None,
            body: None,
            error: Some(error.to_string()),
        }
    }

    /// True for a 2xx response that carried a body and no transport error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
            && self.body.is_some()
            && matches!(self.status, Some(code) if (200..300).contains(&code))
    }

    /// Human readable reason for a failed result.
    pub fn failure_reason(&self) -> String {
        match (&self.error, self.status) {
            (Some(err), _) => err.clone(),
            (None, Some(code)) if !(200..300).contains(&code) => format!("status {code}"),
            (None, _) => "empty response".to_string(),
        }
    }
}

/// Source of page fragments.
pub trait FetchService {
    /// Start a request. The result becomes available on a later [`poll`](Self::poll).
    fn request(&mut self, request: FetchRequest);

    /// Return every result that is ready.
    fn poll(&mut self) -> Vec<HttpResult>;

    /// True if there are outstanding requests.
    fn has_pending(&self) -> bool;

    /// Drop a pending request so any eventual result is ignored.
    fn cancel(&mut self, request_id: u64);
}

impl<T: FetchService + ?Sized> FetchService for Box<T> {
    fn request(&mut self, request: FetchRequest) {
        (**self).request(request)
    }

    fn poll(&mut self) -> Vec<HttpResult> {
        (**self).poll()
    }

    fn has_pending(&self) -> bool {
        (**self).has_pending()
    }

    fn cancel(&mut self, request_id: u64) {
        (**self).cancel(request_id)
    }
}

// -------------------------- HTTP SERVICE --------------------------

struct PendingHttp {
    request_id: u64,
    receiver: Receiver<HttpResult>,
    join: Option<JoinHandle<()>>,
}

/// Manages non-blocking HTTP requests using a worker thread per request.
pub struct HttpService {
    pending: Vec<PendingHttp>,
    allowed_origins: Option<HashSet<String>>, // e.g., "https://example.com:443"
    default_timeout: Duration,
    user_agent: String,
}

impl HttpService {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            allowed_origins: None,
            default_timeout: Duration::from_secs(15),
            user_agent: "Folio/0.1".to_string(),
        }
    }

    /// Configure an allowlist of origins. Requests to any other origin
    /// complete with an error result.
    pub fn set_origin_allowlist<I: IntoIterator<Item = String>>(&mut self, origins: I) {
        self.allowed_origins = Some(origins.into_iter().collect());
    }

    pub fn clear_origin_allowlist(&mut self) {
        self.allowed_origins = None;
    }

    pub fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }
}

impl Default for HttpService {
    fn default() -> Self {
        Self::new()
    }
}

fn origin_key(url: &Url) -> String {
    match url.port_or_known_default() {
        Some(port) => format!("{}://{}:{}", url.scheme(), url.host_str().unwrap_or(""), port),
        None => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("")),
    }
}

fn guard(url: &Url, allowlist: Option<&HashSet<String>>) -> Result<(), FetchError> {
    let scheme = url.scheme().to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(FetchError::UnsupportedScheme(scheme));
    }
    if let Some(set) = allowlist {
        if !set.contains(&origin_key(url)) {
            return Err(FetchError::OriginNotAllowed);
        }
    }
    Ok(())
}

fn send_blocking(
    request: &FetchRequest,
    user_agent: &str,
    timeout: Duration,
) -> Result<HttpResult, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    let mut req = client.get(request.url.clone());
    if request.no_cache {
        req = req
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache");
    }
    let resp = req.send()?;
    let status = resp.status().as_u16() as i32;
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body = resp.text()?;
    Ok(HttpResult {
        request_id: request.request_id,
        status: Some(status),
        content_type,
        body: Some(body),
        error: None,
    })
}

impl FetchService for HttpService {
    fn request(&mut self, request: FetchRequest) {
        let (tx, rx) = mpsc::channel();
        let request_id = request.request_id;
        let allowlist = self.allowed_origins.clone();
        let user_agent = self.user_agent.clone();
        let timeout = self.default_timeout;

        trace!(request_id, url = %request.url, "spawning fragment request");
        let join = thread::spawn(move || {
            let result = guard(&request.url, allowlist.as_ref())
                .and_then(|()| send_blocking(&request, &user_agent, timeout))
                .unwrap_or_else(|err| HttpResult::failed(request.request_id, err));
            let _ = tx.send(result);
        });

        self.pending.push(PendingHttp {
            request_id,
            receiver: rx,
            join: Some(join),
        });
    }

    fn poll(&mut self) -> Vec<HttpResult> {
        let mut ready = Vec::new();
        let mut still = Vec::new();
        for mut pending in self.pending.drain(..) {
            match pending.receiver.try_recv() {
                Ok(res) => {
                    if let Some(j) = pending.join.take() {
                        let _ = j.join();
                    }
                    ready.push(res);
                }
                Err(TryRecvError::Empty) => still.push(pending),
                Err(TryRecvError::Disconnected) => {
                    if let Some(j) = pending.join.take() {
                        let _ = j.join();
                    }
                    ready.push(HttpResult::failed(
                        pending.request_id,
                        FetchError::Disconnected,
                    ));
                }
            }
        }
        self.pending = still;
        ready
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn cancel(&mut self, request_id: u64) {
        self.pending.retain(|p| p.request_id != request_id);
    }
}

// -------------------------- DIRECTORY SERVICE --------------------------

/// Serves `file:` URLs from a site directory.
///
/// Reads happen on the calling thread; results are held back until the
/// next [`poll`](FetchService::poll) so callers observe the same
/// request/complete split as with [`HttpService`]. Files that resolve
/// outside the root (through `..` segments or symlinks) answer 404.
#[derive(Debug)]
pub struct DirService {
    root: PathBuf,
    ready: HashMap<u64, HttpResult>,
}

impl DirService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self {
            root,
            ready: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, request: &FetchRequest) -> Result<HttpResult, FetchError> {
        if request.url.scheme() != "file" {
            return Err(FetchError::UnsupportedScheme(request.url.scheme().to_string()));
        }
        let path = request
            .url
            .to_file_path()
            .map_err(|()| FetchError::UnsupportedScheme("file".to_string()))?;
        let resolved = match path.canonicalize() {
            Ok(resolved) => resolved,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "fragment file not found");
                return Ok(HttpResult::not_found(request.request_id));
            }
            Err(source) => return Err(FetchError::Io { path, source }),
        };
        if !resolved.starts_with(&self.root) {
            debug!(
                path = %resolved.display(),
                root = %self.root.display(),
                "fragment path escapes the site root"
            );
            return Ok(HttpResult::not_found(request.request_id));
        }
        match std::fs::read_to_string(&resolved) {
            Ok(body) => Ok(HttpResult::ok(request.request_id, 200, body)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(HttpResult::not_found(request.request_id))
            }
            Err(source) => Err(FetchError::Io {
                path: resolved,
                source,
            }),
        }
    }
}

impl FetchService for DirService {
    fn request(&mut self, request: FetchRequest) {
        let result = self
            .read(&request)
            .unwrap_or_else(|err| HttpResult::failed(request.request_id, err));
        self.ready.insert(request.request_id, result);
    }

    fn poll(&mut self) -> Vec<HttpResult> {
        let mut ready: Vec<HttpResult> = self.ready.drain().map(|(_, r)| r).collect();
        ready.sort_by_key(|r| r.request_id);
        ready
    }

    fn has_pending(&self) -> bool {
        !self.ready.is_empty()
    }

    fn cancel(&mut self, request_id: u64) {
        self.ready.remove(&request_id);
    }
}
