//! Page URL and scroll position as seen by the shell.

use folio_dom::NodeId;
use tracing::trace;
use url::Url;

/// The page URL. Changing the fragment identifier queues a hash-change event.
#[derive(Debug, Clone)]
pub struct Location {
    url: Url,
    pending_changes: usize,
}

impl Location {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            pending_changes: 0,
        }
    }

    pub fn href(&self) -> &Url {
        &self.url
    }

    /// Fragment identifier without the leading `#` (empty when absent).
    pub fn hash(&self) -> &str {
        self.url.fragment().unwrap_or("")
    }

    /// Set the fragment identifier. Returns true if the URL changed, in
    /// which case one hash-change event is queued. Setting the current
    /// value again changes nothing and queues nothing.
    pub fn set_hash(&mut self, hash: &str) -> bool {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let mut next = self.url.clone();
        next.set_fragment(Some(hash));
        if next == self.url {
            return false;
        }
        trace!(from = %self.url, to = %next, "fragment identifier changed");
        self.url = next;
        self.pending_changes += 1;
        true
    }

    /// Pop one queued hash-change event.
    pub fn take_hash_change(&mut self) -> bool {
        if self.pending_changes == 0 {
            return false;
        }
        self.pending_changes -= 1;
        true
    }

    pub fn has_pending_change(&self) -> bool {
        self.pending_changes > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// A scroll the renderer should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    Top { behavior: ScrollBehavior },
    IntoView { node: NodeId, behavior: ScrollBehavior },
}

/// Current scroll offset plus the scroll requests issued since the last drain.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    scroll_y: f64,
    requests: Vec<ScrollRequest>,
}

impl Viewport {
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn request(&mut self, request: ScrollRequest) {
        if let ScrollRequest::Top { .. } = request {
            self.scroll_y = 0.0;
        }
        self.requests.push(request);
    }

    /// Re-point pending element scrolls after a document compaction,
    /// dropping those whose element is gone.
    pub fn remap(&mut self, mut map: impl FnMut(NodeId) -> Option<NodeId>) {
        self.requests.retain_mut(|request| match request {
            ScrollRequest::Top { .. } => true,
            ScrollRequest::IntoView { node, .. } => match map(*node) {
                Some(moved) => {
                    *node = moved;
                    true
                }
                None => false,
            },
        });
    }

    pub fn requests(&self) -> &[ScrollRequest] {
        &self.requests
    }

    pub fn take_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.requests)
    }
}
