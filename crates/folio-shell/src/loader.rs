//! Fragment fetching with latest-navigation-wins semantics.
//!
//! Every [`FragmentLoader::begin`] takes the next sequence number and uses
//! it as the fetch request id. A completion is applied only if its id is
//! the latest one issued; anything older is dropped on arrival, so an
//! out-of-order response can never overwrite a newer navigation.

use std::collections::HashMap;

use folio_dom::escape_text;
use folio_io::{FetchRequest, FetchService, HttpResult};
use tracing::debug;
use url::Url;

use crate::token::PageToken;

/// Result of a navigation that should be installed into the mount point.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { token: PageToken, html: String },
    Failed { token: PageToken, reason: String },
}

impl LoadOutcome {
    pub fn token(&self) -> &PageToken {
        match self {
            LoadOutcome::Loaded { token, .. } | LoadOutcome::Failed { token, .. } => token,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FragmentLoader {
    prefix: String,
    suffix: String,
    latest: u64,
    in_flight: HashMap<u64, PageToken>,
}

impl FragmentLoader {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            latest: 0,
            in_flight: HashMap::new(),
        }
    }

    /// Relative location of a token's fragment, e.g. `pages/about.html`.
    pub fn fragment_path(&self, token: &PageToken) -> String {
        format!("{}{}{}", self.prefix, token, self.suffix)
    }

    /// Sequence number of the most recent navigation.
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// True while the latest navigation is still waiting for its fragment.
    pub fn is_loading(&self) -> bool {
        self.in_flight.contains_key(&self.latest)
    }

    /// Start loading `token`.
    ///
    /// Returns `None` once the request is issued; its result arrives through
    /// [`accept`](Self::accept). A location that cannot be built fails
    /// immediately and the outcome is returned directly.
    pub fn begin<F: FetchService + ?Sized>(
        &mut self,
        token: &PageToken,
        base: &Url,
        fetch: &mut F,
    ) -> Option<LoadOutcome> {
        self.latest += 1;
        let path = self.fragment_path(token);
        let url = match base.join(&path) {
            Ok(url) => url,
            Err(err) => {
                return Some(LoadOutcome::Failed {
                    token: token.clone(),
                    reason: format!("cannot resolve {path}: {err}"),
                });
            }
        };
        debug!(seq = self.latest, %url, "requesting fragment");
        self.in_flight.insert(self.latest, token.clone());
        fetch.request(FetchRequest::get(self.latest, url));
        None
    }

    /// Turn a fetch completion into an outcome, or drop it if a newer
    /// navigation has been issued since.
    pub fn accept(&mut self, result: HttpResult) -> Option<LoadOutcome> {
        let Some(token) = self.in_flight.remove(&result.request_id) else {
            debug!(request_id = result.request_id, "ignoring unknown fetch completion");
            return None;
        };
        if result.request_id != self.latest {
            debug!(
                seq = result.request_id,
                latest = self.latest,
                %token,
                "discarding stale fragment"
            );
            return None;
        }
        if result.is_success() {
            let html = result.body.unwrap_or_default();
            Some(LoadOutcome::Loaded { token, html })
        } else {
            Some(LoadOutcome::Failed {
                reason: result.failure_reason(),
                token,
            })
        }
    }
}

/// Markup installed into the mount point when a fragment cannot be loaded.
pub fn not_found_panel(token: &PageToken) -> String {
    format!(
        r#"<section class="container py-5"><h2>Page not found</h2><p>Could not load "{}".</p></section>"#,
        escape_text(token.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        requests: Vec<FetchRequest>,
    }

    impl FetchService for Recorder {
        fn request(&mut self, request: FetchRequest) {
            self.requests.push(request);
        }
        fn poll(&mut self) -> Vec<HttpResult> {
            Vec::new()
        }
        fn has_pending(&self) -> bool {
            false
        }
        fn cancel(&mut self, _request_id: u64) {}
    }

    fn base() -> Url {
        Url::parse("https://site.test/index.html").unwrap()
    }

    #[test]
    fn builds_uncached_fragment_requests() {
        let mut loader = FragmentLoader::new("pages/", ".html");
        let mut fetch = Recorder::default();
        assert!(loader.begin(&PageToken::new("about"), &base(), &mut fetch).is_none());

        assert_eq!(fetch.requests.len(), 1);
        assert_eq!(fetch.requests[0].url.as_str(), "https://site.test/pages/about.html");
        assert!(fetch.requests[0].no_cache);
        assert_eq!(fetch.requests[0].request_id, loader.latest());
        assert!(loader.is_loading());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut loader = FragmentLoader::new("pages/", ".html");
        let mut fetch = Recorder::default();
        loader.begin(&PageToken::new("a"), &base(), &mut fetch);
        loader.begin(&PageToken::new("b"), &base(), &mut fetch);

        let b = loader.accept(HttpResult::ok(2, 200, "<p>b</p>"));
        assert_eq!(
            b,
            Some(LoadOutcome::Loaded {
                token: PageToken::new("b"),
                html: "<p>b</p>".into()
            })
        );
        assert_eq!(loader.accept(HttpResult::ok(1, 200, "<p>a</p>")), None);
        assert!(!loader.is_loading());
    }

    #[test]
    fn non_success_status_fails() {
        let mut loader = FragmentLoader::new("pages/", ".html");
        let mut fetch = Recorder::default();
        loader.begin(&PageToken::new("nope"), &base(), &mut fetch);
        let outcome = loader.accept(HttpResult::ok(1, 404, "missing")).unwrap();
        assert!(matches!(outcome, LoadOutcome::Failed { ref reason, .. } if reason == "status 404"));
        assert_eq!(outcome.token(), &PageToken::new("nope"));
    }

    #[test]
    fn not_found_panel_escapes_token() {
        let panel = not_found_panel(&PageToken::new("<script>"));
        assert!(panel.contains("Could not load \"&lt;script&gt;\"."));
        assert!(panel.starts_with(r#"<section class="container py-5"><h2>Page not found</h2>"#));
    }
}
