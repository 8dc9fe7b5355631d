//! Click classification for in-page anchors.

use folio_dom::{Document, NodeId};
use url::Url;

use crate::token::PageToken;

/// What a click on an anchor should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorAction {
    /// `#` or empty destination: swallow the click.
    Suppress,
    /// Different origin: leave the click to the browser.
    PassThrough,
    /// Same page and the target element exists: smooth-scroll to it.
    ScrollTo(NodeId),
    /// Same page but no such element: load the token's fragment again.
    Reroute(PageToken),
    /// Another page: change the fragment identifier.
    Navigate(PageToken),
}

/// True when `href` resolves to another origin than `base`.
///
/// Unparsable destinations count as internal. Origins are compared by
/// their serialization, so two opaque origins (`file:` pages) are equal.
pub fn is_external(href: &str, base: &Url) -> bool {
    match base.join(href) {
        Ok(url) => url.origin().ascii_serialization() != base.origin().ascii_serialization(),
        Err(_) => false,
    }
}

pub fn classify(doc: &Document, href: &str, base: &Url, current: &PageToken) -> AnchorAction {
    if href.is_empty() || href == "#" {
        return AnchorAction::Suppress;
    }
    if is_external(href, base) {
        return AnchorAction::PassThrough;
    }
    let token = href.strip_prefix('#').unwrap_or(href);
    if token != current.as_str() {
        return AnchorAction::Navigate(PageToken::new(token));
    }
    let target = doc
        .element_by_id(token)
        .or_else(|| doc.find_by_attr(doc.root(), "name", token));
    match target {
        Some(node) => AnchorAction::ScrollTo(node),
        None => AnchorAction::Reroute(PageToken::new(token)),
    }
}
