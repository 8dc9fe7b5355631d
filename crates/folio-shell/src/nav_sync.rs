//! Active-link marking for the navigation menu.

use folio_dom::{Document, DomError};

use crate::token::PageToken;

pub const ACTIVE_CLASS: &str = "active";

/// Mark the links under `#nav_id` whose target equals `token` as active and
/// clear the mark everywhere else. Returns the number of active links.
///
/// A link's target is its `href` with one leading `#` stripped. A missing
/// navigation container is not an error.
pub fn sync_active_nav(
    doc: &mut Document,
    nav_id: &str,
    token: &PageToken,
) -> Result<usize, DomError> {
    let Some(nav) = doc.element_by_id(nav_id) else {
        return Ok(0);
    };
    let mut active = 0;
    for link in doc.elements_by_tag(nav, "a") {
        let href = doc.attr(link, "href").unwrap_or("");
        let target = href.strip_prefix('#').unwrap_or(href);
        let matches = target == token.as_str();
        doc.set_class(link, ACTIVE_CLASS, matches)?;
        if matches {
            active += 1;
        }
    }
    Ok(active)
}
