//! Behaviour of the persistent page shell (never replaced by navigation).

use folio_config::FolioConfig;
use folio_dom::{Document, DomError, Listeners, NodeId, NodeMap};
use tracing::debug;

use crate::{events::Handler, state::ShellState};

pub const MOBILE_NAV_ACTIVE_CLASS: &str = "mobile-nav-active";
pub const SCROLLED_CLASS: &str = "scrolled";

/// Shell elements located once at startup.
#[derive(Debug, Clone)]
pub struct Chrome {
    preloader: Option<NodeId>,
    scroll_top: Option<NodeId>,
    header: Option<NodeId>,
    mobile_toggle: Option<NodeId>,
    sticky_classes: Vec<String>,
    threshold: f64,
}

impl Chrome {
    /// Locate the shell elements and bind their click handlers.
    pub fn install(doc: &Document, listeners: &mut Listeners<Handler>, config: &FolioConfig) -> Self {
        let root = doc.root();
        let shell = &config.shell;
        let chrome = Self {
            preloader: doc.element_by_id(&shell.preloader_id),
            scroll_top: doc.first_with_class(root, &shell.scroll_top_class),
            header: doc.element_by_id(&shell.header_id),
            mobile_toggle: doc.first_with_class(root, &shell.mobile_toggle_class),
            sticky_classes: shell.sticky_classes.clone(),
            threshold: config.chrome.scroll_threshold,
        };

        if let Some(button) = chrome.scroll_top {
            listeners.bind(button, Handler::ScrollTop);
        }
        if let Some(toggle) = chrome.mobile_toggle {
            listeners.bind(toggle, Handler::MobileNavToggle);
        }
        for toggle in dropdown_toggles(doc) {
            listeners.bind(toggle, Handler::DropdownToggle);
        }
        chrome
    }

    /// Follow a document compaction.
    pub fn remap(&mut self, map: &NodeMap) {
        for slot in [
            &mut self.preloader,
            &mut self.scroll_top,
            &mut self.header,
            &mut self.mobile_toggle,
        ] {
            *slot = slot.and_then(|id| map.get(id));
        }
    }

    pub fn mobile_toggle(&self) -> Option<NodeId> {
        self.mobile_toggle
    }

    /// Remove the preloader overlay. Returns true if it was present.
    pub fn remove_preloader(&mut self, doc: &mut Document) -> Result<bool, DomError> {
        let Some(preloader) = self.preloader.take() else {
            return Ok(false);
        };
        if doc.is_connected(preloader) {
            doc.remove(preloader)?;
            debug!("preloader removed");
            return Ok(true);
        }
        Ok(false)
    }

    /// Apply the scroll-threshold classes for the given offset.
    pub fn on_scroll(&self, doc: &mut Document, scroll_y: f64) -> Result<(), DomError> {
        let past = scroll_y > self.threshold;
        if let Some(button) = self.scroll_top {
            doc.set_class(button, "active", past)?;
        }
        if let (Some(header), Some(body)) = (self.header, doc.body()) {
            let sticky = self
                .sticky_classes
                .iter()
                .any(|class| doc.has_class(header, class));
            if sticky {
                doc.set_class(body, SCROLLED_CLASS, past)?;
            }
        }
        Ok(())
    }

    /// Flip the mobile navigation overlay and the toggle icon.
    pub fn toggle_mobile_nav(&self, doc: &mut Document, state: &mut ShellState) -> Result<(), DomError> {
        if let Some(body) = doc.body() {
            doc.toggle_class(body, MOBILE_NAV_ACTIVE_CLASS)?;
        }
        if let Some(toggle) = self.mobile_toggle {
            doc.toggle_class(toggle, "bi-list")?;
            doc.toggle_class(toggle, "bi-x")?;
        }
        state.mobile_nav_open = !state.mobile_nav_open;
        Ok(())
    }

    pub fn close_mobile_nav_if_open(
        &self,
        doc: &mut Document,
        state: &mut ShellState,
    ) -> Result<(), DomError> {
        if state.mobile_nav_open {
            self.toggle_mobile_nav(doc, state)?;
        }
        Ok(())
    }
}

/// `.navmenu .toggle-dropdown` elements.
fn dropdown_toggles(doc: &Document) -> Vec<NodeId> {
    doc.elements_with_class(doc.root(), "toggle-dropdown")
        .into_iter()
        .filter(|&toggle| {
            doc.element_path(toggle)
                .into_iter()
                .skip(1)
                .any(|node| doc.has_class(node, "navmenu"))
        })
        .collect()
}

/// Open or close the submenu that follows the toggle's parent item.
pub fn toggle_dropdown(doc: &mut Document, toggle: NodeId) -> Result<(), DomError> {
    let Some(parent) = doc.parent_element(toggle) else {
        return Ok(());
    };
    doc.toggle_class(parent, "active")?;
    if let Some(submenu) = doc.next_element_sibling(parent) {
        doc.toggle_class(submenu, "dropdown-active")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL: &str = r##"<html><body>
        <header id="header" class="header sticky-top">
          <i class="mobile-nav-toggle bi bi-list"></i>
          <nav id="navmenu" class="navmenu"><ul>
            <li class="dropdown"><a href="#"><span>More</span><i id="dd" class="toggle-dropdown"></i></a>
              <ul id="sub"><li><a href="#x">X</a></li></ul></li>
          </ul></nav>
        </header>
        <i class="toggle-dropdown" id="stray"></i>
        <main id="app"></main>
        <a href="#" class="scroll-top"></a>
        <div id="preloader"></div>
    </body></html>"##;

    fn setup() -> (Document, Listeners<Handler>, Chrome) {
        let doc = Document::parse(SHELL);
        let mut listeners = Listeners::new();
        let chrome = Chrome::install(&doc, &mut listeners, &FolioConfig::default());
        (doc, listeners, chrome)
    }

    #[test]
    fn install_binds_shell_controls_only() {
        let (doc, listeners, chrome) = setup();
        let toggle = chrome.mobile_toggle().unwrap();
        assert!(listeners.is_bound(toggle, Handler::MobileNavToggle));
        let dd = doc.element_by_id("dd").unwrap();
        assert!(listeners.is_bound(dd, Handler::DropdownToggle));
        let stray = doc.element_by_id("stray").unwrap();
        assert!(listeners.handlers(stray).is_empty());
        assert_eq!(listeners.len(), 3);
    }

    #[test]
    fn scroll_threshold_toggles_classes() {
        let (mut doc, _, chrome) = setup();
        let body = doc.body().unwrap();
        let button = doc.first_with_class(doc.root(), "scroll-top").unwrap();

        chrome.on_scroll(&mut doc, 150.0).unwrap();
        assert!(doc.has_class(button, "active"));
        assert!(doc.has_class(body, SCROLLED_CLASS));

        chrome.on_scroll(&mut doc, 100.0).unwrap();
        assert!(!doc.has_class(button, "active"));
        assert!(!doc.has_class(body, SCROLLED_CLASS));
    }

    #[test]
    fn scrolled_class_requires_sticky_header() {
        let (mut doc, _, chrome) = setup();
        let header = doc.element_by_id("header").unwrap();
        doc.remove_class(header, "sticky-top").unwrap();
        chrome.on_scroll(&mut doc, 500.0).unwrap();
        assert!(!doc.has_class(doc.body().unwrap(), SCROLLED_CLASS));
    }

    #[test]
    fn mobile_nav_toggle_swaps_icon_and_state() {
        let (mut doc, _, chrome) = setup();
        let mut state = ShellState::default();
        let toggle = chrome.mobile_toggle().unwrap();

        chrome.toggle_mobile_nav(&mut doc, &mut state).unwrap();
        assert!(state.mobile_nav_open());
        assert!(doc.has_class(doc.body().unwrap(), MOBILE_NAV_ACTIVE_CLASS));
        assert!(doc.has_class(toggle, "bi-x"));
        assert!(!doc.has_class(toggle, "bi-list"));

        chrome.close_mobile_nav_if_open(&mut doc, &mut state).unwrap();
        chrome.close_mobile_nav_if_open(&mut doc, &mut state).unwrap();
        assert!(!state.mobile_nav_open());
        assert!(doc.has_class(toggle, "bi-list"));
    }

    #[test]
    fn dropdown_toggle_opens_submenu() {
        let (mut doc, _, _) = setup();
        let dd = doc.element_by_id("dd").unwrap();
        toggle_dropdown(&mut doc, dd).unwrap();
        let anchor = doc.parent_element(dd).unwrap();
        let sub = doc.element_by_id("sub").unwrap();
        assert!(doc.has_class(anchor, "active"));
        assert!(doc.has_class(sub, "dropdown-active"));
    }

    #[test]
    fn preloader_is_removed_once() {
        let (mut doc, _, mut chrome) = setup();
        assert!(chrome.remove_preloader(&mut doc).unwrap());
        assert!(doc.element_by_id("preloader").is_none());
        assert!(!chrome.remove_preloader(&mut doc).unwrap());
    }
}
