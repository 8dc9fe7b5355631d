//! Click dispatch types.

use folio_dom::NodeId;
use url::Url;

/// Every click handler the shell can attach to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// In-page anchor interception (`a[href^="#"]`).
    AnchorClick,
    /// Nav links close the mobile menu.
    CloseMobileNav,
    MobileNavToggle,
    DropdownToggle,
    ScrollTop,
    /// Filter buttons of a filterable masonry layout.
    IsotopeFilter,
}

/// A click travelling from its target up through the element ancestors.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub target: NodeId,
    pub current_target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_stopped: bool,
}

impl ClickEvent {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
            immediate_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining handlers on the current element.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn immediate_stopped(&self) -> bool {
        self.immediate_stopped
    }
}

/// What happened as a result of a click.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickOutcome {
    pub default_prevented: bool,
    /// Set when the default action leaves the page (non-fragment link).
    pub navigated_to: Option<Url>,
    pub handlers_run: usize,
}
