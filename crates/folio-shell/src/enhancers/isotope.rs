use folio_config::ModulesConfig;
use folio_dom::{Document, Listeners, NodeId};
use tracing::warn;

use crate::{
    error::EnhanceError,
    events::Handler,
    registry::{Capabilities, Capability, EnhanceContext, Enhancer, LibraryCall, LibraryHost, Marker},
};

pub const FILTER_ACTIVE_CLASS: &str = "filter-active";

/// Filterable masonry layout per `.isotope-layout` block.
pub struct FilterLayout;

fn filter_buttons(doc: &Document, item: NodeId) -> Vec<NodeId> {
    doc.elements_with_class(item, "isotope-filters")
        .into_iter()
        .flat_map(|filters| doc.elements_by_tag(filters, "li"))
        .collect()
}

fn bind_filters(doc: &Document, listeners: &mut Listeners<Handler>, item: NodeId) {
    for button in filter_buttons(doc, item) {
        listeners.bind(button, Handler::IsotopeFilter);
    }
}

impl Enhancer for FilterLayout {
    fn name(&self) -> &'static str {
        "isotope"
    }

    fn marker(&self) -> Marker {
        Marker::Class("isotope-layout")
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::Isotope, Capability::ImagesLoaded]
    }

    fn activate(&self, cx: &mut EnhanceContext<'_>, targets: &[NodeId]) -> Result<(), EnhanceError> {
        let defaults = cx.modules.isotope.clone();
        for &item in targets {
            if cx.is_claimed(item, self.name()) {
                continue;
            }
            let Some(container) = cx.doc.first_with_class(item, "isotope-container") else {
                continue;
            };
            let attr_or = |name: &str, default: &str| {
                cx.doc.attr(item, name).unwrap_or(default).to_string()
            };
            let call = LibraryCall::Isotope {
                container,
                item_selector: ".isotope-item".to_string(),
                layout: attr_or("data-layout", &defaults.layout),
                filter: attr_or("data-default-filter", &defaults.filter),
                sort: attr_or("data-sort", &defaults.sort),
            };
            if let Err(err) = cx.invoke(call) {
                warn!(error = %err, "filter layout init failed");
                continue;
            }
            bind_filters(cx.doc, cx.listeners, item);
            cx.claim(item, self.name());
        }
        Ok(())
    }
}

/// Click on a filter button: move the active mark, re-arrange the layout
/// and refresh scroll-reveal positions.
pub fn apply_filter(
    doc: &mut Document,
    host: &mut dyn LibraryHost,
    capabilities: &Capabilities,
    modules: &ModulesConfig,
    button: NodeId,
) -> Result<(), EnhanceError> {
    let Some(item) = doc.closest_with_class(button, "isotope-layout") else {
        return Ok(());
    };
    for other in filter_buttons(doc, item) {
        doc.remove_class(other, FILTER_ACTIVE_CLASS)?;
    }
    doc.add_class(button, FILTER_ACTIVE_CLASS)?;

    let Some(container) = doc.first_with_class(item, "isotope-container") else {
        return Ok(());
    };
    let filter = doc.attr(button, "data-filter").unwrap_or("*").to_string();
    host.invoke(LibraryCall::IsotopeArrange { container, filter })?;
    if capabilities.contains(Capability::Reveal) {
        host.invoke(LibraryCall::RevealRefresh {
            options: modules.reveal.clone(),
        })?;
    }
    Ok(())
}
