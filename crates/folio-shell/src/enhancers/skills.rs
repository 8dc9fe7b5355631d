use folio_dom::{Document, DomError, NodeId};

use crate::{
    error::EnhanceError,
    registry::{Capability, EnhanceContext, Enhancer, LibraryCall, Marker},
};

/// Progress bars that fill when their `.skills-animation` block scrolls into view.
///
/// Bar widths are reset to `0%` on activation so that revisiting a page
/// replays the fill instead of showing the final state.
pub struct SkillsProgress;

/// `.progress .progress-bar` elements inside `item`.
pub fn progress_bars(doc: &Document, item: NodeId) -> Vec<NodeId> {
    doc.elements_with_class(item, "progress-bar")
        .into_iter()
        .filter(|&bar| {
            doc.element_path(bar)
                .into_iter()
                .skip(1)
                .take_while(|&node| node != item)
                .any(|node| doc.has_class(node, "progress"))
        })
        .collect()
}

/// Set every bar in `item` to its `aria-valuenow` percentage.
pub fn fill_progress(doc: &mut Document, item: NodeId) -> Result<usize, DomError> {
    let bars = progress_bars(doc, item);
    for &bar in &bars {
        let value = doc.attr(bar, "aria-valuenow").unwrap_or("0").trim().to_string();
        doc.set_style_property(bar, "width", &format!("{value}%"))?;
    }
    Ok(bars.len())
}

impl Enhancer for SkillsProgress {
    fn name(&self) -> &'static str {
        "skills"
    }

    fn marker(&self) -> Marker {
        Marker::Class("skills-animation")
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::Waypoint]
    }

    fn activate(&self, cx: &mut EnhanceContext<'_>, targets: &[NodeId]) -> Result<(), EnhanceError> {
        for &item in targets {
            if cx.is_claimed(item, self.name()) {
                continue;
            }
            for bar in progress_bars(cx.doc, item) {
                cx.doc.set_style_property(bar, "width", "0%")?;
            }
            let offset = cx.modules.skills.offset.clone();
            cx.invoke(LibraryCall::Waypoint {
                element: item,
                offset,
                generation: cx.generation,
            })?;
            cx.claim(item, self.name());
        }
        Ok(())
    }
}
