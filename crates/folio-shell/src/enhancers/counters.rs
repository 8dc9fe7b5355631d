use folio_dom::NodeId;

use crate::{
    error::EnhanceError,
    registry::{Capability, EnhanceContext, Enhancer, LibraryCall, Marker},
};

/// Animated counters over every `.purecounter` element.
pub struct Counters;

impl Enhancer for Counters {
    fn name(&self) -> &'static str {
        "counters"
    }

    fn marker(&self) -> Marker {
        Marker::Class("purecounter")
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::Counter]
    }

    fn activate(&self, cx: &mut EnhanceContext<'_>, targets: &[NodeId]) -> Result<(), EnhanceError> {
        let scope = cx.scope;
        if cx.is_claimed(scope, self.name()) {
            return Ok(());
        }
        cx.invoke(LibraryCall::Counters {
            targets: targets.to_vec(),
        })?;
        cx.claim(scope, self.name());
        Ok(())
    }
}
