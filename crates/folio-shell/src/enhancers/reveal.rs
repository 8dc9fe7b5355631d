use folio_dom::NodeId;

use crate::{
    error::EnhanceError,
    registry::{Capability, EnhanceContext, Enhancer, LibraryCall, Marker},
};

/// Scroll-reveal refresh for elements carrying `data-aos`.
pub struct RevealRefresh;

impl Enhancer for RevealRefresh {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn marker(&self) -> Marker {
        Marker::Attribute("data-aos")
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::Reveal]
    }

    fn activate(&self, cx: &mut EnhanceContext<'_>, _targets: &[NodeId]) -> Result<(), EnhanceError> {
        let scope = cx.scope;
        if cx.is_claimed(scope, self.name()) {
            return Ok(());
        }
        let options = cx.modules.reveal.clone();
        cx.invoke(LibraryCall::RevealRefresh { options })?;
        cx.claim(scope, self.name());
        Ok(())
    }
}
