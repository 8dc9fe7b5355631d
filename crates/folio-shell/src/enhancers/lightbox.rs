use folio_dom::NodeId;

use crate::{
    error::EnhanceError,
    registry::{Capability, EnhanceContext, Enhancer, LibraryCall, Marker},
};

/// One lightbox instance per generation over every `.glightbox` link.
pub struct Lightbox;

impl Enhancer for Lightbox {
    fn name(&self) -> &'static str {
        "lightbox"
    }

    fn marker(&self) -> Marker {
        Marker::Class("glightbox")
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::Lightbox]
    }

    fn activate(&self, cx: &mut EnhanceContext<'_>, _targets: &[NodeId]) -> Result<(), EnhanceError> {
        let scope = cx.scope;
        if cx.is_claimed(scope, self.name()) {
            return Ok(());
        }
        cx.invoke(LibraryCall::Lightbox {
            selector: ".glightbox".to_string(),
        })?;
        cx.claim(scope, self.name());
        Ok(())
    }
}
