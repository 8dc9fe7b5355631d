use folio_dom::NodeId;
use tracing::warn;

use crate::{
    error::EnhanceError,
    registry::{Capability, EnhanceContext, Enhancer, LibraryCall, Marker},
};

/// Added to a container once its carousel exists.
pub const CAROUSEL_READY_CLASS: &str = "swiper-initialized";

/// Carousel per `.init-swiper` container, configured by its `.swiper-config` JSON.
pub struct Carousel;

impl Enhancer for Carousel {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn marker(&self) -> Marker {
        Marker::Class("init-swiper")
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::Carousel]
    }

    fn activate(&self, cx: &mut EnhanceContext<'_>, targets: &[NodeId]) -> Result<(), EnhanceError> {
        for &container in targets {
            if cx.doc.has_class(container, CAROUSEL_READY_CLASS) {
                continue;
            }
            let config = match cx.doc.first_with_class(container, "swiper-config") {
                Some(script) => {
                    let text = cx.doc.text_content(script);
                    match serde_json::from_str(text.trim()) {
                        Ok(config) => config,
                        Err(err) => {
                            warn!(error = %err, "invalid carousel config, skipping container");
                            continue;
                        }
                    }
                }
                None => serde_json::json!({}),
            };
            if let Err(err) = cx.invoke(LibraryCall::Carousel { container, config }) {
                warn!(error = %err, "carousel init failed");
                continue;
            }
            cx.doc.add_class(container, CAROUSEL_READY_CLASS)?;
        }
        Ok(())
    }
}
