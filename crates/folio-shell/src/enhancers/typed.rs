use folio_dom::NodeId;

use crate::{
    error::EnhanceError,
    registry::{Capability, EnhanceContext, Enhancer, LibraryCall, Marker},
};

/// Typing effect on the first `.typed` element.
pub struct TypedEffect;

/// Comma separated `data-typed-items`, trimmed, empties dropped.
pub fn typed_items(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Enhancer for TypedEffect {
    fn name(&self) -> &'static str {
        "typed"
    }

    fn marker(&self) -> Marker {
        Marker::Class("typed")
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::Typed]
    }

    fn activate(&self, cx: &mut EnhanceContext<'_>, targets: &[NodeId]) -> Result<(), EnhanceError> {
        let Some(&target) = targets.first() else {
            return Ok(());
        };
        if cx.is_claimed(target, self.name()) {
            return Ok(());
        }
        let strings = typed_items(cx.doc.attr(target, "data-typed-items"));
        if strings.is_empty() {
            return Ok(());
        }
        let options = cx.modules.typed.clone();
        cx.invoke(LibraryCall::Typed {
            target,
            strings,
            options,
        })?;
        cx.claim(target, self.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_list() {
        assert_eq!(
            typed_items(Some("Designer, Developer ,, Freelancer ")),
            vec!["Designer", "Developer", "Freelancer"]
        );
        assert!(typed_items(Some(" , ")).is_empty());
        assert!(typed_items(None).is_empty());
    }
}
