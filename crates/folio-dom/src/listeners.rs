use std::collections::HashMap;

use ego_tree::NodeId;

/// Click listener table keyed by element.
///
/// Binding the same handler to the same node twice is a no-op, so callers
/// can re-run their binding pass after every content replacement without
/// stacking handlers on nodes that survived the replacement.
#[derive(Debug, Clone)]
pub struct Listeners<H> {
    bindings: HashMap<NodeId, Vec<H>>,
}

impl<H> Default for Listeners<H> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<H: Copy + PartialEq> Listeners<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `handler` to `node`. Returns false if it was already attached.
    pub fn bind(&mut self, node: NodeId, handler: H) -> bool {
        let handlers = self.bindings.entry(node).or_default();
        if handlers.contains(&handler) {
            return false;
        }
        handlers.push(handler);
        true
    }

    pub fn unbind(&mut self, node: NodeId, handler: H) -> bool {
        let Some(handlers) = self.bindings.get_mut(&node) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|h| *h != handler);
        let removed = before != handlers.len();
        if handlers.is_empty() {
            self.bindings.remove(&node);
        }
        removed
    }

    /// Handlers attached to `node`, in binding order.
    pub fn handlers(&self, node: NodeId) -> Vec<H> {
        self.bindings.get(&node).cloned().unwrap_or_default()
    }

    pub fn is_bound(&self, node: NodeId, handler: H) -> bool {
        self.bindings
            .get(&node)
            .is_some_and(|handlers| handlers.contains(&handler))
    }

    /// Drop every binding whose node fails `keep`. Returns the number of nodes released.
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|node, _| keep(*node));
        before - self.bindings.len()
    }

    /// Move every binding to the node `map` returns for it, dropping nodes
    /// without a counterpart. Returns the number of nodes dropped.
    pub fn remap(&mut self, mut map: impl FnMut(NodeId) -> Option<NodeId>) -> usize {
        let before = self.bindings.len();
        self.bindings = self
            .bindings
            .drain()
            .filter_map(|(node, handlers)| map(node).map(|moved| (moved, handlers)))
            .collect();
        before - self.bindings.len()
    }

    /// Total number of (node, handler) bindings.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
