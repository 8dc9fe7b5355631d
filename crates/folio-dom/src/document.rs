use std::{collections::HashMap, ops::Deref};

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{Html, Node};
use tracing::trace;

use crate::{DomError, Result};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(key, _)| key != name);
        before != self.attrs.len()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        self.set_attr("class", joined);
    }
}

/// Old-to-new id mapping produced by [`Document::compact`].
///
/// Only connected nodes are mapped; ids of detached nodes have no entry.
#[derive(Debug, Clone, Default)]
pub struct NodeMap(HashMap<NodeId, NodeId>);

impl NodeMap {
    pub fn get(&self, old: NodeId) -> Option<NodeId> {
        self.0.get(&old).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A parsed, mutable HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<DomNode>,
}

impl Document {
    /// Parse a complete HTML document (the persistent page shell).
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut tree = Tree::new(DomNode::Document);
        let root = tree.root().id();
        copy_children(parsed.tree.root(), &mut tree, root);
        Self { tree }
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.elements(self.root())
            .find(|(_, el)| el.name == "body")
            .map(|(id, _)| id)
    }

    fn node(&self, id: NodeId) -> Result<NodeRef<'_, DomNode>> {
        self.tree.get(id).ok_or(DomError::NotFound(id))
    }

    pub fn element(&self, id: NodeId) -> Result<&ElementData> {
        match self.node(id)?.value() {
            DomNode::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn with_element_mut<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Result<R> {
        let mut node = self.tree.get_mut(id).ok_or(DomError::NotFound(id))?;
        match node.value() {
            DomNode::Element(el) => Ok(f(el)),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|el| el.name.as_str())
    }

    /// Element descendants of `scope`, in document order, excluding `scope` itself.
    fn elements(&self, scope: NodeId) -> impl Iterator<Item = (NodeId, &ElementData)> + '_ {
        self.tree
            .get(scope)
            .into_iter()
            .flat_map(|node| node.descendants().skip(1))
            .filter_map(|node| match node.value() {
                DomNode::Element(el) => Some((node.id(), el)),
                _ => None,
            })
    }

    /// First connected element carrying the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_attr(self.root(), "id", id)
    }

    pub fn find_by_attr(&self, scope: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.elements(scope)
            .find(|(_, el)| el.attr(name) == Some(value))
            .map(|(id, _)| id)
    }

    pub fn elements_with_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.elements(scope)
            .filter(|(_, el)| el.has_class(class))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn first_with_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.elements(scope)
            .find(|(_, el)| el.has_class(class))
            .map(|(id, _)| id)
    }

    pub fn elements_with_attr(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        self.elements(scope)
            .filter(|(_, el)| el.attr(name).is_some())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.elements(scope)
            .filter(|(_, el)| el.name.eq_ignore_ascii_case(tag))
            .map(|(id, _)| id)
            .collect()
    }

    /// Anchors under `scope` whose `href` starts with `prefix` (`a[href^="#"]`).
    pub fn anchors_with_href_prefix(&self, scope: NodeId, prefix: &str) -> Vec<NodeId> {
        self.elements(scope)
            .filter(|(_, el)| el.name == "a")
            .filter(|(_, el)| el.attr("href").is_some_and(|href| href.starts_with(prefix)))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.tree.get(id)?.parent()?;
        matches!(parent.value(), DomNode::Element(_)).then(|| parent.id())
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.tree.get(id)?.next_sibling();
        while let Some(node) = cursor {
            if matches!(node.value(), DomNode::Element(_)) {
                return Some(node.id());
            }
            cursor = node.next_sibling();
        }
        None
    }

    /// `id` followed by its element ancestors, innermost first.
    pub fn element_path(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.tree.get(id) else {
            return Vec::new();
        };
        std::iter::once(node)
            .chain(node.ancestors())
            .filter(|n| matches!(n.value(), DomNode::Element(_)))
            .map(|n| n.id())
            .collect()
    }

    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.element_path(id)
            .into_iter()
            .find(|node| self.has_class(*node, class))
    }

    pub fn closest_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.element_path(id)
            .into_iter()
            .find(|node| self.tag(*node) == Some(tag))
    }

    /// True while the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let Some(node) = self.tree.get(id) else {
            return false;
        };
        let root = self.root();
        node.id() == root || node.ancestors().any(|a| a.id() == root)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok()?.attr(name)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.with_element_mut(id, |el| el.set_attr(name, value))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_ok_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        self.with_element_mut(id, |el| el.add_class(class))
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        self.with_element_mut(id, |el| el.remove_class(class))
    }

    /// Toggle a class, returning whether it is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> Result<bool> {
        self.with_element_mut(id, |el| {
            if el.has_class(class) {
                el.remove_class(class);
                false
            } else {
                el.add_class(class);
                true
            }
        })
    }

    /// Add or remove `class` so that its presence equals `on`.
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) -> Result<()> {
        if on {
            self.add_class(id, class)
        } else {
            self.remove_class(id, class)
        }
    }

    /// Value of a single inline style property.
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        parse_style(style)
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> Result<()> {
        let property = property.to_ascii_lowercase();
        let mut decls = parse_style(self.attr(id, "style").unwrap_or(""));
        match decls.iter_mut().find(|(key, _)| *key == property) {
            Some(slot) => slot.1 = value.to_string(),
            None => decls.push((property, value.to_string())),
        }
        let style = decls
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr(id, "style", style)
    }

    /// Replace every child of `id` with the parsed `html` fragment.
    ///
    /// The previous children are detached; ids that referred to them are no
    /// longer connected afterwards.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<()> {
        self.element(id)?;
        let old: Vec<NodeId> = self.node(id)?.children().map(|c| c.id()).collect();
        for child in &old {
            if let Some(mut node) = self.tree.get_mut(*child) {
                node.detach();
            }
        }
        let fragment = Html::parse_fragment(html);
        copy_children(*fragment.root_element(), &mut self.tree, id);
        trace!(detached = old.len(), bytes = html.len(), "replaced inner html");
        Ok(())
    }

    /// Detach a node (and its subtree) from the document.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        let mut node = self.tree.get_mut(id).ok_or(DomError::NotFound(id))?;
        node.detach();
        Ok(())
    }

    /// Number of nodes held by the arena, detached ones included.
    pub fn arena_len(&self) -> usize {
        self.tree.nodes().count()
    }

    /// Number of nodes reachable from the root.
    pub fn live_len(&self) -> usize {
        self.tree.root().descendants().count()
    }

    /// Rebuild the arena from the connected nodes only.
    ///
    /// Every id issued before the call is invalid afterwards; callers must
    /// translate the ids they keep through the returned map.
    pub fn compact(&mut self) -> NodeMap {
        let source = self.tree.root();
        let mut tree = Tree::new(source.value().clone());
        let mut map = HashMap::new();
        let root = tree.root().id();
        map.insert(source.id(), root);
        copy_live(source, &mut tree, root, &mut map);
        let before = self.arena_len();
        self.tree = tree;
        trace!(before, after = map.len(), "compacted document arena");
        NodeMap(map)
    }

    /// [`compact`](Self::compact) once detached nodes outnumber connected ones.
    pub fn compact_if_sparse(&mut self) -> Option<NodeMap> {
        let live = self.live_len();
        let detached = self.arena_len().saturating_sub(live);
        (detached > live).then(|| self.compact())
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        node.descendants()
            .filter_map(|n| match n.value() {
                DomNode::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree.get(id) {
            let raw = self
                .tag(id)
                .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
            for child in node.children() {
                write_node(child, raw, &mut out);
            }
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree.get(id) {
            write_node(node, false, &mut out);
        }
        out
    }
}

fn copy_children(source: NodeRef<'_, Node>, tree: &mut Tree<DomNode>, parent: NodeId) {
    for child in source.children() {
        let value = match child.value() {
            Node::Element(el) => DomNode::Element(ElementData {
                name: el.name().to_ascii_lowercase(),
                attrs: el
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }),
            Node::Text(text) => DomNode::Text(text.deref().to_string()),
            Node::Comment(comment) => DomNode::Comment(comment.deref().to_string()),
            _ => continue,
        };
        let Some(mut parent_node) = tree.get_mut(parent) else {
            return;
        };
        let id = parent_node.append(value).id();
        copy_children(child, tree, id);
    }
}

fn copy_live(
    source: NodeRef<'_, DomNode>,
    tree: &mut Tree<DomNode>,
    parent: NodeId,
    map: &mut HashMap<NodeId, NodeId>,
) {
    for child in source.children() {
        let Some(mut parent_node) = tree.get_mut(parent) else {
            return;
        };
        let id = parent_node.append(child.value().clone()).id();
        map.insert(child.id(), id);
        copy_live(child, tree, id, map);
    }
}

fn write_node(node: NodeRef<'_, DomNode>, raw_text: bool, out: &mut String) {
    match node.value() {
        DomNode::Document => {
            for child in node.children() {
                write_node(child, false, out);
            }
        }
        DomNode::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in el.attrs() {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.name.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
            for child in node.children() {
                write_node(child, raw, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
        DomNode::Text(text) if raw_text => out.push_str(text),
        DomNode::Text(text) => out.push_str(&escape_text(text)),
        DomNode::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

/// Escape text for inclusion in HTML element content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
