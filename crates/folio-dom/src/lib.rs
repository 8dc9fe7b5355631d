//! Mutable HTML document model for the Folio shell.
//!
//! Markup is parsed with `scraper` (html5ever) and copied into an
//! `ego-tree` arena that supports the mutations the shell needs: content
//! replacement, class and inline-style changes, and node removal.
//! Replaced nodes are detached, so a [`NodeId`] held from an earlier
//! generation stops being connected. The arena keeps detached nodes until
//! [`Document::compact`] rebuilds it and hands back a [`NodeMap`] for the
//! ids the caller still holds.

mod document;
mod listeners;

pub use document::{Document, DomNode, ElementData, NodeMap, escape_text};
pub use ego_tree::NodeId;
pub use listeners::Listeners;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    NotFound(NodeId),
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
}

pub type Result<T> = std::result::Result<T, DomError>;
