//! # Canopy Document
//!
//! The page tree every other canopy crate operates on.
//!
//! ```text
//! UiPage (root, id never reassigned)
//!  └─ children: [UiNode]
//!       ├─ section / grid  → children: [UiNode]
//!       └─ component       → slots: { name → [UiNode] }
//! ```
//!
//! Invariants:
//! - every node `id` is unique within its page
//! - a node lives in exactly one `children` list or one slot list
//! - list order is significant and preserved
//!
//! Also provides tree addressing ([`address`]), tree walking
//! ([`visitor`]), diagnostics shared by the engine and the intent
//! pipeline, and id generation.

pub mod address;
pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod id_generator;
pub mod visitor;

pub use address::{
    container_at_mut, contains_id, find_node, find_parent, node_at, node_at_mut, resolve,
    resolve_exact_id, ContainerKind, NodeAddress, NodeRef, ParentLocation, Step,
};
pub use ast::{
    Binding, ComponentNode, ContainerNode, DataSource, Layout, NodeKind, Props, Slots, UiNode,
    UiPage,
};
pub use diagnostic::{has_errors, Diagnostic, DiagnosticCode, DiagnosticLevel};
pub use error::DocumentError;
pub use id_generator::{fill_missing_ids, is_uuid, new_id};
pub use visitor::{count_nodes, first_component, subtree_ids, Visitor, VisitorMut};

use std::collections::HashSet;
use std::path::Path;

/// Parse a page from JSON and check id uniqueness
pub fn parse_page(source: &str) -> Result<UiPage, DocumentError> {
    let page: UiPage = serde_json::from_str(source)?;
    check_unique_ids(&page)?;
    Ok(page)
}

/// Load a page from a JSON file
pub fn load_page(path: &Path) -> Result<UiPage, DocumentError> {
    let source = std::fs::read_to_string(path)?;
    parse_page(&source)
}

/// Write a page as pretty JSON
pub fn save_page(path: &Path, page: &UiPage) -> Result<(), DocumentError> {
    let json = serde_json::to_string_pretty(page)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn check_unique_ids(page: &UiPage) -> Result<(), DocumentError> {
    let mut seen = HashSet::new();
    seen.insert(page.id.as_str());
    for child in &page.children {
        for id in subtree_ids(child) {
            if !id.is_empty() && !seen.insert(id) {
                return Err(DocumentError::DuplicateId(id.to_string()));
            }
        }
    }
    Ok(())
}
