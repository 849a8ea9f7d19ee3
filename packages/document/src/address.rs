//! # Tree Addressing
//!
//! Resolves identifier strings to positions in a [`UiPage`].
//!
//! ## Resolution order
//!
//! 1. The page root, by its id
//! 2. Exact match on a node's `id` or `dataUiId`, depth-first
//! 3. Fuzzy match: the candidate is a suffix of a node's `id`
//!
//! Each pass walks the whole tree. Within a node, its `children` are
//! exhausted before its `slots` (slot names in lexical order).
//!
//! Lookups are pure and O(nodes). Nothing is memoized between calls.

use crate::ast::{UiNode, UiPage};
use std::fmt;

/// Which list of a node holds a child
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Children,
    Slot(String),
}

/// One hop from a parent into one of its child lists
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub container: ContainerKind,
    pub index: usize,
}

/// Position of a node, as the hops from the page root. Empty = the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    steps: Vec<Step>,
}

impl NodeAddress {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn push(&self, container: ContainerKind, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step { container, index });
        Self { steps }
    }

    /// Parent address and the final hop, `None` for the root
    pub fn split_last(&self) -> Option<(NodeAddress, &Step)> {
        let (last, rest) = self.steps.split_last()?;
        Some((
            NodeAddress {
                steps: rest.to_vec(),
            },
            last,
        ))
    }

    /// Whether `self` lies inside (or is) the subtree at `ancestor`
    pub fn is_within(&self, ancestor: &NodeAddress) -> bool {
        self.steps.starts_with(&ancestor.steps)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("root");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match &step.container {
                ContainerKind::Children => write!(f, "children[{}]", step.index)?,
                ContainerKind::Slot(name) => write!(f, "slots.{}[{}]", name, step.index)?,
            }
        }
        Ok(())
    }
}

/// Borrowed result of a lookup
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Root(&'a UiPage),
    Node(&'a UiNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            NodeRef::Root(page) => &page.id,
            NodeRef::Node(node) => node.id(),
        }
    }

    pub fn as_node(&self) -> Option<&'a UiNode> {
        match self {
            NodeRef::Root(_) => None,
            NodeRef::Node(node) => Some(node),
        }
    }

    /// The root and sections/grids accept children
    pub fn is_container(&self) -> bool {
        match self {
            NodeRef::Root(_) => true,
            NodeRef::Node(node) => node.is_container(),
        }
    }
}

/// Where a node sits inside its parent
#[derive(Debug, Clone, PartialEq)]
pub struct ParentLocation {
    /// Address of the parent (root address for top-level nodes)
    pub parent: NodeAddress,
    /// Real id of the parent (the page id for top-level nodes)
    pub parent_id: String,
    pub container: ContainerKind,
    /// Zero-based index of the node within `container`
    pub index: usize,
    /// Symbolic path of the node, for diagnostics only
    pub path: String,
}

/// Resolve an identifier to an address using the full resolution order
pub fn resolve(page: &UiPage, id: &str) -> Option<NodeAddress> {
    if id.is_empty() {
        return None;
    }

    if page.id == id {
        return Some(NodeAddress::root());
    }

    let exact = |node: &UiNode| node.id() == id || node.data_ui_id() == Some(id);
    let fuzzy = |node: &UiNode| node.id().ends_with(id) || node.data_ui_id() == Some(id);

    search(&page.children, &NodeAddress::root(), ContainerKind::Children, &exact)
        .or_else(|| search(&page.children, &NodeAddress::root(), ContainerKind::Children, &fuzzy))
}

/// Resolve an identifier by exact `id` only (no dataUiId, no fuzzy match)
pub fn resolve_exact_id(page: &UiPage, id: &str) -> Option<NodeAddress> {
    if id.is_empty() {
        return None;
    }
    if page.id == id {
        return Some(NodeAddress::root());
    }
    search(
        &page.children,
        &NodeAddress::root(),
        ContainerKind::Children,
        &|node: &UiNode| node.id() == id,
    )
}

/// Address of the first node matching `matches`, in resolution order
pub(crate) fn first_match(page: &UiPage, matches: &dyn Fn(&UiNode) -> bool) -> Option<NodeAddress> {
    search(&page.children, &NodeAddress::root(), ContainerKind::Children, matches)
}

fn search(
    nodes: &[UiNode],
    parent: &NodeAddress,
    container: ContainerKind,
    matches: &dyn Fn(&UiNode) -> bool,
) -> Option<NodeAddress> {
    for (index, node) in nodes.iter().enumerate() {
        let address = parent.push(container.clone(), index);
        if matches(node) {
            return Some(address);
        }

        if let Some(children) = node.children() {
            if let Some(found) = search(children, &address, ContainerKind::Children, matches) {
                return Some(found);
            }
        }

        if let Some(slots) = node.slots() {
            for (name, slot_nodes) in slots {
                let kind = ContainerKind::Slot(name.clone());
                if let Some(found) = search(slot_nodes, &address, kind, matches) {
                    return Some(found);
                }
            }
        }
    }

    None
}

/// Find a node (or the root) by identifier
pub fn find_node<'a>(page: &'a UiPage, id: &str) -> Option<NodeRef<'a>> {
    let address = resolve(page, id)?;
    if address.is_root() {
        return Some(NodeRef::Root(page));
    }
    node_at(page, &address).map(NodeRef::Node)
}

/// Find the parent context of a node. `None` for the root or an unknown id.
pub fn find_parent(page: &UiPage, id: &str) -> Option<ParentLocation> {
    let address = resolve(page, id)?;
    let (parent, last) = address.split_last()?;

    let parent_id = if parent.is_root() {
        page.id.clone()
    } else {
        node_at(page, &parent)?.id().to_string()
    };

    Some(ParentLocation {
        parent_id,
        container: last.container.clone(),
        index: last.index,
        path: address.to_string(),
        parent,
    })
}

/// Node at an address. The root address has no node.
pub fn node_at<'a>(page: &'a UiPage, address: &NodeAddress) -> Option<&'a UiNode> {
    let (first, rest) = address.steps.split_first()?;
    if first.container != ContainerKind::Children {
        return None;
    }

    let mut node = page.children.get(first.index)?;
    for step in rest {
        node = node.container(&step.container)?.get(step.index)?;
    }
    Some(node)
}

pub fn node_at_mut<'a>(page: &'a mut UiPage, address: &NodeAddress) -> Option<&'a mut UiNode> {
    let (first, rest) = address.steps.split_first()?;
    if first.container != ContainerKind::Children {
        return None;
    }

    let mut node = page.children.get_mut(first.index)?;
    for step in rest {
        node = node.container_mut(&step.container)?.get_mut(step.index)?;
    }
    Some(node)
}

/// Mutable list `container` of the node at `parent` (the page's children for the root)
pub fn container_at_mut<'a>(
    page: &'a mut UiPage,
    parent: &NodeAddress,
    container: &ContainerKind,
) -> Option<&'a mut Vec<UiNode>> {
    if parent.is_root() {
        return match container {
            ContainerKind::Children => Some(&mut page.children),
            ContainerKind::Slot(_) => None,
        };
    }
    node_at_mut(page, parent)?.container_mut(container)
}

/// True when some node (or the root) carries exactly this `id`
pub fn contains_id(page: &UiPage, id: &str) -> bool {
    resolve_exact_id(page, id).is_some()
}

impl UiNode {
    /// The child list named by `kind`, if this node has it
    pub fn container(&self, kind: &ContainerKind) -> Option<&Vec<UiNode>> {
        match kind {
            ContainerKind::Children => self.children(),
            ContainerKind::Slot(name) => self.slots()?.get(name),
        }
    }

    pub fn container_mut(&mut self, kind: &ContainerKind) -> Option<&mut Vec<UiNode>> {
        match kind {
            ContainerKind::Children => self.children_mut(),
            ContainerKind::Slot(name) => self.slots_mut()?.get_mut(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> UiPage {
        UiPage::new("page-1", "Home")
            .with_child(
                UiNode::section("hero").with_children(vec![
                    UiNode::component("heading-1", "Heading").with_copy("Welcome"),
                    UiNode::component("button-1", "Button")
                        .with_data_ui_id("cta")
                        .with_copy("Start"),
                ]),
            )
            .with_child(
                UiNode::component("card-1", "Card").with_slot(
                    "footer",
                    vec![UiNode::component("link-1", "Link").with_copy("More")],
                ),
            )
    }

    #[test]
    fn test_resolves_root_by_id() {
        let page = sample_page();
        assert!(resolve(&page, "page-1").unwrap().is_root());
        assert!(matches!(find_node(&page, "page-1"), Some(NodeRef::Root(_))));
    }

    #[test]
    fn test_resolves_nested_child_by_id_and_data_ui_id() {
        let page = sample_page();
        let by_id = resolve(&page, "button-1").unwrap();
        let by_data = resolve(&page, "cta").unwrap();
        assert_eq!(by_id, by_data);
        assert_eq!(by_id.to_string(), "children[0].children[1]");
    }

    #[test]
    fn test_exact_match_beats_earlier_fuzzy_candidate() {
        // "button-1" is a suffix of "primary-button-1", which comes first
        let page = UiPage::new("p", "")
            .with_child(UiNode::component("primary-button-1", "Button"))
            .with_child(UiNode::component("button-1", "Button"));
        let address = resolve(&page, "button-1").unwrap();
        assert_eq!(node_at(&page, &address).unwrap().id(), "button-1");
    }

    #[test]
    fn test_fuzzy_suffix_match() {
        let page = sample_page();
        let node = find_node(&page, "ing-1").and_then(|n| n.as_node()).unwrap();
        assert_eq!(node.id(), "heading-1");
    }

    #[test]
    fn test_resolves_into_slots() {
        let page = sample_page();
        let address = resolve(&page, "link-1").unwrap();
        assert_eq!(address.to_string(), "children[1].slots.footer[0]");

        let parent = find_parent(&page, "link-1").unwrap();
        assert_eq!(parent.parent_id, "card-1");
        assert_eq!(parent.container, ContainerKind::Slot("footer".to_string()));
        assert_eq!(parent.index, 0);
    }

    #[test]
    fn test_root_has_no_parent() {
        let page = sample_page();
        assert!(find_parent(&page, "page-1").is_none());
        assert!(find_parent(&page, "missing").is_none());
    }

    #[test]
    fn test_top_level_parent_is_page() {
        let page = sample_page();
        let parent = find_parent(&page, "card-1").unwrap();
        assert!(parent.parent.is_root());
        assert_eq!(parent.parent_id, "page-1");
        assert_eq!(parent.index, 1);
        assert_eq!(parent.path, "children[1]");
    }

    #[test]
    fn test_empty_id_never_resolves() {
        let page = sample_page();
        assert!(resolve(&page, "").is_none());
    }

    #[test]
    fn test_node_at_mut_edits_in_place() {
        let mut page = sample_page();
        let address = resolve(&page, "link-1").unwrap();
        node_at_mut(&mut page, &address).unwrap().set_name("Footer link");
        assert_eq!(find_node(&page, "link-1").unwrap().as_node().unwrap().name(), Some("Footer link"));
    }

    #[test]
    fn test_is_within() {
        let page = sample_page();
        let hero = resolve(&page, "hero").unwrap();
        let button = resolve(&page, "button-1").unwrap();
        assert!(button.is_within(&hero));
        assert!(!hero.is_within(&button));
        assert!(hero.is_within(&NodeAddress::root()));
    }
}
