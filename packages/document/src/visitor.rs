use crate::address::{first_match, node_at};
use crate::ast::{ComponentNode, UiNode, UiPage};

/// Visitor pattern for traversing page trees immutably
///
/// Default implementations walk the entire tree in addressing order:
/// a node, then its `children`, then its `slots`.
/// Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_page(&mut self, page: &UiPage) {
        walk_page(self, page);
    }

    fn visit_node(&mut self, node: &UiNode) {
        walk_node(self, node);
    }
}

/// Mutable visitor pattern for transforming page trees
pub trait VisitorMut: Sized {
    fn visit_page_mut(&mut self, page: &mut UiPage) {
        walk_page_mut(self, page);
    }

    fn visit_node_mut(&mut self, node: &mut UiNode) {
        walk_node_mut(self, node);
    }
}

pub fn walk_page<V: Visitor>(visitor: &mut V, page: &UiPage) {
    for child in &page.children {
        visitor.visit_node(child);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &UiNode) {
    if let Some(children) = node.children() {
        for child in children {
            visitor.visit_node(child);
        }
    }
    if let Some(slots) = node.slots() {
        for slot_nodes in slots.values() {
            for child in slot_nodes {
                visitor.visit_node(child);
            }
        }
    }
}

pub fn walk_page_mut<V: VisitorMut>(visitor: &mut V, page: &mut UiPage) {
    for child in &mut page.children {
        visitor.visit_node_mut(child);
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut UiNode) {
    if let Some(children) = node.children_mut() {
        for child in children {
            visitor.visit_node_mut(child);
        }
    }
    if let Some(slots) = node.slots_mut() {
        for slot_nodes in slots.values_mut() {
            for child in slot_nodes {
                visitor.visit_node_mut(child);
            }
        }
    }
}

struct IdCollector<'a> {
    ids: Vec<&'a str>,
}

impl<'a> IdCollector<'a> {
    fn collect(&mut self, node: &'a UiNode) {
        self.ids.push(node.id());
        if let Some(children) = node.children() {
            for child in children {
                self.collect(child);
            }
        }
        if let Some(slots) = node.slots() {
            for child in slots.values().flatten() {
                self.collect(child);
            }
        }
    }
}

/// Every node id in the subtree rooted at `node`, in walk order
pub fn subtree_ids(node: &UiNode) -> Vec<&str> {
    let mut collector = IdCollector { ids: Vec::new() };
    collector.collect(node);
    collector.ids
}

/// First component node in tree order. Walks `children` before `slots`,
/// the same order address resolution uses.
pub fn first_component(page: &UiPage) -> Option<&ComponentNode> {
    let address = first_match(page, &|node: &UiNode| node.as_component().is_some())?;
    node_at(page, &address)?.as_component()
}

#[derive(Default)]
struct NodeCounter {
    count: usize,
}

impl Visitor for NodeCounter {
    fn visit_node(&mut self, node: &UiNode) {
        self.count += 1;
        walk_node(self, node);
    }
}

/// Number of nodes in the page (the root excluded)
pub fn count_nodes(page: &UiPage) -> usize {
    let mut counter = NodeCounter::default();
    counter.visit_page(page);
    counter.count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> UiPage {
        UiPage::new("p", "Test")
            .with_child(UiNode::section("s").with_children(vec![
                UiNode::component("a", "Button"),
                UiNode::component("b", "Card")
                    .with_slot("body", vec![UiNode::component("c", "Text")]),
            ]))
            .with_child(UiNode::component("d", "Link"))
    }

    #[test]
    fn test_count_nodes_includes_slot_children() {
        assert_eq!(count_nodes(&page()), 5);
    }

    #[test]
    fn test_first_component_in_tree_order() {
        assert_eq!(first_component(&page()).unwrap().id, "a");
        assert!(first_component(&UiPage::new("empty", "")).is_none());
    }

    #[test]
    fn test_first_component_reaches_slot_content() {
        let page = UiPage::new("p", "Test").with_child(UiNode::grid("g").with_children(vec![
            UiNode::section("empty"),
            UiNode::component("card", "Card")
                .with_slot("body", vec![UiNode::component("inner", "Text")]),
        ]));
        let first = first_component(&page).unwrap();
        assert_eq!(first.id, "card");

        let bare = UiPage::new("p", "Test").with_child(UiNode::section("s"));
        assert!(first_component(&bare).is_none());
    }

    #[test]
    fn test_first_component_agrees_with_resolution_order() {
        let page = page();
        let first = first_component(&page).unwrap();
        let address = crate::address::resolve(&page, &first.id).unwrap();
        assert_eq!(address, first_match(&page, &|n: &UiNode| n.as_component().is_some()).unwrap());
        assert_eq!(address.to_string(), "children[0].children[0]");
    }

    #[test]
    fn test_subtree_ids_walks_children_then_slots() {
        let page = page();
        assert_eq!(subtree_ids(&page.children[0]), vec!["s", "a", "b", "c"]);
    }
}
