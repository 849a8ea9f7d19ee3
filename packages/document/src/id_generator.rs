use crate::ast::UiNode;
use crate::visitor::{walk_node_mut, VisitorMut};
use uuid::Uuid;

/// Fresh random (v4) identifier for a node, history entry or session
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether `id` has the canonical UUID shape
pub fn is_uuid(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

struct MissingIdFiller {
    assigned: Vec<String>,
}

impl VisitorMut for MissingIdFiller {
    fn visit_node_mut(&mut self, node: &mut UiNode) {
        if node.id().is_empty() {
            let id = new_id();
            node.set_id(id.clone());
            self.assigned.push(id);
        }
        walk_node_mut(self, node);
    }
}

/// Assign fresh ids to every node in the subtree whose id is empty.
/// Returns the ids that were assigned.
pub fn fill_missing_ids(node: &mut UiNode) -> Vec<String> {
    let mut filler = MissingIdFiller {
        assigned: Vec::new(),
    };
    filler.visit_node_mut(node);
    filler.assigned
}
