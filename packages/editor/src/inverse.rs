//! Inverse patch generation.
//!
//! The inverse is computed against the page *before* the forward patch is
//! applied. It targets the node's real id, so it stays valid even when the
//! forward patch addressed the node by `dataUiId` or a fuzzy suffix.
//!
//! Structural ops other than `addNode` and `reorder` have no inverse here;
//! callers fall back to a page snapshot (see [`crate::UndoStack`]).

use crate::engine::get_nested;
use crate::patch::{field_name, token_segments, Patch, PatchOp, PROPS_PREFIX};
use canopy_document::{find_node, NodeRef, UiPage};
use serde_json::Value;

/// Patch that restores the state `patch` overwrites, if one can be expressed
pub fn inverse(page: &UiPage, patch: &Patch) -> Option<Patch> {
    let target = find_node(page, &patch.target_id)?;
    let real_id = target.id().to_string();

    match &patch.op {
        PatchOp::SetProp { path, .. } => {
            let name = field_name(path, PROPS_PREFIX).ok()?;
            let component = target.as_node()?.as_component()?;
            let prior = component.props.get(name).cloned().unwrap_or(Value::Null);
            Some(Patch::new(
                real_id,
                PatchOp::SetProp {
                    path: path.clone(),
                    value: prior,
                },
            ))
        }

        PatchOp::SetCopy { .. } => {
            let component = target.as_node()?.as_component()?;
            Some(match &component.copy {
                Some(prior) => Patch::set_copy(real_id, prior.clone()),
                None => Patch::clear_copy(real_id),
            })
        }

        PatchOp::ToggleVariant { .. } => {
            let component = target.as_node()?.as_component()?;
            Some(match &component.variant {
                Some(prior) => Patch::toggle_variant(real_id, Some(prior.clone())),
                None => Patch::clear_variant(real_id),
            })
        }

        PatchOp::Reorder { direction } => Some(Patch::reorder(real_id, direction.flip())),

        PatchOp::Rename { .. } => {
            let prior = match target {
                NodeRef::Root(page) => page.title.clone(),
                NodeRef::Node(node) => node.name().unwrap_or_default().to_string(),
            };
            Some(Patch::rename(real_id, prior))
        }

        PatchOp::SetToken { path, .. } => {
            let segments = token_segments(path).ok()?;
            let node = target.as_node()?;
            let prior = node
                .layout()
                .and_then(|layout| get_nested(layout, &segments))
                .cloned()
                .unwrap_or(Value::Null);
            Some(Patch::new(
                real_id,
                PatchOp::SetToken {
                    path: path.clone(),
                    value: prior,
                },
            ))
        }

        PatchOp::AddNode { node, .. } if !node.id().is_empty() => {
            Some(Patch::remove_node(node.id()))
        }

        PatchOp::AddNode { .. }
        | PatchOp::RemoveNode
        | PatchOp::MoveNode { .. }
        | PatchOp::WrapWith { .. }
        | PatchOp::SetBinding { .. }
        | PatchOp::SetDataSource { .. } => None,
    }
}
