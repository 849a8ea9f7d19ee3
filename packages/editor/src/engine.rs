//! # Patch Engine
//!
//! Applies one [`Patch`] to a copy of a page.
//!
//! ## Contract
//!
//! - The input page is never mutated. The engine works on a clone.
//! - An unresolvable target yields one `NODE_NOT_FOUND` error and the
//!   unmodified copy.
//! - A failed operation yields one error diagnostic and the unmodified
//!   copy; structural ops (remove-then-insert) are all-or-nothing.
//! - Registry problems (unknown prop, unknown component) are warnings and
//!   never block the edit.
//!
//! ## Known approximation
//!
//! `addNode` into a container with `position: before` has no sibling to
//! be before, so it appends at the end, the same as `end`.

use crate::errors::PatchError;
use crate::patch::{field_name, token_segments, Direction, Patch, PatchEnvelope, PatchOp, Position, PROPS_PREFIX};
use crate::registry::{allowed_variants, ComponentRegistry};
use canopy_document::{
    container_at_mut, contains_id, fill_missing_ids, has_errors, node_at, node_at_mut, resolve,
    resolve_exact_id, subtree_ids, Binding, ComponentNode, DataSource, Diagnostic, DiagnosticCode,
    NodeAddress, UiNode, UiPage,
};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// Result of applying a patch: the new page plus everything worth reporting
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub page: UiPage,
    pub diagnostics: Vec<Diagnostic>,
}

impl PatchOutcome {
    /// True when no error diagnostic was produced
    pub fn is_applied(&self) -> bool {
        !has_errors(&self.diagnostics)
    }
}

/// Per-call state threaded through the op handlers
struct ApplyContext<'r> {
    registry: Option<&'r dyn ComponentRegistry>,
    diagnostics: Vec<Diagnostic>,
    path: String,
}

impl ApplyContext<'_> {
    fn warn(&mut self, code: DiagnosticCode, message: String) {
        self.diagnostics
            .push(Diagnostic::warning(code, message).with_path(self.path.clone()));
    }
}

/// Apply `patch` to a copy of `page`.
///
/// `page` is never modified. On failure the outcome carries an unmodified
/// copy and exactly one error diagnostic; warnings never block the edit.
#[instrument(skip_all, fields(op = patch.op.name(), target_id = %patch.target_id))]
pub fn apply(
    page: &UiPage,
    patch: &Patch,
    registry: Option<&dyn ComponentRegistry>,
) -> PatchOutcome {
    let Some(address) = resolve(page, &patch.target_id) else {
        warn!("Patch target not found");
        return PatchOutcome {
            page: page.clone(),
            diagnostics: vec![Diagnostic::error(
                DiagnosticCode::NodeNotFound,
                format!("Node not found: {}", patch.target_id),
            )],
        };
    };

    let mut working = page.clone();
    let mut ctx = ApplyContext {
        registry,
        diagnostics: Vec::new(),
        path: address.to_string(),
    };

    match apply_op(&mut working, &address, &patch.op, &mut ctx) {
        Ok(()) => {
            debug!(path = %ctx.path, warnings = ctx.diagnostics.len(), "Patch applied");
            PatchOutcome {
                page: working,
                diagnostics: ctx.diagnostics,
            }
        }
        Err(err) => {
            warn!(error = %err, "Patch rejected");
            let mut diagnostics = ctx.diagnostics;
            diagnostics.push(err.to_diagnostic().with_path(ctx.path));
            PatchOutcome {
                page: page.clone(),
                diagnostics,
            }
        }
    }
}

/// Apply an untyped patch. Unknown operations are reported, never dropped.
pub fn apply_envelope(
    page: &UiPage,
    envelope: &PatchEnvelope,
    registry: Option<&dyn ComponentRegistry>,
) -> PatchOutcome {
    match Patch::try_from(envelope.clone()) {
        Ok(patch) => apply(page, &patch, registry),
        Err(err) => {
            warn!(op = %envelope.op, error = %err, "Patch could not be decoded");
            PatchOutcome {
                page: page.clone(),
                diagnostics: vec![err.to_diagnostic()],
            }
        }
    }
}

/// Apply patches in order. Failed patches leave the page as it was and
/// application continues with the next one.
pub fn apply_all(
    page: &UiPage,
    patches: &[Patch],
    registry: Option<&dyn ComponentRegistry>,
) -> PatchOutcome {
    let mut current = page.clone();
    let mut diagnostics = Vec::new();
    for patch in patches {
        let outcome = apply(&current, patch, registry);
        current = outcome.page;
        diagnostics.extend(outcome.diagnostics);
    }
    PatchOutcome {
        page: current,
        diagnostics,
    }
}

fn apply_op(
    page: &mut UiPage,
    address: &NodeAddress,
    op: &PatchOp,
    ctx: &mut ApplyContext<'_>,
) -> Result<(), PatchError> {
    match op {
        PatchOp::SetProp { path, value } => set_prop(page, address, path, value, ctx),
        PatchOp::SetCopy { value } => {
            set_copy(page, address, value.as_ref().map(Option::as_deref))
        }
        PatchOp::ToggleVariant { variant } => {
            toggle_variant(page, address, variant.as_ref().map(Option::as_deref), ctx)
        }
        PatchOp::AddNode { node, position } => add_node(page, address, node, *position, ctx),
        PatchOp::RemoveNode => remove_node(page, address).map(|_| ()),
        PatchOp::MoveNode {
            to_parent_id,
            position,
        } => move_node(page, address, to_parent_id, *position),
        PatchOp::WrapWith { wrapper } => wrap_with(page, address, wrapper),
        PatchOp::Reorder { direction } => reorder(page, address, *direction),
        PatchOp::Rename { name } => rename(page, address, name),
        PatchOp::SetToken { path, value } => set_token(page, address, path, value),
        PatchOp::SetBinding { binding } => set_binding(page, address, binding),
        PatchOp::SetDataSource { data_source } => {
            set_data_source(page, data_source);
            Ok(())
        }
    }
}

fn node_mut<'a>(page: &'a mut UiPage, address: &NodeAddress) -> Result<&'a mut UiNode, PatchError> {
    node_at_mut(page, address).ok_or_else(|| PatchError::NodeNotFound(address.to_string()))
}

fn component_mut<'a>(
    page: &'a mut UiPage,
    address: &NodeAddress,
    op: &'static str,
) -> Result<&'a mut ComponentNode, PatchError> {
    if address.is_root() {
        return Err(PatchError::InvalidTarget {
            op,
            expected: "component nodes",
            actual: "the page root".to_string(),
        });
    }
    let node = node_mut(page, address)?;
    let actual = node.kind().as_str().to_string();
    node.as_component_mut().ok_or(PatchError::InvalidTarget {
        op,
        expected: "component nodes",
        actual,
    })
}

fn set_prop(
    page: &mut UiPage,
    address: &NodeAddress,
    path: &str,
    value: &Value,
    ctx: &mut ApplyContext<'_>,
) -> Result<(), PatchError> {
    let name = field_name(path, PROPS_PREFIX)?;
    let component = component_mut(page, address, "setProp")?;

    if let Some(registry) = ctx.registry {
        match registry.component(&component.component) {
            Some(definition) if !definition.has_prop(name) => ctx.warn(
                DiagnosticCode::UnknownProp,
                format!("{} has no prop '{}' in the registry", component.component, name),
            ),
            Some(_) => {}
            None => ctx.warn(
                DiagnosticCode::UnknownComponent,
                format!("{} is not in the registry", component.component),
            ),
        }
    }

    if value.is_null() {
        component.props.remove(name);
    } else {
        component.props.insert(name.to_string(), value.clone());
    }
    Ok(())
}

/// `Some(None)` clears the copy; `None` means the argument was absent
fn set_copy(
    page: &mut UiPage,
    address: &NodeAddress,
    value: Option<Option<&str>>,
) -> Result<(), PatchError> {
    let value = value.ok_or(PatchError::MissingArgument("value"))?;
    let component = component_mut(page, address, "setCopy")?;
    component.copy = value.map(str::to_string);
    Ok(())
}

/// An explicit `null` clears the variant. Without a name it cycles.
fn toggle_variant(
    page: &mut UiPage,
    address: &NodeAddress,
    requested: Option<Option<&str>>,
    ctx: &mut ApplyContext<'_>,
) -> Result<(), PatchError> {
    let component = component_mut(page, address, "toggleVariant")?;
    if requested == Some(None) {
        component.variant = None;
        return Ok(());
    }

    let variants = allowed_variants(ctx.registry, &component.component);
    let registry_backed = ctx
        .registry
        .and_then(|r| r.component(&component.component))
        .map_or(false, |definition| !definition.variants.is_empty());

    let next = match requested.flatten() {
        Some(variant) => {
            if !variants.iter().any(|v| v == variant) {
                if registry_backed {
                    return Err(PatchError::InvalidVariant {
                        variant: variant.to_string(),
                        component: component.component.clone(),
                        allowed: variants.join(", "),
                    });
                }
                ctx.warn(
                    DiagnosticCode::InvalidVariant,
                    format!(
                        "Variant '{}' is not a known variant of {}",
                        variant, component.component
                    ),
                );
            }
            variant.to_string()
        }
        None => {
            let current = component
                .variant
                .as_deref()
                .and_then(|current| variants.iter().position(|v| v == current));
            let index = current.map_or(0, |i| (i + 1) % variants.len());
            variants[index].clone()
        }
    };

    component.variant = Some(next);
    Ok(())
}

fn add_node(
    page: &mut UiPage,
    address: &NodeAddress,
    node: &UiNode,
    position: Option<Position>,
    ctx: &mut ApplyContext<'_>,
) -> Result<(), PatchError> {
    let mut node = node.clone();
    fill_missing_ids(&mut node);
    ensure_ids_are_new(page, &node)?;
    check_registry_for_insert(&node, ctx);

    let target_is_container = address.is_root() || node_mut(page, address)?.is_container();

    if target_is_container {
        let children = if address.is_root() {
            &mut page.children
        } else {
            node_mut(page, address)?
                .children_mut()
                .ok_or_else(|| PatchError::NotAContainer(address.to_string()))?
        };
        // Without a sibling reference, before/after have nothing to anchor to
        let index = match position {
            Some(Position::Start) => 0,
            Some(Position::End | Position::Before | Position::After) | None => children.len(),
        };
        children.insert(index, node);
        return Ok(());
    }

    let (parent, step) = address
        .split_last()
        .ok_or_else(|| PatchError::ParentNotFound(address.to_string()))?;
    let siblings = container_at_mut(page, &parent, &step.container)
        .ok_or_else(|| PatchError::ParentNotFound(address.to_string()))?;
    let index = match position {
        Some(Position::Before) => step.index,
        Some(Position::Start) => 0,
        Some(Position::End) => siblings.len(),
        Some(Position::After) | None => step.index + 1,
    };
    siblings.insert(index.min(siblings.len()), node);
    Ok(())
}

fn ensure_ids_are_new(page: &UiPage, node: &UiNode) -> Result<(), PatchError> {
    match subtree_ids(node).into_iter().find(|id| contains_id(page, id)) {
        Some(id) => Err(PatchError::DuplicateId(id.to_string())),
        None => Ok(()),
    }
}

fn check_registry_for_insert(node: &UiNode, ctx: &mut ApplyContext<'_>) {
    let (Some(registry), UiNode::Component(component)) = (ctx.registry, node) else {
        return;
    };

    match registry.component(&component.component) {
        None => ctx.warn(
            DiagnosticCode::UnknownComponent,
            format!("{} is not in the registry", component.component),
        ),
        Some(definition) => {
            let has_slots = component.slots.as_ref().map_or(false, |s| !s.is_empty());
            if definition.requires_subcomponents && !has_slots {
                ctx.warn(
                    DiagnosticCode::MissingSubcomponents,
                    format!("{} expects subcomponents but none were given", component.component),
                );
            }
        }
    }
}

/// Splice the node at `address` out of whichever list holds it
fn remove_node(page: &mut UiPage, address: &NodeAddress) -> Result<UiNode, PatchError> {
    let (parent, step) = address.split_last().ok_or(PatchError::CannotRemoveRoot)?;
    let siblings = container_at_mut(page, &parent, &step.container)
        .ok_or_else(|| PatchError::ParentNotFound(address.to_string()))?;
    if step.index >= siblings.len() {
        return Err(PatchError::NodeNotFound(address.to_string()));
    }
    Ok(siblings.remove(step.index))
}

fn move_node(
    page: &mut UiPage,
    address: &NodeAddress,
    to_parent_id: &str,
    position: Option<Position>,
) -> Result<(), PatchError> {
    if address.is_root() {
        return Err(PatchError::InvalidTarget {
            op: "moveNode",
            expected: "nodes below the root",
            actual: "the page root".to_string(),
        });
    }

    let destination = resolve(page, to_parent_id)
        .ok_or_else(|| PatchError::ParentNotFound(to_parent_id.to_string()))?;
    let destination_id = if destination.is_root() {
        page.id.clone()
    } else {
        let node = node_at(page, &destination)
            .ok_or_else(|| PatchError::ParentNotFound(to_parent_id.to_string()))?;
        if !node.is_container() {
            return Err(PatchError::NotAContainer(node.label()));
        }
        node.id().to_string()
    };

    if destination.is_within(address) {
        return Err(PatchError::CycleDetected(address.to_string()));
    }

    let moved = remove_node(page, address)?;

    // Indices may have shifted, so find the destination again by its real id
    let destination = resolve_exact_id(page, &destination_id)
        .ok_or_else(|| PatchError::ParentNotFound(destination_id.clone()))?;
    let children = if destination.is_root() {
        &mut page.children
    } else {
        node_mut(page, &destination)?
            .children_mut()
            .ok_or_else(|| PatchError::NotAContainer(destination_id.clone()))?
    };

    let index = match position {
        Some(Position::Start | Position::Before) => 0,
        Some(Position::End | Position::After) | None => children.len(),
    };
    children.insert(index, moved);
    Ok(())
}

fn wrap_with(page: &mut UiPage, address: &NodeAddress, wrapper: &UiNode) -> Result<(), PatchError> {
    if !wrapper.is_container() {
        return Err(PatchError::InvalidArgument(
            "wrapper must be a section or grid".to_string(),
        ));
    }

    let (parent, step) = address.split_last().ok_or(PatchError::InvalidTarget {
        op: "wrapWith",
        expected: "nodes below the root",
        actual: "the page root".to_string(),
    })?;

    let mut wrapper = wrapper.clone();
    if wrapper.id().is_empty() {
        wrapper.set_id(canopy_document::new_id());
    }
    if contains_id(page, wrapper.id()) {
        return Err(PatchError::DuplicateId(wrapper.id().to_string()));
    }

    let siblings = container_at_mut(page, &parent, &step.container)
        .ok_or_else(|| PatchError::ParentNotFound(address.to_string()))?;
    if step.index >= siblings.len() {
        return Err(PatchError::NodeNotFound(address.to_string()));
    }

    let target = siblings.remove(step.index);
    if let Some(children) = wrapper.children_mut() {
        children.clear();
        children.push(target);
    }
    siblings.insert(step.index, wrapper);
    Ok(())
}

fn reorder(page: &mut UiPage, address: &NodeAddress, direction: Direction) -> Result<(), PatchError> {
    let (parent, step) = address.split_last().ok_or(PatchError::InvalidTarget {
        op: "reorder",
        expected: "nodes below the root",
        actual: "the page root".to_string(),
    })?;
    let siblings = container_at_mut(page, &parent, &step.container)
        .ok_or_else(|| PatchError::ParentNotFound(address.to_string()))?;

    let index = step.index;
    let other = match direction {
        Direction::Up if index == 0 => {
            return Err(PatchError::InvalidPosition("already the first sibling".to_string()))
        }
        Direction::Up => index - 1,
        Direction::Down if index + 1 >= siblings.len() => {
            return Err(PatchError::InvalidPosition("already the last sibling".to_string()))
        }
        Direction::Down => index + 1,
    };
    siblings.swap(index, other);
    Ok(())
}

fn rename(page: &mut UiPage, address: &NodeAddress, name: &str) -> Result<(), PatchError> {
    if address.is_root() {
        page.title = name.to_string();
        return Ok(());
    }
    node_mut(page, address)?.set_name(name);
    Ok(())
}

fn set_token(
    page: &mut UiPage,
    address: &NodeAddress,
    path: &str,
    value: &Value,
) -> Result<(), PatchError> {
    let segments = token_segments(path)?;
    if address.is_root() {
        return Err(PatchError::InvalidTarget {
            op: "setToken",
            expected: "nodes with layout",
            actual: "the page root".to_string(),
        });
    }

    let layout = node_mut(page, address)?.layout_mut();
    if value.is_null() {
        if let Some(map) = layout.as_mut() {
            remove_nested(map, &segments);
            if map.is_empty() {
                *layout = None;
            }
        }
    } else {
        set_nested(layout.get_or_insert_with(Map::new), &segments, value.clone());
    }
    Ok(())
}

fn set_nested(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                set_nested(inner, rest, value);
            }
        }
    }
}

/// Remove the leaf and prune objects left empty on the way back up
fn remove_nested(map: &mut Map<String, Value>, segments: &[&str]) {
    match segments {
        [] => {}
        [last] => {
            map.remove(*last);
        }
        [head, rest @ ..] => {
            let now_empty = match map.get_mut(*head) {
                Some(Value::Object(inner)) => {
                    remove_nested(inner, rest);
                    inner.is_empty()
                }
                _ => false,
            };
            if now_empty {
                map.remove(*head);
            }
        }
    }
}

/// Value at a nested layout path, if any
pub(crate) fn get_nested<'a>(map: &'a Map<String, Value>, segments: &[&str]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut value = map.get(*first)?;
    for segment in rest {
        value = value.as_object()?.get(*segment)?;
    }
    Some(value)
}

fn set_binding(page: &mut UiPage, address: &NodeAddress, binding: &Binding) -> Result<(), PatchError> {
    if binding.prop.is_empty() {
        return Err(PatchError::MissingArgument("binding.prop"));
    }
    let component = component_mut(page, address, "setBinding")?;
    let bindings = component.bind.get_or_insert_with(Vec::new);
    match bindings.iter_mut().find(|b| b.prop == binding.prop) {
        Some(existing) => *existing = binding.clone(),
        None => bindings.push(binding.clone()),
    }
    Ok(())
}

fn set_data_source(page: &mut UiPage, data_source: &DataSource) {
    let sources = page.data_sources.get_or_insert_with(Vec::new);
    match sources.iter_mut().find(|s| s.id == data_source.id) {
        Some(existing) => *existing = data_source.clone(),
        None => sources.push(data_source.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_token_set_and_prune() {
        let mut map = Map::new();
        set_nested(&mut map, &["spacing", "gap"], Value::from("md"));
        assert_eq!(get_nested(&map, &["spacing", "gap"]), Some(&Value::from("md")));

        remove_nested(&mut map, &["spacing", "gap"]);
        assert!(map.is_empty());
    }

    #[test]
    fn test_set_nested_replaces_scalar_with_object() {
        let mut map = Map::new();
        map.insert("spacing".to_string(), Value::from(4));
        set_nested(&mut map, &["spacing", "gap"], Value::from(8));
        assert_eq!(map["spacing"]["gap"], 8);
    }
}
