//! # Patches
//!
//! Declarative edit instructions targeting one node by id.
//!
//! A patch carries no reference to the page it was built for, so it can
//! be replayed against any structurally compatible page. On the wire a
//! patch is `{ "targetId", "op", "args" }`; in Rust the operation is the
//! closed [`PatchOp`] enum, so every match over it is exhaustive.

use crate::errors::{PatchDecodeError, PatchError};
use canopy_document::{Binding, DataSource, UiNode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// Wire names of every supported operation, in declaration order
pub const OPERATION_NAMES: [&str; 12] = [
    "setProp",
    "setCopy",
    "toggleVariant",
    "addNode",
    "removeNode",
    "moveNode",
    "wrapWith",
    "reorder",
    "rename",
    "setToken",
    "setBinding",
    "setDataSource",
];

pub const PROPS_PREFIX: &str = "props.";
pub const LAYOUT_PREFIX: &str = "layout.";

/// Insertion position relative to a container or a sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Start,
    End,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// The operation of a patch and its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "camelCase")]
pub enum PatchOp {
    /// Set `props[name]` where `path` is `props.<name>`. `null` removes the prop.
    SetProp { path: String, value: Value },

    /// Replace the primary text of a component. `null` clears it; an
    /// absent value is rejected.
    SetCopy {
        #[serde(
            default,
            deserialize_with = "explicit_null",
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<Option<String>>,
    },

    /// Switch to `variant`, or cycle to the next allowed variant when absent.
    /// `null` clears the variant.
    ToggleVariant {
        #[serde(
            default,
            deserialize_with = "explicit_null",
            skip_serializing_if = "Option::is_none"
        )]
        variant: Option<Option<String>>,
    },

    AddNode {
        node: UiNode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },

    RemoveNode,

    MoveNode {
        #[serde(rename = "toParentId")]
        to_parent_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },

    /// Replace the target with `wrapper`, whose only child becomes the target
    WrapWith { wrapper: UiNode },

    /// Swap with the previous (`up`) or next (`down`) sibling
    Reorder { direction: Direction },

    Rename { name: String },

    /// Set a design-token override where `path` is `layout.<token>[.<sub>...]`
    SetToken { path: String, value: Value },

    /// Upsert into the component's `bind` list, keyed by `binding.prop`
    SetBinding { binding: Binding },

    /// Upsert into the page's `dataSources`, keyed by id
    SetDataSource {
        #[serde(rename = "dataSource")]
        data_source: DataSource,
    },
}

impl PatchOp {
    pub fn name(&self) -> &'static str {
        match self {
            PatchOp::SetProp { .. } => "setProp",
            PatchOp::SetCopy { .. } => "setCopy",
            PatchOp::ToggleVariant { .. } => "toggleVariant",
            PatchOp::AddNode { .. } => "addNode",
            PatchOp::RemoveNode => "removeNode",
            PatchOp::MoveNode { .. } => "moveNode",
            PatchOp::WrapWith { .. } => "wrapWith",
            PatchOp::Reorder { .. } => "reorder",
            PatchOp::Rename { .. } => "rename",
            PatchOp::SetToken { .. } => "setToken",
            PatchOp::SetBinding { .. } => "setBinding",
            PatchOp::SetDataSource { .. } => "setDataSource",
        }
    }

    /// Ops that change tree structure rather than fields of one node
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PatchOp::AddNode { .. }
                | PatchOp::RemoveNode
                | PatchOp::MoveNode { .. }
                | PatchOp::WrapWith { .. }
                | PatchOp::Reorder { .. }
        )
    }
}

/// A single declarative mutation targeting one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatchEnvelope", into = "PatchEnvelope")]
pub struct Patch {
    pub target_id: String,
    pub op: PatchOp,
}

impl Patch {
    pub fn new(target_id: impl Into<String>, op: PatchOp) -> Self {
        Self {
            target_id: target_id.into(),
            op,
        }
    }

    pub fn set_prop(target_id: impl Into<String>, name: &str, value: impl Into<Value>) -> Self {
        Self::new(
            target_id,
            PatchOp::SetProp {
                path: format!("{}{}", PROPS_PREFIX, name),
                value: value.into(),
            },
        )
    }

    pub fn set_copy(target_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            target_id,
            PatchOp::SetCopy {
                value: Some(Some(value.into())),
            },
        )
    }

    pub fn clear_copy(target_id: impl Into<String>) -> Self {
        Self::new(target_id, PatchOp::SetCopy { value: Some(None) })
    }

    /// `None` cycles to the next allowed variant
    pub fn toggle_variant(target_id: impl Into<String>, variant: Option<String>) -> Self {
        Self::new(
            target_id,
            PatchOp::ToggleVariant {
                variant: variant.map(Some),
            },
        )
    }

    pub fn clear_variant(target_id: impl Into<String>) -> Self {
        Self::new(target_id, PatchOp::ToggleVariant { variant: Some(None) })
    }

    pub fn add_node(target_id: impl Into<String>, node: UiNode, position: Option<Position>) -> Self {
        Self::new(target_id, PatchOp::AddNode { node, position })
    }

    pub fn remove_node(target_id: impl Into<String>) -> Self {
        Self::new(target_id, PatchOp::RemoveNode)
    }

    pub fn move_node(
        target_id: impl Into<String>,
        to_parent_id: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Self::new(
            target_id,
            PatchOp::MoveNode {
                to_parent_id: to_parent_id.into(),
                position,
            },
        )
    }

    pub fn wrap_with(target_id: impl Into<String>, wrapper: UiNode) -> Self {
        Self::new(target_id, PatchOp::WrapWith { wrapper })
    }

    pub fn reorder(target_id: impl Into<String>, direction: Direction) -> Self {
        Self::new(target_id, PatchOp::Reorder { direction })
    }

    pub fn rename(target_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(target_id, PatchOp::Rename { name: name.into() })
    }

    pub fn set_token(target_id: impl Into<String>, token: &str, value: impl Into<Value>) -> Self {
        Self::new(
            target_id,
            PatchOp::SetToken {
                path: format!("{}{}", LAYOUT_PREFIX, token),
                value: value.into(),
            },
        )
    }

    pub fn set_binding(target_id: impl Into<String>, binding: Binding) -> Self {
        Self::new(target_id, PatchOp::SetBinding { binding })
    }

    pub fn set_data_source(target_id: impl Into<String>, data_source: DataSource) -> Self {
        Self::new(target_id, PatchOp::SetDataSource { data_source })
    }

    /// Structural shape check, independent of any page
    pub fn validate(&self) -> Result<(), PatchError> {
        if self.target_id.is_empty() {
            return Err(PatchError::MissingArgument("targetId"));
        }

        match &self.op {
            PatchOp::SetProp { path, .. } => {
                field_name(path, PROPS_PREFIX)?;
            }
            PatchOp::SetToken { path, .. } => {
                token_segments(path)?;
            }
            PatchOp::SetCopy { value } => {
                if value.is_none() {
                    return Err(PatchError::MissingArgument("value"));
                }
            }
            PatchOp::ToggleVariant { variant } => {
                if variant.as_ref().and_then(Option::as_deref) == Some("") {
                    return Err(PatchError::InvalidArgument("variant must not be empty".to_string()));
                }
            }
            PatchOp::AddNode { node, .. } => {
                if let UiNode::Component(component) = node {
                    if component.component.is_empty() {
                        return Err(PatchError::InvalidArgument(
                            "node.component must name a component type".to_string(),
                        ));
                    }
                }
            }
            PatchOp::MoveNode { to_parent_id, .. } => {
                if to_parent_id.is_empty() {
                    return Err(PatchError::MissingArgument("toParentId"));
                }
            }
            PatchOp::WrapWith { wrapper } => {
                if !wrapper.is_container() {
                    return Err(PatchError::InvalidArgument(
                        "wrapper must be a section or grid".to_string(),
                    ));
                }
            }
            PatchOp::SetBinding { binding } => {
                if binding.prop.is_empty() {
                    return Err(PatchError::MissingArgument("binding.prop"));
                }
            }
            PatchOp::SetDataSource { data_source } => {
                if data_source.id.is_empty() {
                    return Err(PatchError::MissingArgument("dataSource.id"));
                }
            }
            PatchOp::RemoveNode | PatchOp::Reorder { .. } | PatchOp::Rename { .. } => {}
        }

        Ok(())
    }
}

/// Keeps an explicit `null` (`Some(None)`) apart from an absent field (`None`)
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `props.<name>` → `<name>`
pub(crate) fn field_name<'a>(path: &'a str, prefix: &'static str) -> Result<&'a str, PatchError> {
    match path.strip_prefix(prefix) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(PatchError::InvalidPath {
            path: path.to_string(),
            expected: prefix,
        }),
    }
}

/// `layout.spacing.gap` → `["spacing", "gap"]`
pub(crate) fn token_segments(path: &str) -> Result<Vec<&str>, PatchError> {
    let rest = field_name(path, LAYOUT_PREFIX)?;
    let segments: Vec<&str> = rest.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(PatchError::InvalidPath {
            path: path.to_string(),
            expected: LAYOUT_PREFIX,
        });
    }
    Ok(segments)
}

/// Untyped wire form of a patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchEnvelope {
    pub target_id: String,
    pub op: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub args: Value,
}

impl TryFrom<PatchEnvelope> for Patch {
    type Error = PatchDecodeError;

    fn try_from(envelope: PatchEnvelope) -> Result<Self, Self::Error> {
        if !OPERATION_NAMES.contains(&envelope.op.as_str()) {
            return Err(PatchDecodeError::UnknownOperation(envelope.op));
        }

        let tagged = match (envelope.op.as_str(), envelope.args) {
            ("removeNode", _) => json!({ "op": envelope.op }),
            (_, Value::Null) => json!({ "op": envelope.op, "args": Map::new() }),
            (_, args) => json!({ "op": envelope.op, "args": args }),
        };

        let op: PatchOp =
            serde_json::from_value(tagged).map_err(|source| PatchDecodeError::InvalidArgs {
                op: envelope.op.clone(),
                source,
            })?;

        Ok(Patch {
            target_id: envelope.target_id,
            op,
        })
    }
}

impl From<Patch> for PatchEnvelope {
    fn from(patch: Patch) -> Self {
        let op = patch.op.name().to_string();
        let args = match serde_json::to_value(&patch.op) {
            Ok(Value::Object(mut tagged)) => tagged.remove("args").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        PatchEnvelope {
            target_id: patch.target_id,
            op,
            args,
        }
    }
}
