use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Component props, keyed by prop name
pub type Props = Map<String, Value>;

/// Design-token overrides, keyed by token name
pub type Layout = Map<String, Value>;

/// Named slot contents of a component
pub type Slots = BTreeMap<String, Vec<UiNode>>;

/// Root of a single editable page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPage {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<UiNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<Vec<DataSource>>,
}

impl UiPage {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            children: Vec::new(),
            data_sources: None,
        }
    }

    pub fn with_child(mut self, child: UiNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_sources
            .get_or_insert_with(Vec::new)
            .push(data_source);
        self
    }
}

/// Node in the page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UiNode {
    /// Registry-backed component (Button, Card, ...)
    Component(ComponentNode),
    /// Vertical layout container
    Section(ContainerNode),
    /// Grid layout container
    Grid(ContainerNode),
}

/// Discriminant of a [`UiNode`], handy for logging and matching on shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Component,
    Section,
    Grid,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Component => "component",
            NodeKind::Section => "section",
            NodeKind::Grid => "grid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ui_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Component type name, looked up in the registry
    pub component: String,
    #[serde(default)]
    pub props: Props,
    /// Primary text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Slots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<Vec<Binding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

/// Section and grid payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerNode {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ui_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<UiNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

/// Data binding of one component prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub prop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Binding {
    pub fn new(prop: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            source: None,
            path: None,
            extra: Map::new(),
        }
    }

    pub fn from_source(mut self, source: impl Into<String>, path: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self.path = Some(path.into());
        self
    }
}

/// Named external data source attached to a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

impl DataSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            config: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl UiNode {
    pub fn component(id: impl Into<String>, component: impl Into<String>) -> Self {
        UiNode::Component(ComponentNode {
            id: id.into(),
            data_ui_id: None,
            name: None,
            component: component.into(),
            props: Props::new(),
            copy: None,
            variant: None,
            slots: None,
            bind: None,
            layout: None,
        })
    }

    pub fn section(id: impl Into<String>) -> Self {
        UiNode::Section(ContainerNode::new(id))
    }

    pub fn grid(id: impl Into<String>) -> Self {
        UiNode::Grid(ContainerNode::new(id))
    }

    pub fn with_children(mut self, nodes: Vec<UiNode>) -> Self {
        if let Some(children) = self.children_mut() {
            children.extend(nodes);
        }
        self
    }

    pub fn with_data_ui_id(mut self, data_ui_id: impl Into<String>) -> Self {
        let data_ui_id = Some(data_ui_id.into());
        match &mut self {
            UiNode::Component(c) => c.data_ui_id = data_ui_id,
            UiNode::Section(c) | UiNode::Grid(c) => c.data_ui_id = data_ui_id,
        }
        self
    }

    pub fn with_copy(mut self, copy: impl Into<String>) -> Self {
        if let UiNode::Component(c) = &mut self {
            c.copy = Some(copy.into());
        }
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let UiNode::Component(c) = &mut self {
            c.props.insert(name.into(), value.into());
        }
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        if let UiNode::Component(c) = &mut self {
            c.variant = Some(variant.into());
        }
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, nodes: Vec<UiNode>) -> Self {
        if let UiNode::Component(c) = &mut self {
            c.slots.get_or_insert_with(Slots::new).insert(name.into(), nodes);
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            UiNode::Component(_) => NodeKind::Component,
            UiNode::Section(_) => NodeKind::Section,
            UiNode::Grid(_) => NodeKind::Grid,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            UiNode::Component(c) => &c.id,
            UiNode::Section(c) | UiNode::Grid(c) => &c.id,
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        match self {
            UiNode::Component(c) => c.id = id.into(),
            UiNode::Section(c) | UiNode::Grid(c) => c.id = id.into(),
        }
    }

    pub fn data_ui_id(&self) -> Option<&str> {
        match self {
            UiNode::Component(c) => c.data_ui_id.as_deref(),
            UiNode::Section(c) | UiNode::Grid(c) => c.data_ui_id.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            UiNode::Component(c) => c.name.as_deref(),
            UiNode::Section(c) | UiNode::Grid(c) => c.name.as_deref(),
        }
    }

    /// Set the display name. An empty name clears it.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = Some(name.into()).filter(|n| !n.is_empty());
        match self {
            UiNode::Component(c) => c.name = name,
            UiNode::Section(c) | UiNode::Grid(c) => c.name = name,
        }
    }

    /// Whether this node accepts `children`
    pub fn is_container(&self) -> bool {
        !matches!(self, UiNode::Component(_))
    }

    pub fn children(&self) -> Option<&Vec<UiNode>> {
        match self {
            UiNode::Component(_) => None,
            UiNode::Section(c) | UiNode::Grid(c) => Some(&c.children),
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<UiNode>> {
        match self {
            UiNode::Component(_) => None,
            UiNode::Section(c) | UiNode::Grid(c) => Some(&mut c.children),
        }
    }

    pub fn slots(&self) -> Option<&Slots> {
        match self {
            UiNode::Component(c) => c.slots.as_ref(),
            _ => None,
        }
    }

    pub fn slots_mut(&mut self) -> Option<&mut Slots> {
        match self {
            UiNode::Component(c) => c.slots.as_mut(),
            _ => None,
        }
    }

    pub fn layout(&self) -> Option<&Layout> {
        match self {
            UiNode::Component(c) => c.layout.as_ref(),
            UiNode::Section(c) | UiNode::Grid(c) => c.layout.as_ref(),
        }
    }

    pub fn layout_mut(&mut self) -> &mut Option<Layout> {
        match self {
            UiNode::Component(c) => &mut c.layout,
            UiNode::Section(c) | UiNode::Grid(c) => &mut c.layout,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            UiNode::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut ComponentNode> {
        match self {
            UiNode::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Short human-readable label used in logs and CLI output
    pub fn label(&self) -> String {
        match self {
            UiNode::Component(c) => format!("{}#{}", c.component, c.id),
            other => format!("{}#{}", other.kind().as_str(), other.id()),
        }
    }
}

impl ContainerNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_ui_id: None,
            name: None,
            children: Vec::new(),
            layout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_round_trips_through_tagged_json() {
        let json = r#"{
            "id": "page-1",
            "title": "Home",
            "children": [
                {
                    "type": "section",
                    "id": "hero",
                    "dataUiId": "hero-section",
                    "children": [
                        { "type": "component", "id": "button-1", "component": "Button", "copy": "Go", "props": { "size": "lg" } }
                    ]
                }
            ],
            "dataSources": [ { "id": "users", "type": "rest", "url": "/api/users" } ]
        }"#;

        let page: UiPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.children.len(), 1);

        let section = &page.children[0];
        assert_eq!(section.kind(), NodeKind::Section);
        assert_eq!(section.data_ui_id(), Some("hero-section"));

        let button = section.children().unwrap()[0].as_component().unwrap();
        assert_eq!(button.component, "Button");
        assert_eq!(button.copy.as_deref(), Some("Go"));
        assert_eq!(button.props["size"], "lg");

        let sources = page.data_sources.as_ref().unwrap();
        assert_eq!(sources[0].kind.as_deref(), Some("rest"));
        assert_eq!(sources[0].config["url"], "/api/users");

        let back = serde_json::to_value(&page).unwrap();
        assert_eq!(back["children"][0]["dataUiId"], "hero-section");
        assert_eq!(back["children"][0]["children"][0]["type"], "component");
    }

    #[test]
    fn test_component_is_not_a_container() {
        let button = UiNode::component("b", "Button");
        assert!(!button.is_container());
        assert!(button.children().is_none());
        assert!(UiNode::grid("g").is_container());
    }

    #[test]
    fn test_layout_is_created_on_first_write() {
        let mut node = UiNode::section("s");
        assert!(node.layout().is_none());
        node.layout_mut()
            .get_or_insert_with(Layout::new)
            .insert("gap".to_string(), Value::from("md"));
        assert_eq!(node.layout().unwrap()["gap"], "md");
    }

    #[test]
    fn test_empty_name_clears() {
        let mut node = UiNode::component("b", "Button");
        node.set_name("Primary");
        assert_eq!(node.name(), Some("Primary"));
        node.set_name("");
        assert_eq!(node.name(), None);
    }
}
