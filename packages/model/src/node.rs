//! # Nodes
//!
//! A [`Node`] is one element of the page tree. Its wire form is
//!
//! ```json
//! { "id": "a1b2c3d4-5", "kind": "widget", "widgetType": "heading",
//!   "settings": { "content": {}, "style": {}, "advanced": {} },
//!   "children": [] }
//! ```
//!
//! Decoding is lenient: missing ids, settings or children decode to empty
//! values, and an unrecognised `kind` decodes as a widget so the registry's
//! fallback contract can render it. Structural repair of such input happens
//! when a document is loaded, not here.

use crate::settings::Settings;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique node identifier; the sole addressing key for selection and mutation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Closed set of node kinds. Widgets carry their registry type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Section,
    Column,
    Widget(String),
}

impl NodeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Column => "column",
            NodeKind::Widget(_) => "widget",
        }
    }

    pub fn widget_type(&self) -> Option<&str> {
        match self {
            NodeKind::Widget(widget_type) => Some(widget_type),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub settings: Settings,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, settings: Settings) -> Self {
        Self {
            id,
            kind,
            settings,
            children: Vec::new(),
        }
    }

    pub fn section(id: NodeId, settings: Settings) -> Self {
        Self::new(id, NodeKind::Section, settings)
    }

    pub fn column(id: NodeId, settings: Settings) -> Self {
        Self::new(id, NodeKind::Column, settings)
    }

    pub fn widget(id: NodeId, widget_type: impl Into<String>, settings: Settings) -> Self {
        Self::new(id, NodeKind::Widget(widget_type.into()), settings)
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, NodeKind::Section)
    }

    pub fn is_column(&self) -> bool {
        matches!(self.kind, NodeKind::Column)
    }

    pub fn is_widget(&self) -> bool {
        matches!(self.kind, NodeKind::Widget(_))
    }

    pub fn widget_type(&self) -> Option<&str> {
        self.kind.widget_type()
    }

    /// Depth-first search of this subtree (including `self`)
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Number of nodes in this subtree (including `self`)
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count = if self.is_widget() { 5 } else { 4 };
        let mut state = serializer.serialize_struct("Node", field_count)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("kind", self.kind.tag())?;
        if let NodeKind::Widget(widget_type) = &self.kind {
            state.serialize_field("widgetType", widget_type)?;
        }
        state.serialize_field("settings", &self.settings)?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(default)]
    id: NodeId,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    widget_type: Option<String>,
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    children: Vec<Node>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let kind = match raw.kind.as_str() {
            "section" => NodeKind::Section,
            "column" => NodeKind::Column,
            "widget" => NodeKind::Widget(raw.widget_type.unwrap_or_default()),
            other => NodeKind::Widget(raw.widget_type.unwrap_or_else(|| other.to_string())),
        };

        Node {
            id: raw.id,
            kind,
            settings: raw.settings,
            children: raw.children,
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawNode::deserialize(deserializer).map(Node::from)
    }
}
