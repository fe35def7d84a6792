//! Drag and drop between the widget palette, the canvas and the tree

use crate::mutations::accepts_widgets;
use pagecraft_model::{NodeId, NodeKind, PageTree};
use pagecraft_registry::Registry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a drop event carries
///
/// The palette sets either a bare widget type token (`heading`) or
/// `{"widgetType": "heading"}`; dragging a node already on the canvas sets
/// `{"nodeId": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DragPayload {
    NewWidget {
        #[serde(rename = "widgetType")]
        widget_type: String,
    },
    ExistingNode {
        #[serde(rename = "nodeId")]
        node_id: NodeId,
    },
}

impl DragPayload {
    pub fn new_widget(widget_type: impl Into<String>) -> Self {
        DragPayload::NewWidget {
            widget_type: widget_type.into(),
        }
    }

    pub fn existing(node_id: NodeId) -> Self {
        DragPayload::ExistingNode { node_id }
    }

    /// Parse drag data. `None` for empty or unreadable payloads.
    pub fn parse(data: &str) -> Option<Self> {
        let data = data.trim();
        if data.is_empty() {
            return None;
        }

        if data.starts_with('{') {
            return match serde_json::from_str(data) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    debug!(error = %e, "Unreadable drag payload");
                    None
                }
            };
        }

        if data.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self::new_widget(data))
    }

    /// Drag data for this payload, the inverse of [`DragPayload::parse`]
    pub fn to_data(&self) -> String {
        match self {
            DragPayload::NewWidget { widget_type } => widget_type.clone(),
            DragPayload::ExistingNode { node_id } => {
                serde_json::json!({ "nodeId": node_id }).to_string()
            }
        }
    }
}

/// Where dropped content goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    /// Column or container-like widget receiving the drop
    pub parent_id: NodeId,
    /// Insert position; `None` appends
    pub index: Option<usize>,
}

/// Resolve the node under the pointer to the container that receives a drop.
///
/// Columns and container-like widgets take the drop themselves. A leaf
/// widget forwards it to its column, right after itself. A section forwards
/// it to its first column. Anything else has no target.
pub fn resolve_drop_target(tree: &PageTree, registry: &Registry, hovered: &NodeId) -> Option<DropTarget> {
    let node = tree.find(hovered)?;

    if accepts_widgets(node, registry) {
        return Some(DropTarget {
            parent_id: node.id.clone(),
            index: None,
        });
    }

    match &node.kind {
        NodeKind::Section => node.children.first().map(|column| DropTarget {
            parent_id: column.id.clone(),
            index: None,
        }),
        NodeKind::Widget(_) => {
            let parent = tree.parent_of(hovered)?;
            let pos = parent.children.iter().position(|c| &c.id == hovered)?;
            Some(DropTarget {
                parent_id: parent.id.clone(),
                index: Some(pos + 1),
            })
        }
        NodeKind::Column => None,
    }
}
