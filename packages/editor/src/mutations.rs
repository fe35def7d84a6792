//! # Tree Mutations
//!
//! Every edit a user can make to a page, as pure functions from a tree to a
//! new tree. The input is never touched, so history is a list of snapshots
//! and re-rendering compares whole trees.
//!
//! ## Semantics
//!
//! ### Addressing misses
//! - A mutation whose target id is gone, or whose target cannot hold what is
//!   being placed, returns the input tree unchanged
//! - [`Mutation::apply`] reports the reason as a [`MutationMiss`]; the plain
//!   functions only log it
//!
//! ### Containers
//! - Widgets live in columns. Dropping a widget on a container-like widget
//!   places it in that widget's first column
//! - Columns live in sections or container-like widgets
//! - Sections are roots and are never moved under another node
//!
//! ### Ordering
//! - Sibling order is insertion order. Nothing is ever sorted

use pagecraft_model::visitor::walk_children_mut;
use pagecraft_model::{
    IdGenerator, Node, NodeId, NodeKind, PageTree, Settings, SettingsError, SettingsPath,
    VisitorMut, WidgetCatalog,
};
use pagecraft_registry::Registry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Semantic mutations (one per user action)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a section holding one empty column
    AddSection,

    /// Append a new widget with default settings to a column or container
    AddWidget {
        parent_id: NodeId,
        widget_type: String,
    },

    /// Replace a node's settings wholesale
    UpdateSettings { node_id: NodeId, settings: Settings },

    /// Write one settings field
    SetSetting {
        node_id: NodeId,
        path: SettingsPath,
        value: Value,
    },

    /// Remove a node and its subtree
    DeleteElement { node_id: NodeId },

    /// Insert a fresh-id deep copy right after the original
    DuplicateElement { node_id: NodeId },

    /// Move an existing node under a new parent at index
    MoveElement {
        node_id: NodeId,
        new_parent_id: NodeId,
        index: usize,
    },
}

/// Why a mutation left the tree unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationMiss {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("`{0}` cannot hold widgets")]
    NotAContainer(NodeId),

    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(String),

    #[error("Cannot move `{0}` into its own subtree")]
    MoveIntoOwnSubtree(NodeId),

    #[error("{kind} `{node}` cannot be placed under `{parent}`")]
    InvalidPlacement {
        node: NodeId,
        kind: &'static str,
        parent: NodeId,
    },

    #[error(transparent)]
    InvalidSetting(#[from] SettingsError),
}

/// Result of applying a [`Mutation`]
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub tree: PageTree,
    /// Root id of the node the mutation created, if any
    pub created: Option<NodeId>,
    pub miss: Option<MutationMiss>,
}

impl MutationOutcome {
    pub fn changed(&self) -> bool {
        self.miss.is_none()
    }
}

struct Applied {
    tree: PageTree,
    created: Option<NodeId>,
}

impl Applied {
    fn edited(tree: PageTree) -> Self {
        Self {
            tree,
            created: None,
        }
    }
}

type Step = Result<Applied, MutationMiss>;

impl Mutation {
    /// Apply to `tree`, producing a new tree. `tree` itself is never modified.
    pub fn apply(&self, tree: &PageTree, registry: &Registry, ids: &mut IdGenerator) -> MutationOutcome {
        let step = match self {
            Mutation::AddSection => Ok(insert_section(tree, registry, ids)),
            Mutation::AddWidget {
                parent_id,
                widget_type,
            } => insert_widget(tree, registry, ids, parent_id, widget_type),
            Mutation::UpdateSettings { node_id, settings } => {
                replace_settings(tree, registry, node_id, settings)
            }
            Mutation::SetSetting {
                node_id,
                path,
                value,
            } => assign_setting(tree, registry, node_id, path, value),
            Mutation::DeleteElement { node_id } => remove(tree, node_id),
            Mutation::DuplicateElement { node_id } => duplicate(tree, ids, node_id),
            Mutation::MoveElement {
                node_id,
                new_parent_id,
                index,
            } => relocate(tree, registry, ids, node_id, new_parent_id, *index),
        };

        match step {
            Ok(applied) => {
                debug_assert!(
                    tree.validate(registry).is_err() || applied.tree.validate(registry).is_ok(),
                    "{} broke a structural invariant: {:?}",
                    self.name(),
                    applied.tree.validate(registry)
                );
                debug!(
                    mutation = self.name(),
                    target = ?self.target(),
                    created = ?applied.created,
                    "Applied mutation"
                );
                MutationOutcome {
                    tree: applied.tree,
                    created: applied.created,
                    miss: None,
                }
            }
            Err(miss) => {
                debug!(mutation = self.name(), %miss, "Mutation missed, tree unchanged");
                MutationOutcome {
                    tree: tree.clone(),
                    created: None,
                    miss: Some(miss),
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddSection => "add_section",
            Mutation::AddWidget { .. } => "add_widget",
            Mutation::UpdateSettings { .. } => "update_settings",
            Mutation::SetSetting { .. } => "set_setting",
            Mutation::DeleteElement { .. } => "delete_element",
            Mutation::DuplicateElement { .. } => "duplicate_element",
            Mutation::MoveElement { .. } => "move_element",
        }
    }

    /// The existing node this mutation addresses
    pub fn target(&self) -> Option<&NodeId> {
        match self {
            Mutation::AddSection => None,
            Mutation::AddWidget { parent_id, .. } => Some(parent_id),
            Mutation::UpdateSettings { node_id, .. }
            | Mutation::SetSetting { node_id, .. }
            | Mutation::DeleteElement { node_id }
            | Mutation::DuplicateElement { node_id }
            | Mutation::MoveElement { node_id, .. } => Some(node_id),
        }
    }

    /// Human-readable history label
    pub fn describe(&self) -> String {
        match self {
            Mutation::AddSection => "Add section".to_string(),
            Mutation::AddWidget { widget_type, .. } => format!("Add {}", widget_type),
            Mutation::UpdateSettings { .. } => "Edit settings".to_string(),
            Mutation::SetSetting { path, .. } => format!("Set {}", path),
            Mutation::DeleteElement { .. } => "Delete element".to_string(),
            Mutation::DuplicateElement { .. } => "Duplicate element".to_string(),
            Mutation::MoveElement { .. } => "Move element".to_string(),
        }
    }
}

/// Append a new section with one empty column. Never misses.
pub fn add_section(tree: &PageTree, registry: &Registry, ids: &mut IdGenerator) -> PageTree {
    insert_section(tree, registry, ids).tree
}

/// Append a `widget_type` widget to the column or container `parent_id`.
///
/// Returns `tree` unchanged if `parent_id` is missing, is not a valid
/// container, or `widget_type` is not registered.
pub fn add_widget(
    tree: &PageTree,
    registry: &Registry,
    ids: &mut IdGenerator,
    parent_id: &NodeId,
    widget_type: &str,
) -> PageTree {
    settle(tree, "add_widget", insert_widget(tree, registry, ids, parent_id, widget_type))
}

/// Replace the settings of `id`, filling missing keys from registry defaults
pub fn update_settings(tree: &PageTree, registry: &Registry, id: &NodeId, settings: &Settings) -> PageTree {
    settle(tree, "update_settings", replace_settings(tree, registry, id, settings))
}

/// Write `value` at `path` in the settings of `id`
pub fn set_setting(
    tree: &PageTree,
    registry: &Registry,
    id: &NodeId,
    path: &SettingsPath,
    value: Value,
) -> PageTree {
    settle(tree, "set_setting", assign_setting(tree, registry, id, path, &value))
}

/// Remove `id` and its whole subtree
pub fn delete_element(tree: &PageTree, id: &NodeId) -> PageTree {
    settle(tree, "delete_element", remove(tree, id))
}

/// Insert a copy of the subtree at `id` right after it, with fresh ids throughout
pub fn duplicate_element(tree: &PageTree, ids: &mut IdGenerator, id: &NodeId) -> PageTree {
    settle(tree, "duplicate_element", duplicate(tree, ids, id))
}

/// Move `node_id` under `new_parent_id` at `index` (clamped to the child count)
pub fn move_element(
    tree: &PageTree,
    registry: &Registry,
    ids: &mut IdGenerator,
    node_id: &NodeId,
    new_parent_id: &NodeId,
    index: usize,
) -> PageTree {
    settle(
        tree,
        "move_element",
        relocate(tree, registry, ids, node_id, new_parent_id, index),
    )
}

/// Whether a new widget dropped on `node` has somewhere to go
pub fn accepts_widgets(node: &Node, catalog: &impl WidgetCatalog) -> bool {
    match &node.kind {
        NodeKind::Column => true,
        NodeKind::Widget(widget_type) => catalog.is_container(widget_type),
        NodeKind::Section => false,
    }
}

fn accepts_child(parent: &Node, child: &NodeKind, catalog: &impl WidgetCatalog) -> bool {
    match child {
        NodeKind::Widget(_) => accepts_widgets(parent, catalog),
        NodeKind::Column => match &parent.kind {
            NodeKind::Section => true,
            NodeKind::Widget(widget_type) => catalog.is_container(widget_type),
            NodeKind::Column => false,
        },
        NodeKind::Section => false,
    }
}

fn settle(tree: &PageTree, mutation: &'static str, step: Step) -> PageTree {
    match step {
        Ok(applied) => applied.tree,
        Err(miss) => {
            debug!(mutation, %miss, "Mutation missed, tree unchanged");
            tree.clone()
        }
    }
}

fn insert_section(tree: &PageTree, registry: &Registry, ids: &mut IdGenerator) -> Applied {
    ids.observe(tree);
    let section = registry.new_section(ids);
    let created = section.id.clone();

    let mut next = tree.clone();
    next.roots_mut().push(section);

    Applied {
        tree: next,
        created: Some(created),
    }
}

fn insert_widget(
    tree: &PageTree,
    registry: &Registry,
    ids: &mut IdGenerator,
    parent_id: &NodeId,
    widget_type: &str,
) -> Step {
    if !registry.is_known(widget_type) {
        return Err(MutationMiss::UnknownWidgetType(widget_type.to_string()));
    }

    let parent = tree
        .find(parent_id)
        .ok_or_else(|| MutationMiss::NodeNotFound(parent_id.clone()))?;
    if !accepts_widgets(parent, registry) {
        return Err(MutationMiss::NotAContainer(parent_id.clone()));
    }

    ids.observe(tree);
    let widget = registry.new_widget(widget_type, ids);
    let created = widget.id.clone();

    let mut next = tree.clone();
    let host = next
        .find_mut(parent_id)
        .ok_or_else(|| MutationMiss::NodeNotFound(parent_id.clone()))?;
    widget_column(host, registry, ids).children.push(widget);

    Ok(Applied {
        tree: next,
        created: Some(created),
    })
}

/// The column that receives widgets dropped on `host`
fn widget_column<'a>(host: &'a mut Node, registry: &Registry, ids: &mut IdGenerator) -> &'a mut Node {
    if host.is_column() {
        return host;
    }
    if host.children.is_empty() {
        host.children.push(registry.new_column(ids, 100.0));
    }
    &mut host.children[0]
}

fn replace_settings(tree: &PageTree, registry: &Registry, id: &NodeId, settings: &Settings) -> Step {
    let mut next = tree.clone();
    let node = next
        .find_mut(id)
        .ok_or_else(|| MutationMiss::NodeNotFound(id.clone()))?;
    node.settings = registry.normalize_settings(&node.kind, settings);
    Ok(Applied::edited(next))
}

fn assign_setting(
    tree: &PageTree,
    registry: &Registry,
    id: &NodeId,
    path: &SettingsPath,
    value: &Value,
) -> Step {
    let mut next = tree.clone();
    let node = next
        .find_mut(id)
        .ok_or_else(|| MutationMiss::NodeNotFound(id.clone()))?;
    let edited = node.settings.with_value(path, value.clone())?;
    node.settings = registry.normalize_settings(&node.kind, &edited);
    Ok(Applied::edited(next))
}

fn remove(tree: &PageTree, id: &NodeId) -> Step {
    let mut next = tree.clone();
    take_node(next.roots_mut(), id).ok_or_else(|| MutationMiss::NodeNotFound(id.clone()))?;
    Ok(Applied::edited(next))
}

fn duplicate(tree: &PageTree, ids: &mut IdGenerator, id: &NodeId) -> Step {
    ids.observe(tree);

    let mut next = tree.clone();
    let (siblings, pos) =
        siblings_of(next.roots_mut(), id).ok_or_else(|| MutationMiss::NodeNotFound(id.clone()))?;

    let mut copy = siblings[pos].clone();
    Reidentify { ids }.visit_node_mut(&mut copy);
    let created = copy.id.clone();
    siblings.insert(pos + 1, copy);

    Ok(Applied {
        tree: next,
        created: Some(created),
    })
}

fn relocate(
    tree: &PageTree,
    registry: &Registry,
    ids: &mut IdGenerator,
    node_id: &NodeId,
    new_parent_id: &NodeId,
    index: usize,
) -> Step {
    let node = tree
        .find(node_id)
        .ok_or_else(|| MutationMiss::NodeNotFound(node_id.clone()))?;
    let parent = tree
        .find(new_parent_id)
        .ok_or_else(|| MutationMiss::NodeNotFound(new_parent_id.clone()))?;

    if tree.is_within(new_parent_id, node_id) {
        return Err(MutationMiss::MoveIntoOwnSubtree(node_id.clone()));
    }
    if !accepts_child(parent, &node.kind, registry) {
        return Err(MutationMiss::InvalidPlacement {
            node: node_id.clone(),
            kind: node.kind.tag(),
            parent: new_parent_id.clone(),
        });
    }

    ids.observe(tree);
    let mut next = tree.clone();
    let moving =
        take_node(next.roots_mut(), node_id).ok_or_else(|| MutationMiss::NodeNotFound(node_id.clone()))?;
    let host = next
        .find_mut(new_parent_id)
        .ok_or_else(|| MutationMiss::NodeNotFound(new_parent_id.clone()))?;
    let host = if moving.is_widget() {
        widget_column(host, registry, ids)
    } else {
        host
    };

    let insert_index = index.min(host.children.len());
    host.children.insert(insert_index, moving);
    Ok(Applied::edited(next))
}

/// Detach the node with `target_id` from wherever it sits
fn take_node(nodes: &mut Vec<Node>, target_id: &NodeId) -> Option<Node> {
    if let Some(pos) = nodes.iter().position(|n| &n.id == target_id) {
        return Some(nodes.remove(pos));
    }

    for node in nodes {
        if let Some(removed) = take_node(&mut node.children, target_id) {
            return Some(removed);
        }
    }

    None
}

/// The sibling list holding `target_id`, and its position in it
fn siblings_of<'a>(nodes: &'a mut Vec<Node>, target_id: &NodeId) -> Option<(&'a mut Vec<Node>, usize)> {
    if let Some(pos) = nodes.iter().position(|n| &n.id == target_id) {
        return Some((nodes, pos));
    }

    nodes
        .iter_mut()
        .find_map(|node| siblings_of(&mut node.children, target_id))
}

/// Gives every node in a subtree a fresh id
struct Reidentify<'a> {
    ids: &'a mut IdGenerator,
}

impl VisitorMut for Reidentify<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        node.id = self.ids.new_id();
        walk_children_mut(self, node);
    }
}
