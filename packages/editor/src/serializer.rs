//! # Document Serialization
//!
//! A page is stored as a JSON array of root nodes. Loading is total:
//!
//! 1. Input that parses as a JSON array is decoded node by node. Nodes that
//!    cannot be decoded are dropped, the rest are repaired until every
//!    structural invariant holds, and every node's settings are filled from
//!    registry defaults.
//! 2. Anything else is legacy content. The page gets a heading section titled
//!    with the page name and, when the legacy text says anything, a text
//!    section carrying it verbatim. The legacy string itself is never edited.

use pagecraft_model::visitor::walk_children_mut;
use pagecraft_model::{
    AdvancedSettings, IdGenerator, Node, NodeId, NodeKind, PageTree, VisitorMut, WidgetCatalog,
};
use pagecraft_registry::widgets::{HEADING, TEXT};
use pagecraft_registry::Registry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Legacy bodies that carry no content
const TRIVIAL_LEGACY: &[&str] = &["<p></p>", "<p><br></p>", "<p><br/></p>", "<br>", "<br/>", "<p>&nbsp;</p>"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSource {
    /// A serialized tree
    Tree,
    /// Free-form content from before the page builder
    Legacy,
    /// Nothing stored yet
    Empty,
}

/// One structural fix applied while loading
#[derive(Debug, Clone, PartialEq)]
pub enum Repair {
    /// Root array element that is not a node
    DroppedInvalidNode { index: usize },
    /// Column or widget at root level, wrapped in a new section
    WrappedInSection { node: NodeId },
    /// Widgets directly under a section or container, wrapped in a new column
    WrappedInColumn { parent: NodeId, widgets: usize },
    /// Node of the wrong kind replaced by its own children
    Spliced { parent: NodeId, node: NodeId },
    /// Children of a widget that cannot hold any
    DroppedLeafChildren { widget: NodeId, count: usize },
    /// Empty, repeated or out-of-range id replaced
    RegeneratedId { old: NodeId, new: NodeId },
    /// Ill-typed advanced setting reset to its default
    ResetSetting { node: NodeId, field: String },
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repair::DroppedInvalidNode { index } => write!(f, "dropped undecodable root #{}", index),
            Repair::WrappedInSection { node } => write!(f, "wrapped root `{}` in a section", node),
            Repair::WrappedInColumn { parent, widgets } => {
                write!(f, "wrapped {} stray widget(s) under `{}` in a column", widgets, parent)
            }
            Repair::Spliced { parent, node } => write!(f, "spliced misplaced `{}` into `{}`", node, parent),
            Repair::DroppedLeafChildren { widget, count } => {
                write!(f, "dropped {} child(ren) of leaf widget `{}`", count, widget)
            }
            Repair::RegeneratedId { old, new } => write!(f, "replaced id `{}` with `{}`", old, new),
            Repair::ResetSetting { node, field } => write!(f, "reset `{}` of `{}` to its default", field, node),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub tree: PageTree,
    pub source: DocumentSource,
    pub repairs: Vec<Repair>,
}

/// Encode a tree as its stored form
pub fn serialize(tree: &PageTree) -> Result<String, serde_json::Error> {
    serde_json::to_string(tree)
}

/// Decode stored content into a valid tree, falling back to a legacy wrapper
#[instrument(skip_all, fields(page = page_title, bytes = input.len()))]
pub fn deserialize(input: &str, page_title: &str, registry: &Registry, ids: &mut IdGenerator) -> LoadedDocument {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        info!("No stored content, starting from the page title");
        return LoadedDocument {
            tree: legacy_tree(page_title, None, registry, ids),
            source: DocumentSource::Empty,
            repairs: Vec::new(),
        };
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => {
            let (tree, repairs) = decode_tree(items, registry, ids);
            for repair in &repairs {
                warn!(%repair, "Repaired stored document");
            }
            debug!(nodes = tree.node_count(), repairs = repairs.len(), "Loaded serialized tree");
            LoadedDocument {
                tree,
                source: DocumentSource::Tree,
                repairs,
            }
        }
        _ => {
            info!("Stored content is not a tree, wrapping legacy content");
            LoadedDocument {
                tree: legacy_tree(page_title, Some(input), registry, ids),
                source: DocumentSource::Legacy,
                repairs: Vec::new(),
            }
        }
    }
}

/// Whether legacy content has nothing worth keeping
pub fn is_trivial_legacy(content: &str) -> bool {
    let content = content.trim();
    content.is_empty() || TRIVIAL_LEGACY.contains(&content)
}

fn legacy_tree(page_title: &str, legacy: Option<&str>, registry: &Registry, ids: &mut IdGenerator) -> PageTree {
    let mut heading = registry.new_widget(HEADING, ids);
    heading
        .settings
        .content
        .insert("title".to_string(), Value::String(page_title.to_string()));

    let mut title_section = registry.new_section(ids);
    title_section.children[0].children.push(heading);
    let mut roots = vec![title_section];

    if let Some(content) = legacy.filter(|c| !is_trivial_legacy(c)) {
        let mut text = registry.new_widget(TEXT, ids);
        text.settings
            .content
            .insert("text".to_string(), Value::String(content.to_string()));

        let mut body_section = registry.new_section(ids);
        body_section.children[0].children.push(text);
        roots.push(body_section);
    }

    PageTree::from_roots(roots)
}

fn decode_tree(items: Vec<Value>, registry: &Registry, ids: &mut IdGenerator) -> (PageTree, Vec<Repair>) {
    let mut repairs = Vec::new();
    let mut nodes = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        note_reset_settings(&item, &mut repairs);
        match serde_json::from_value::<Node>(item) {
            Ok(node) => nodes.push(node),
            Err(e) => {
                debug!(index, error = %e, "Undecodable root node");
                repairs.push(Repair::DroppedInvalidNode { index });
            }
        }
    }

    // wrappers created during repair must not reuse stored ids
    let raw = PageTree::from_roots(nodes);
    ids.observe(&raw);

    let mut repairer = Repairer {
        registry,
        ids,
        repairs: &mut repairs,
    };
    let roots = repairer.repair_roots(raw.into_roots());

    let mut tree = PageTree::from_roots(roots);
    Finalize {
        registry,
        ids,
        seen: HashSet::new(),
        repairs: &mut repairs,
    }
    .visit_tree_mut(&mut tree);

    (tree, repairs)
}

/// Record the advanced fields node decoding will fall back on
fn note_reset_settings(item: &Value, repairs: &mut Vec<Repair>) {
    let Some(node) = item.as_object() else {
        return;
    };

    if let Some(advanced) = node.get("settings").and_then(|s| s.get("advanced")) {
        let (_, reset) = AdvancedSettings::decode_lenient(advanced.clone());
        let id = NodeId::new(node.get("id").and_then(Value::as_str).unwrap_or_default());
        for field in reset {
            let field = if field.is_empty() {
                "advanced".to_string()
            } else {
                format!("advanced.{}", field)
            };
            warn!(node = %id, field = %field, "Reset malformed setting");
            repairs.push(Repair::ResetSetting { node: id.clone(), field });
        }
    }

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            note_reset_settings(child, repairs);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Columns,
    Widgets,
    Nothing,
}

struct Repairer<'a> {
    registry: &'a Registry,
    ids: &'a mut IdGenerator,
    repairs: &'a mut Vec<Repair>,
}

impl Repairer<'_> {
    fn repair_roots(&mut self, roots: Vec<Node>) -> Vec<Node> {
        let mut repaired = Vec::with_capacity(roots.len());

        for root in roots {
            match &root.kind {
                NodeKind::Section => repaired.push(self.repair_node(root)),
                NodeKind::Column => {
                    self.repairs.push(Repair::WrappedInSection { node: root.id.clone() });
                    let column = self.repair_node(root);
                    repaired.push(self.section().with_child(column));
                }
                NodeKind::Widget(_) => {
                    self.repairs.push(Repair::WrappedInSection { node: root.id.clone() });
                    let widget = self.repair_node(root);
                    let column = self.registry.new_column(self.ids, 100.0).with_child(widget);
                    repaired.push(self.section().with_child(column));
                }
            }
        }

        repaired
    }

    fn section(&mut self) -> Node {
        Node::section(self.ids.new_id(), self.registry.defaults_for_kind(&NodeKind::Section))
    }

    fn repair_node(&mut self, mut node: Node) -> Node {
        let expect = match &node.kind {
            NodeKind::Section => Expect::Columns,
            NodeKind::Column => Expect::Widgets,
            NodeKind::Widget(widget_type) if self.registry.is_container(widget_type) => Expect::Columns,
            NodeKind::Widget(_) => Expect::Nothing,
        };

        let children = std::mem::take(&mut node.children);
        node.children = self.repair_children(&node.id, children, expect);
        node
    }

    fn repair_children(&mut self, parent: &NodeId, children: Vec<Node>, expect: Expect) -> Vec<Node> {
        if expect == Expect::Nothing {
            if !children.is_empty() {
                self.repairs.push(Repair::DroppedLeafChildren {
                    widget: parent.clone(),
                    count: children.len(),
                });
            }
            return Vec::new();
        }

        let mut queue: VecDeque<Node> = children.into();
        let mut repaired = Vec::new();
        let mut strays: Vec<Node> = Vec::new();

        while let Some(child) = queue.pop_front() {
            let fits = match expect {
                Expect::Columns => child.is_column(),
                Expect::Widgets => child.is_widget(),
                Expect::Nothing => false,
            };

            if fits {
                self.flush_strays(parent, &mut strays, &mut repaired);
                repaired.push(self.repair_node(child));
            } else if expect == Expect::Columns && child.is_widget() {
                strays.push(self.repair_node(child));
            } else {
                // a container of the wrong kind: its children take its place
                self.repairs.push(Repair::Spliced {
                    parent: parent.clone(),
                    node: child.id.clone(),
                });
                for grandchild in child.children.into_iter().rev() {
                    queue.push_front(grandchild);
                }
            }
        }

        self.flush_strays(parent, &mut strays, &mut repaired);
        repaired
    }

    fn flush_strays(&mut self, parent: &NodeId, strays: &mut Vec<Node>, into: &mut Vec<Node>) {
        if strays.is_empty() {
            return;
        }
        self.repairs.push(Repair::WrappedInColumn {
            parent: parent.clone(),
            widgets: strays.len(),
        });
        let column = self
            .registry
            .new_column(self.ids, 100.0)
            .with_children(std::mem::take(strays));
        into.push(column);
    }
}

/// Fixes empty and repeated ids and fills settings from registry defaults
struct Finalize<'a> {
    registry: &'a Registry,
    ids: &'a mut IdGenerator,
    seen: HashSet<NodeId>,
    repairs: &'a mut Vec<Repair>,
}

impl VisitorMut for Finalize<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        if node.id.is_empty() || self.seen.contains(&node.id) || self.ids.is_out_of_range(&node.id) {
            let new = self.ids.new_id();
            self.repairs.push(Repair::RegeneratedId {
                old: std::mem::replace(&mut node.id, new.clone()),
                new,
            });
        }
        self.seen.insert(node.id.clone());

        node.settings = self.registry.normalize_settings(&node.kind, &node.settings);
        walk_children_mut(self, node);
    }
}
