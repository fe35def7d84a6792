//! # Page Tree
//!
//! The whole document: an ordered list of root sections.
//!
//! ## Structural invariants
//!
//! 1. A section's children are columns
//! 2. A column's children are widgets
//! 3. Only container-like widgets have children, and those children are columns
//! 4. Every id is unique across the tree
//!
//! Root nodes are sections. Container-likeness is registry metadata, so the
//! checks here take a [`WidgetCatalog`].

use crate::node::{Node, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Widget type metadata the model needs for structural checks
pub trait WidgetCatalog {
    /// Whether widgets of this type may host column children
    fn is_container(&self, widget_type: &str) -> bool;
}

/// Whether `node` may host column children
pub fn is_container_like(node: &Node, catalog: &impl WidgetCatalog) -> bool {
    match &node.kind {
        NodeKind::Widget(widget_type) => catalog.is_container(widget_type),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTree {
    roots: Vec<Node>,
}

impl PageTree {
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    pub fn from_roots(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn roots_mut(&mut self) -> &mut Vec<Node> {
        &mut self.roots
    }

    pub fn into_roots(self) -> Vec<Node> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }

    /// First match in depth-first order; ids are unique so this is exact lookup
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.roots.iter_mut().find_map(|root| root.find_mut(id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Parent of the node with `id`; `None` for roots and missing ids
    pub fn parent_of(&self, id: &NodeId) -> Option<&Node> {
        self.iter()
            .find(|node| node.children.iter().any(|child| &child.id == id))
    }

    /// Ids from the root down to (and including) `id`
    pub fn path_to(&self, id: &NodeId) -> Option<Vec<&NodeId>> {
        fn walk<'a>(node: &'a Node, id: &NodeId, path: &mut Vec<&'a NodeId>) -> bool {
            path.push(&node.id);
            if &node.id == id || node.children.iter().any(|child| walk(child, id, path)) {
                return true;
            }
            path.pop();
            false
        }

        let mut path = Vec::new();
        self.roots
            .iter()
            .any(|root| walk(root, id, &mut path))
            .then_some(path)
    }

    /// Whether `descendant` lies in the subtree rooted at `ancestor` (inclusive)
    pub fn is_within(&self, descendant: &NodeId, ancestor: &NodeId) -> bool {
        self.find(ancestor)
            .map(|node| node.find(descendant).is_some())
            .unwrap_or(false)
    }

    /// Pre-order depth-first traversal of every node
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn ids(&self) -> Vec<&NodeId> {
        self.iter().map(|node| &node.id).collect()
    }

    /// Every structural invariant violation, in traversal order
    pub fn violations(&self, catalog: &impl WidgetCatalog) -> Vec<StructureViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for root in &self.roots {
            if !root.is_section() {
                violations.push(StructureViolation::MisplacedChild {
                    parent: None,
                    child: root.id.clone(),
                    found: root.kind.tag(),
                    expected: "section",
                });
            }
            check_node(root, catalog, &mut seen, &mut violations);
        }

        violations
    }

    pub fn validate(&self, catalog: &impl WidgetCatalog) -> Result<(), StructureViolation> {
        match self.violations(catalog).into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

fn check_node(
    node: &Node,
    catalog: &impl WidgetCatalog,
    seen: &mut HashSet<NodeId>,
    violations: &mut Vec<StructureViolation>,
) {
    if node.id.is_empty() {
        violations.push(StructureViolation::EmptyId);
    } else if !seen.insert(node.id.clone()) {
        violations.push(StructureViolation::DuplicateId(node.id.clone()));
    }

    let expected = match &node.kind {
        NodeKind::Section => Some("column"),
        NodeKind::Column => Some("widget"),
        NodeKind::Widget(widget_type) if catalog.is_container(widget_type) => Some("column"),
        NodeKind::Widget(_) => None,
    };

    for child in &node.children {
        match expected {
            Some(tag) if child.kind.tag() == tag => {}
            Some(tag) => violations.push(StructureViolation::MisplacedChild {
                parent: Some(node.id.clone()),
                child: child.id.clone(),
                found: child.kind.tag(),
                expected: tag,
            }),
            None => violations.push(StructureViolation::LeafWithChildren(node.id.clone())),
        }
        check_node(child, catalog, seen, violations);
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureViolation {
    #[error("{found} `{child}` {} (expected {expected})", placement(.parent))]
    MisplacedChild {
        parent: Option<NodeId>,
        child: NodeId,
        found: &'static str,
        expected: &'static str,
    },

    #[error("non-container widget `{0}` has children")]
    LeafWithChildren(NodeId),

    #[error("duplicate id `{0}`")]
    DuplicateId(NodeId),

    #[error("node without id")]
    EmptyId,
}

fn placement(parent: &Option<NodeId>) -> String {
    match parent {
        Some(parent) => format!("under `{}`", parent),
        None => "at root".to_string(),
    }
}

pub struct TreeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    struct Catalog;

    impl WidgetCatalog for Catalog {
        fn is_container(&self, widget_type: &str) -> bool {
            widget_type == "inner-section"
        }
    }

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn sample() -> PageTree {
        PageTree::from_roots(vec![Node::section(id("s1"), Settings::default()).with_child(
            Node::column(id("c1"), Settings::default())
                .with_child(Node::widget(id("h1"), "heading", Settings::default()))
                .with_child(
                    Node::widget(id("inner"), "inner-section", Settings::default()).with_child(
                        Node::column(id("c2"), Settings::default()).with_child(Node::widget(
                            id("t1"),
                            "text",
                            Settings::default(),
                        )),
                    ),
                ),
        )])
    }

    #[test]
    fn test_preorder_iteration() {
        let tree = sample();
        let ids: Vec<&str> = tree.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "c1", "h1", "inner", "c2", "t1"]);
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn test_queries() {
        let tree = sample();
        assert_eq!(tree.find(&id("t1")).unwrap().widget_type(), Some("text"));
        assert_eq!(tree.parent_of(&id("c2")).unwrap().id, "inner");
        assert!(tree.parent_of(&id("s1")).is_none());
        assert!(tree.is_within(&id("t1"), &id("inner")));
        assert!(!tree.is_within(&id("h1"), &id("inner")));

        let path: Vec<&str> = tree
            .path_to(&id("t1"))
            .unwrap()
            .into_iter()
            .map(NodeId::as_str)
            .collect();
        assert_eq!(path, vec!["s1", "c1", "inner", "c2", "t1"]);
        assert!(tree.path_to(&id("nope")).is_none());
    }

    #[test]
    fn test_valid_tree_passes() {
        assert!(sample().validate(&Catalog).is_ok());
    }

    #[test]
    fn test_rejects_widget_under_section() {
        let tree = PageTree::from_roots(vec![Node::section(id("s1"), Settings::default())
            .with_child(Node::widget(id("w"), "heading", Settings::default()))]);

        assert_eq!(
            tree.validate(&Catalog),
            Err(StructureViolation::MisplacedChild {
                parent: Some(id("s1")),
                child: id("w"),
                found: "widget",
                expected: "column",
            })
        );
    }

    #[test]
    fn test_rejects_children_on_leaf_widget_and_duplicates() {
        let tree = PageTree::from_roots(vec![Node::section(id("s1"), Settings::default())
            .with_child(Node::column(id("c1"), Settings::default()).with_child(
                Node::widget(id("h"), "heading", Settings::default())
                    .with_child(Node::column(id("c1"), Settings::default())),
            ))]);

        let violations = tree.violations(&Catalog);
        assert!(violations.contains(&StructureViolation::LeafWithChildren(id("h"))));
        assert!(violations.contains(&StructureViolation::DuplicateId(id("c1"))));
    }

    #[test]
    fn test_violation_messages() {
        let at_root = StructureViolation::MisplacedChild {
            parent: None,
            child: id("c9"),
            found: "column",
            expected: "section",
        };
        assert_eq!(at_root.to_string(), "column `c9` at root (expected section)");

        let nested = StructureViolation::MisplacedChild {
            parent: Some(id("s1")),
            child: id("w"),
            found: "widget",
            expected: "column",
        };
        assert_eq!(nested.to_string(), "widget `w` under `s1` (expected column)");

        let err: Box<dyn std::error::Error> = Box::new(StructureViolation::EmptyId);
        assert_eq!(err.to_string(), "node without id");
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&PageTree::new()).unwrap();
        assert_eq!(json, "[]");
    }
}
