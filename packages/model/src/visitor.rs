use crate::node::{Node, NodeKind};
use crate::tree::PageTree;

/// Visitor pattern for traversing page trees immutably
///
/// Default implementations walk the entire tree. Override specific `visit_*`
/// methods to act on nodes of one kind.
pub trait Visitor: Sized {
    fn visit_tree(&mut self, tree: &PageTree) {
        walk_tree(self, tree);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_section(&mut self, section: &Node) {
        walk_children(self, section);
    }

    fn visit_column(&mut self, column: &Node) {
        walk_children(self, column);
    }

    fn visit_widget(&mut self, widget: &Node, _widget_type: &str) {
        walk_children(self, widget);
    }
}

/// Mutable visitor pattern for transforming nodes in place
///
/// Used on private copies only; shared trees are never edited in place.
pub trait VisitorMut: Sized {
    fn visit_tree_mut(&mut self, tree: &mut PageTree) {
        walk_tree_mut(self, tree);
    }

    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_children_mut(self, node);
    }
}

pub fn walk_tree<V: Visitor>(visitor: &mut V, tree: &PageTree) {
    for root in tree.roots() {
        visitor.visit_node(root);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match &node.kind {
        NodeKind::Section => visitor.visit_section(node),
        NodeKind::Column => visitor.visit_column(node),
        NodeKind::Widget(widget_type) => visitor.visit_widget(node, widget_type),
    }
}

pub fn walk_children<V: Visitor>(visitor: &mut V, node: &Node) {
    for child in &node.children {
        visitor.visit_node(child);
    }
}

pub fn walk_tree_mut<V: VisitorMut>(visitor: &mut V, tree: &mut PageTree) {
    for root in tree.roots_mut() {
        visitor.visit_node_mut(root);
    }
}

pub fn walk_children_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    for child in &mut node.children {
        visitor.visit_node_mut(child);
    }
}
