//! Editor overlay chrome.
//!
//! Chrome never enters a node's box and never takes part in layout. The
//! wrapper is `display: contents`, so the box stays the flex item and
//! containing-block child it is in display mode. Outlines are drawn on the box
//! by stylesheet rules and the control bar and drop zone are out of flow.

use pagecraft_model::{CssRule, Node, VNode};
use std::collections::BTreeMap;

/// Marks every node that exists only in edit mode
pub const CHROME_CLASS: &str = "pc-edit-chrome";
pub const WRAPPER_CLASS: &str = "pc-edit-wrapper";

/// Actions offered by the floating control bar
pub const ACTIONS: &[(&str, &str)] = &[("duplicate", "Duplicate"), ("delete", "Delete")];

pub(crate) fn wrap(
    node: &Node,
    node_box: VNode,
    selected: bool,
    hovered: bool,
    accepts_drops: bool,
) -> VNode {
    let id = node.id.as_str();
    let mut wrapper = VNode::element("div")
        .with_class(CHROME_CLASS)
        .with_class(WRAPPER_CLASS)
        .with_class(format!("pc-edit-{}", node.kind.tag()))
        .with_attr("data-edit-for", id)
        .with_key(format!("edit:{}", id));

    if selected {
        wrapper = wrapper.with_class("pc-selected");
    } else if hovered {
        wrapper = wrapper.with_class("pc-hovered");
    }

    wrapper = wrapper.with_child(control_bar(node)).with_child(node_box);

    if accepts_drops {
        wrapper = wrapper.with_child(
            VNode::element("div")
                .with_class(CHROME_CLASS)
                .with_class("pc-drop-zone")
                .with_attr("data-drop-target", id),
        );
    }
    wrapper
}

fn control_bar(node: &Node) -> VNode {
    let label = node.widget_type().unwrap_or(node.kind.tag());
    let mut bar = VNode::element("div")
        .with_class(CHROME_CLASS)
        .with_class("pc-edit-controls")
        .with_child(
            VNode::element("span")
                .with_class("pc-edit-label")
                .with_child(VNode::text(label)),
        );

    for (action, title) in ACTIONS {
        bar = bar.with_child(
            VNode::element("button")
                .with_attr("type", "button")
                .with_attr("data-action", *action)
                .with_attr("data-target", node.id.as_str())
                .with_attr("title", *title)
                .with_class(format!("pc-edit-{}", action)),
        );
    }
    bar
}

/// Rules the editor canvas needs to position chrome over boxes
pub(crate) fn chrome_rules() -> Vec<CssRule> {
    let rule = |selector: &str, properties: &[(&str, &str)]| {
        let properties: BTreeMap<String, String> = properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CssRule::new(selector, properties)
    };

    vec![
        rule(".pc-edit-wrapper", &[("display", "contents")]),
        rule(".pc-edit-wrapper.pc-selected > .pc-element", &[("outline", "2px solid #93003c")]),
        rule(".pc-edit-wrapper.pc-hovered > .pc-element", &[("outline", "1px dashed #71d7f7")]),
        rule(
            ".pc-edit-controls",
            &[("position", "absolute"), ("z-index", "100"), ("display", "none")],
        ),
        rule(".pc-edit-wrapper.pc-selected > .pc-edit-controls, .pc-edit-wrapper.pc-hovered > .pc-edit-controls", &[("display", "flex")]),
        rule(
            ".pc-drop-zone",
            &[("position", "absolute"), ("width", "0"), ("height", "0"), ("pointer-events", "none")],
        ),
    ]
}

/// Remove all edit-mode chrome from rendered nodes.
///
/// Wrappers are replaced by the box they hold; other chrome nodes are
/// dropped. Applied to an edit render this gives the display render.
pub fn strip_editor_chrome(nodes: &[VNode]) -> Vec<VNode> {
    nodes.iter().filter_map(strip_node).collect()
}

fn strip_node(node: &VNode) -> Option<VNode> {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
            key,
        } => {
            if node.has_class(WRAPPER_CLASS) {
                return children
                    .iter()
                    .find(|c| !c.has_class(CHROME_CLASS))
                    .and_then(strip_node);
            }
            if node.has_class(CHROME_CLASS) {
                return None;
            }
            Some(VNode::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                styles: styles.clone(),
                children: strip_editor_chrome(children),
                key: key.clone(),
            })
        }
        other => Some(other.clone()),
    }
}
