use crate::chrome;
use pagecraft_compiler_css::{compile_advanced, responsive_rules, CompiledStyle};
use pagecraft_model::{Node, NodeId, NodeKind, PageTree, Settings, VNode, VirtualDomDocument};
use pagecraft_registry::{DisplayContext, Registry, Theme};
use serde_json::Value;
use tracing::{debug, instrument};

const SECTION_TAGS: &[&str] = &["section", "div", "header", "footer", "aside"];

/// Which renderer entry point to use
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RenderMode {
    /// Read-only output for site visitors
    #[default]
    Display,
    /// Editor canvas: every node gets selection/hover chrome and controls
    Edit {
        selected: Option<NodeId>,
        hovered: Option<NodeId>,
    },
}

impl RenderMode {
    pub fn edit(selected: Option<NodeId>, hovered: Option<NodeId>) -> Self {
        RenderMode::Edit { selected, hovered }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, RenderMode::Edit { .. })
    }
}

/// Render a page tree into a virtual document.
///
/// Both modes build each node's box the same way. Edit mode only adds
/// wrappers and sibling chrome around boxes, so stripping the chrome from an
/// edit render yields the display render.
#[instrument(skip_all, fields(roots = tree.roots().len(), edit = mode.is_edit()))]
pub fn render_tree(
    tree: &PageTree,
    registry: &Registry,
    theme: &Theme,
    mode: &RenderMode,
) -> VirtualDomDocument {
    let mut renderer = Renderer {
        registry,
        theme,
        mode,
        document: VirtualDomDocument::new(),
    };

    let nodes: Vec<VNode> = tree.roots().iter().map(|n| renderer.render_node(n)).collect();
    renderer.document.nodes = nodes;

    for rule in responsive_rules() {
        renderer.document.add_rule(rule);
    }
    if mode.is_edit() {
        for rule in chrome::chrome_rules() {
            renderer.document.add_rule(rule);
        }
    }

    debug!(
        rules = renderer.document.styles.len(),
        "Rendered page tree"
    );
    renderer.document
}

/// Class that addresses one node's box in generated CSS.
///
/// Letters, digits and `-` pass through; every other byte, `_` included, is
/// written as `_` plus two hex digits, so distinct ids never share a class.
pub fn element_class(id: &NodeId) -> String {
    let mut class = String::from("pc-node-");
    for byte in id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            class.push(char::from(byte));
        } else {
            class.push_str(&format!("_{:02x}", byte));
        }
    }
    class
}

struct Renderer<'a> {
    registry: &'a Registry,
    theme: &'a Theme,
    mode: &'a RenderMode,
    document: VirtualDomDocument,
}

impl<'a> Renderer<'a> {
    fn render_node(&mut self, node: &Node) -> VNode {
        let node_box = self.render_box(node);
        let mode = self.mode;
        match mode {
            RenderMode::Display => node_box,
            RenderMode::Edit { selected, hovered } => chrome::wrap(
                node,
                node_box,
                selected.as_ref() == Some(&node.id),
                hovered.as_ref() == Some(&node.id),
                self.accepts_drops(node),
            ),
        }
    }

    fn accepts_drops(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Column => true,
            NodeKind::Section => false,
            NodeKind::Widget(widget_type) => self.registry.resolve(widget_type).is_container(),
        }
    }

    /// The node's visual box; identical in both modes
    fn render_box(&mut self, node: &Node) -> VNode {
        let class = element_class(&node.id);
        let compiled = self.compile(node, &class);

        let tag = match &node.kind {
            NodeKind::Section => section_tag(&node.settings),
            _ => "div",
        };

        let mut node_box = VNode::element(tag)
            .with_class("pc-element")
            .with_class(format!("pc-{}", node.kind.tag()))
            .with_class(&class)
            .with_attr("data-id", node.id.as_str())
            .with_key(node.id.as_str());

        if let Some(widget_type) = node.widget_type() {
            node_box = node_box
                .with_class(format!("pc-widget-{}", widget_type))
                .with_attr("data-widget-type", widget_type);
        }
        // author classes may not impersonate editor chrome
        for class in compiled.classes.iter().filter(|c| !c.starts_with("pc-edit-")) {
            node_box = node_box.with_class(class);
        }
        for (name, value) in &compiled.attributes {
            node_box = node_box.with_attr(name.clone(), value.clone());
        }
        node_box = node_box.with_styles(compiled.inline.clone());

        match &node.kind {
            NodeKind::Section => self.render_section_body(node, node_box),
            NodeKind::Column => self.render_column_body(node, node_box),
            NodeKind::Widget(widget_type) => self.render_widget_body(node, widget_type, node_box),
        }
    }

    fn compile(&mut self, node: &Node, class: &str) -> CompiledStyle {
        let mut compiled = compile_advanced(&node.settings.advanced);
        compiled.resolve_colors(|value| self.theme.resolve_color(value));

        let selector = format!(".{}", class);
        if let Some(rule) = compiled.hover_rule(&selector) {
            self.document.add_rule(rule);
        }
        if let Some(css) = compiled.scoped_custom_css(&selector) {
            self.document.add_raw_css(css);
        }
        compiled
    }

    fn render_section_body(&mut self, node: &Node, node_box: VNode) -> VNode {
        let content = &node.settings.content;
        let mut node_box = node_box;
        if let Some(min_height) = length(content.get("minHeight")) {
            node_box = node_box.with_style("min-height", min_height);
        }

        let mut container = VNode::element("div")
            .with_class("pc-container")
            .with_class(format!("pc-column-gap-{}", str_or(content.get("gap"), "default")))
            .with_style("display", "flex")
            .with_style("align-items", flex_align(str_or(content.get("verticalAlign"), "top")));

        if str_or(content.get("layout"), "boxed") == "boxed" {
            if let Some(width) = length(content.get("contentWidth")) {
                container = container
                    .with_style("max-width", width)
                    .with_style("margin", "0 auto");
            }
        }

        let columns = node.children.iter().map(|c| self.render_node(c)).collect();
        node_box.with_child(container.with_children(columns))
    }

    fn render_column_body(&mut self, node: &Node, node_box: VNode) -> VNode {
        let content = &node.settings.content;
        let mut node_box = node_box;
        // an advanced width mode wins over the column's share of the row
        if node_box.style("width").is_none() {
            if let Some(width) = length(content.get("width")) {
                node_box = node_box.with_style("width", width);
            }
        }

        let widgets = node.children.iter().map(|c| self.render_node(c)).collect();
        node_box.with_child(
            VNode::element("div")
                .with_class("pc-widget-wrap")
                .with_style("display", "flex")
                .with_style("flex-direction", "column")
                .with_style(
                    "justify-content",
                    flex_align(str_or(content.get("verticalAlign"), "top")),
                )
                .with_children(widgets),
        )
    }

    fn render_widget_body(&mut self, node: &Node, widget_type: &str, node_box: VNode) -> VNode {
        let children: Vec<VNode> = node.children.iter().map(|c| self.render_node(c)).collect();

        let display = self.registry.display_for(widget_type);
        let body = display.render(&DisplayContext {
            node_id: &node.id,
            widget_type,
            content: &node.settings.content,
            style: &node.settings.style,
            theme: self.theme,
            children: &children,
        });

        node_box.with_child(
            VNode::element("div")
                .with_class("pc-widget-container")
                .with_child(body),
        )
    }
}

fn section_tag(settings: &Settings) -> &'static str {
    let requested = settings.content_str("htmlTag").unwrap_or("section");
    SECTION_TAGS
        .iter()
        .copied()
        .find(|t| *t == requested)
        .unwrap_or("section")
}

fn str_or<'v>(value: Option<&'v Value>, default: &'v str) -> &'v str {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

fn length(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => n.as_f64().map(|n| format!("{}px", n)),
        Value::Object(map) => {
            let size = map.get("size").and_then(Value::as_f64)?;
            let unit = map.get("unit").and_then(Value::as_str).unwrap_or("px");
            Some(format!("{}{}", size, unit))
        }
        _ => None,
    }
}

fn flex_align(vertical: &str) -> &'static str {
    match vertical {
        "middle" => "center",
        "bottom" => "flex-end",
        _ => "flex-start",
    }
}
