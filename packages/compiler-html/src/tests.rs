use crate::{
    compile_page, element_class, render_tree, strip_editor_chrome, to_html, CompileOptions,
    RenderMode, CHROME_CLASS, WRAPPER_CLASS,
};
use pagecraft_model::{
    BackgroundType, IdGenerator, Node, NodeId, PageTree, Settings, SettingsPath, VNode,
};
use pagecraft_registry::{Registry, Theme};
use proptest::prelude::*;
use serde_json::json;

fn page_with(widget_types: &[&str]) -> (PageTree, Registry) {
    let registry = Registry::builtin();
    let mut ids = IdGenerator::new("test");
    let mut section = registry.new_section(&mut ids);
    for widget_type in widget_types {
        let widget = registry.new_widget(widget_type, &mut ids);
        section.children[0].children.push(widget);
    }
    (PageTree::from_roots(vec![section]), registry)
}

fn display(tree: &PageTree, registry: &Registry) -> Vec<VNode> {
    render_tree(tree, registry, &Theme::default(), &RenderMode::Display).nodes
}

fn contains_chrome(nodes: &[VNode]) -> bool {
    nodes
        .iter()
        .any(|n| n.find(&|c| c.has_class(CHROME_CLASS)).is_some())
}

#[test]
fn test_display_structure() {
    let (tree, registry) = page_with(&["heading"]);
    let nodes = display(&tree, &registry);

    assert_eq!(nodes.len(), 1);
    let section = &nodes[0];
    assert_eq!(section.tag(), Some("section"));
    assert!(section.has_class("pc-element"));
    assert!(section.has_class("pc-section"));

    let container = &section.children()[0];
    assert!(container.has_class("pc-container"));
    assert_eq!(container.style("max-width"), Some("1140px"));

    let column = &container.children()[0];
    assert!(column.has_class("pc-column"));
    assert_eq!(column.style("width"), Some("100%"));

    let widget = &column.children()[0].children()[0];
    assert!(widget.has_class("pc-widget-heading"));
    assert_eq!(widget.attr("data-widget-type"), Some("heading"));
    assert_eq!(widget.text_content(), "سرتیتر نمونه");
    assert!(!contains_chrome(&nodes));
}

#[test]
fn test_edit_mode_adds_chrome_without_touching_boxes() {
    let (tree, registry) = page_with(&["heading", "inner-section", "button"]);
    let widget_id = tree.roots()[0].children[0].children[0].id.clone();

    let edit = render_tree(
        &tree,
        &registry,
        &Theme::default(),
        &RenderMode::edit(Some(widget_id.clone()), None),
    );
    assert!(contains_chrome(&edit.nodes));

    let selected = edit.nodes[0]
        .find(&|n| n.has_class("pc-selected"))
        .unwrap();
    assert_eq!(selected.attr("data-edit-for"), Some(widget_id.as_str()));

    // every column and the inner section get a drop zone; sections and leaves do not
    let mut drop_targets = Vec::new();
    collect_attr(&edit.nodes, "data-drop-target", &mut drop_targets);
    assert_eq!(drop_targets.len(), 4);

    assert_eq!(strip_editor_chrome(&edit.nodes), display(&tree, &registry));
}

/// Children that take part in layout, seen through `display: contents` wrappers
fn layout_children(node: &VNode) -> Vec<&VNode> {
    let mut out = Vec::new();
    for child in node.children() {
        if child.has_class(WRAPPER_CLASS) {
            out.extend(
                child
                    .children()
                    .iter()
                    .filter(|c| !c.has_class(CHROME_CLASS)),
            );
        } else if !child.has_class(CHROME_CLASS) {
            out.push(child);
        }
    }
    out
}

#[test]
fn test_columns_stay_flex_items_in_edit_mode() {
    let registry = Registry::builtin();
    let mut ids = IdGenerator::new("test");
    let mut section = registry.new_section(&mut ids);
    section.children = vec![registry.new_column(&mut ids, 50.0), registry.new_column(&mut ids, 50.0)];
    let tree = PageTree::from_roots(vec![section]);
    let first_column = tree.roots()[0].children[0].id.clone();

    for mode in [RenderMode::Display, RenderMode::edit(Some(first_column), None)] {
        let document = render_tree(&tree, &registry, &Theme::default(), &mode);
        let container = document.nodes[0]
            .find(&|n| n.has_class("pc-container"))
            .unwrap();
        assert_eq!(container.style("display"), Some("flex"));

        let items = layout_children(container);
        assert_eq!(items.len(), 2, "{:?}", mode);
        for item in items {
            assert!(item.has_class("pc-column"), "{:?}", mode);
            assert_eq!(item.style("width"), Some("50%"), "{:?}", mode);
        }

        if mode.is_edit() {
            let wrapper_rule = document
                .styles
                .iter()
                .find(|r| r.selector == format!(".{}", WRAPPER_CLASS))
                .unwrap();
            assert_eq!(wrapper_rule.properties.get("display").map(String::as_str), Some("contents"));
            assert!(!wrapper_rule.properties.contains_key("position"));
        }
    }
}

#[test]
fn test_advanced_width_wins_over_column_share() {
    let (mut tree, registry) = page_with(&[]);
    let column = &mut tree.roots_mut()[0].children[0];
    column.settings = column
        .settings
        .with_value(&SettingsPath::content("width"), json!({ "size": 40, "unit": "%" }))
        .unwrap()
        .with_value(&SettingsPath::advanced("layout.width"), json!("full-width"))
        .unwrap();
    let class = element_class(&column.id);

    let document = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);
    let node_box = document.nodes[0].find(&|n| n.has_class(&class)).unwrap();
    assert_eq!(node_box.style("width"), Some("100%"));

    let column = &mut tree.roots_mut()[0].children[0];
    column.settings = column
        .settings
        .with_value(&SettingsPath::advanced("layout.width"), json!("default"))
        .unwrap();
    let document = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);
    let node_box = document.nodes[0].find(&|n| n.has_class(&class)).unwrap();
    assert_eq!(node_box.style("width"), Some("40%"));
}

fn collect_attr(nodes: &[VNode], name: &str, out: &mut Vec<String>) {
    for node in nodes {
        if let Some(value) = node.attr(name) {
            out.push(value.to_string());
        }
        collect_attr(node.children(), name, out);
    }
}

#[test]
fn test_compiled_styles_reach_the_box() {
    let (mut tree, registry) = page_with(&["text"]);
    let widget = &mut tree.roots_mut()[0].children[0].children[0];
    widget.settings = widget
        .settings
        .with_value(&SettingsPath::advanced("background.normal"), json!({ "type": "classic", "color": "theme:accent" }))
        .unwrap()
        .with_value(&SettingsPath::advanced("transform.hover.scale"), json!(1.2))
        .unwrap()
        .with_value(&SettingsPath::advanced("customCss"), json!("selector a { color: red; }"))
        .unwrap()
        .with_value(&SettingsPath::advanced("responsive.hideMobile"), json!(true))
        .unwrap();
    assert_eq!(widget.settings.advanced.background.normal.background_type, BackgroundType::Classic);
    let class = element_class(&widget.id);

    let document = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);
    let node_box = document.nodes[0].find(&|n| n.has_class(&class)).unwrap();

    assert_eq!(node_box.style("background-color"), Some("#61CE70"));
    assert_eq!(node_box.style("transition"), Some("all 300ms"));
    assert!(node_box.has_class("pc-hidden-mobile"));

    let css = document.to_css();
    assert!(css.contains(&format!(".{}:hover {{ transform: scale(1.2); }}", class)));
    assert!(css.contains(&format!(".{} a {{ color: red; }}", class)));
    assert!(css.contains("(max-width: 767px)"));
}

#[test]
fn test_unknown_widget_renders_fallback() {
    let registry = Registry::builtin();
    let mut ids = IdGenerator::new("test");
    let mut section = registry.new_section(&mut ids);
    section.children[0]
        .children
        .push(Node::widget(NodeId::new("legacy-1"), "carousel", Settings::default()));
    let tree = PageTree::from_roots(vec![section]);

    let nodes = display(&tree, &registry);
    let fallback = nodes[0]
        .find(&|n| n.has_class("pc-widget-unsupported"))
        .unwrap();
    assert_eq!(fallback.text_content(), "Unsupported widget: carousel");
}

#[test]
fn test_to_html_escapes_and_formats() {
    let nodes = vec![VNode::element("div")
        .with_class("a")
        .with_attr("title", "\"quoted\"")
        .with_child(VNode::element("p").with_child(VNode::text("<b>&")))
        .with_child(VNode::element("img").with_attr("src", "/x.png"))
        .with_child(VNode::raw("<em>raw</em>"))];

    let pretty = to_html(&nodes, &CompileOptions::default());
    assert_eq!(
        pretty,
        "<div class=\"a\" title=\"&quot;quoted&quot;\">\n  <p>&lt;b&gt;&amp;</p>\n  <img src=\"/x.png\" />\n  <em>raw</em>\n</div>\n"
    );

    let compact = to_html(
        &nodes,
        &CompileOptions {
            pretty: false,
            ..Default::default()
        },
    );
    assert_eq!(
        compact,
        "<div class=\"a\" title=\"&quot;quoted&quot;\"><p>&lt;b&gt;&amp;</p><img src=\"/x.png\" /><em>raw</em></div>"
    );
}

#[test]
fn test_compile_page() {
    let (tree, registry) = page_with(&["heading"]);
    let document = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);
    let html = compile_page(&document, "About & Us", &CompileOptions::default());

    assert!(html.starts_with("<!DOCTYPE html>\n<html>\n"));
    assert!(html.contains("<title>About &amp; Us</title>"));
    assert!(html.contains("<style>"));
    assert!(html.contains(".pc-hidden-desktop"));
    assert!(html.contains("<h2 class=\"pc-heading-title pc-size-default\" style=\"color: #6EC1E4;\">سرتیتر نمونه</h2>"));
}

#[test]
fn test_element_classes_are_distinct_per_id() {
    let ids = ["a.b", "a_b", "a b", "a-b", "ab", "inline", "a_2eb", "سر"];
    let classes: Vec<String> = ids.iter().map(|id| element_class(&NodeId::new(*id))).collect();

    let mut unique = classes.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len(), "{:?}", classes);

    assert_eq!(classes[0], "pc-node-a_2eb");
    assert_eq!(classes[1], "pc-node-a_5fb");
    assert_eq!(classes[3], "pc-node-a-b");
    assert_ne!(classes[5], "pc-element-inline");
    for class in &classes {
        assert!(class.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

#[test]
fn test_author_css_cannot_close_style_element() {
    let (mut tree, registry) = page_with(&["text"]);
    let widget = &mut tree.roots_mut()[0].children[0].children[0];
    widget.settings = widget
        .settings
        .with_value(
            &SettingsPath::advanced("customCss"),
            json!("selector::after { content: '</StYlE><script>x()</script>'; }"),
        )
        .unwrap();

    let document = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);
    let html = compile_page(&document, "Page", &CompileOptions::default()).to_ascii_lowercase();

    assert_eq!(html.matches("</style").count(), 1);
    assert!(html.contains("<\\/style><script>"));
}

const WIDGETS: &[&str] = &["heading", "text", "image", "button", "video", "icon", "divider", "spacer", "html", "inner-section", "carousel"];

fn arb_tree() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<(i32, f64)>)> {
    (
        prop::collection::vec(prop::collection::vec(0..WIDGETS.len(), 0..4), 1..4),
        prop::collection::vec((-90..90i32, 0.5..1.5f64), 0..6),
    )
}

fn build(sections: &[Vec<usize>], tweaks: &[(i32, f64)]) -> (PageTree, Registry) {
    let registry = Registry::builtin();
    let mut ids = IdGenerator::new("prop");
    let mut roots = Vec::new();
    for widgets in sections {
        let mut section = registry.new_section(&mut ids);
        for &w in widgets {
            let mut widget = registry.new_widget(WIDGETS[w], &mut ids);
            if WIDGETS[w] == "inner-section" {
                let nested = registry.new_widget("heading", &mut ids);
                widget.children[0].children.push(nested);
            }
            section.children[0].children.push(widget);
        }
        roots.push(section);
    }

    let mut tree = PageTree::from_roots(roots);
    let ids: Vec<NodeId> = tree.ids().into_iter().cloned().collect();
    for (i, (rotate, scale)) in tweaks.iter().enumerate() {
        let id = &ids[i % ids.len()];
        if let Some(node) = tree.find_mut(id) {
            node.settings.advanced.transform.normal.rotate = *rotate as f64;
            node.settings.advanced.transform.hover.scale = *scale;
        }
    }
    (tree, registry)
}

proptest! {
    #[test]
    fn edit_render_matches_display_render((sections, tweaks) in arb_tree(), pick in any::<prop::sample::Index>()) {
        let (tree, registry) = build(&sections, &tweaks);
        let ids = tree.ids();
        let selected = ids[pick.index(ids.len())].clone();

        let edit = render_tree(&tree, &registry, &Theme::default(), &RenderMode::edit(Some(selected.clone()), Some(selected)));
        let display = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);

        prop_assert_eq!(strip_editor_chrome(&edit.nodes), display.nodes);
    }

    #[test]
    fn render_is_deterministic((sections, tweaks) in arb_tree()) {
        let (tree, registry) = build(&sections, &tweaks);
        let a = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);
        let b = render_tree(&tree, &registry, &Theme::default(), &RenderMode::Display);
        prop_assert_eq!(to_html(&a.nodes, &CompileOptions::default()), to_html(&b.nodes, &CompileOptions::default()));
        prop_assert_eq!(a.to_css(), b.to_css());
    }
}
