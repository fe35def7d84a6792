use super::{settings, ALIGN_OPTIONS};
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

pub const HEADING: &str = "heading";

const TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "div", "span", "p"];

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new(HEADING, "Heading", WidgetCategory::Basic)
        .icon("heading")
        .defaults(defaults)
        .editor(editor())
        .display(HeadingDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({
            "title": "سرتیتر نمونه",
            "link": { "url": "", "newTab": false },
            "tag": "h2",
            "size": "default"
        }),
        json!({
            "align": "",
            "color": "theme:primary",
            "fontSize": { "size": null, "unit": "px" },
            "fontWeight": "",
            "lineHeight": ""
        }),
    )
}

fn editor() -> Vec<EditorTab> {
    let tag_options: Vec<(&str, &str)> = TAGS.iter().map(|t| (*t, *t)).collect();
    vec![
        EditorTab::content(vec![ControlSection::new(
            "Title",
            vec![
                Control::content("title", "Title", ControlKind::TextArea),
                Control::content("link", "Link", ControlKind::Url),
                Control::content(
                    "size",
                    "Size",
                    ControlKind::select(&[
                        ("default", "Default"),
                        ("small", "Small"),
                        ("medium", "Medium"),
                        ("large", "Large"),
                        ("xl", "XL"),
                        ("xxl", "XXL"),
                    ]),
                ),
                Control::content("tag", "HTML Tag", ControlKind::select(&tag_options)),
            ],
        )]),
        EditorTab::style(vec![ControlSection::new(
            "Title",
            vec![
                Control::style("align", "Alignment", ControlKind::select(ALIGN_OPTIONS)),
                Control::style("color", "Text Color", ControlKind::Color),
                Control::style("fontSize", "Font Size", ControlKind::slider(1.0, 200.0, &["px", "em", "rem", "vw"])),
                Control::style(
                    "fontWeight",
                    "Font Weight",
                    ControlKind::select(&[("", "Default"), ("300", "300"), ("400", "400"), ("600", "600"), ("700", "700"), ("900", "900")]),
                ),
                Control::style("lineHeight", "Line Height", ControlKind::Text),
            ],
        )]),
    ]
}

struct HeadingDisplay;

impl WidgetDisplay for HeadingDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let requested = ctx.text("tag");
        let tag = if TAGS.contains(&requested) { requested } else { "h2" };

        let size = match ctx.text("size") {
            "" => "default",
            other => other,
        };

        let mut title = VNode::element(tag)
            .with_class("pc-heading-title")
            .with_class(format!("pc-size-{}", size));

        if let Some(align) = ctx.style_str("align") {
            title = title.with_style("text-align", align);
        }
        if let Some(color) = ctx.style_color("color") {
            title = title.with_style("color", color);
        }
        if let Some(font_size) = ctx.style_length("fontSize") {
            title = title.with_style("font-size", font_size);
        }
        if let Some(weight) = ctx.style_str("fontWeight") {
            title = title.with_style("font-weight", weight);
        }
        if let Some(line_height) = ctx.style_str("lineHeight") {
            title = title.with_style("line-height", line_height);
        }

        let text = VNode::text(ctx.text("title"));
        match ctx.link("link") {
            Some((href, new_tab)) => {
                let mut anchor = VNode::element("a").with_attr("href", href);
                if new_tab {
                    anchor = anchor
                        .with_attr("target", "_blank")
                        .with_attr("rel", "noopener");
                }
                title.with_child(anchor.with_child(text))
            }
            None => title.with_child(text),
        }
    }
}
