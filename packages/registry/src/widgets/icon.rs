use super::{settings, ALIGN_OPTIONS};
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new("icon", "Icon", WidgetCategory::Basic)
        .icon("star")
        .defaults(defaults)
        .editor(editor())
        .display(IconDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({
            "icon": "star",
            "link": { "url": "", "newTab": false }
        }),
        json!({
            "align": "center",
            "color": "theme:primary",
            "size": { "size": 50, "unit": "px" }
        }),
    )
}

fn editor() -> Vec<EditorTab> {
    vec![
        EditorTab::content(vec![ControlSection::new(
            "Icon",
            vec![
                Control::content("icon", "Icon", ControlKind::Icon),
                Control::content("link", "Link", ControlKind::Url),
            ],
        )]),
        EditorTab::style(vec![ControlSection::new(
            "Icon",
            vec![
                Control::style("align", "Alignment", ControlKind::select(ALIGN_OPTIONS)),
                Control::style("color", "Color", ControlKind::Color),
                Control::style("size", "Size", ControlKind::slider(6.0, 300.0, &["px", "em"])),
            ],
        )]),
    ]
}

/// Icon names become a class; anything outside `[a-z0-9-]` is stripped
fn icon_class(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        "pc-icon-star".to_string()
    } else {
        format!("pc-icon-{}", cleaned)
    }
}

struct IconDisplay;

impl WidgetDisplay for IconDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let mut glyph = VNode::element("i")
            .with_class("pc-icon")
            .with_class(icon_class(ctx.text("icon")))
            .with_attr("aria-hidden", "true");
        if let Some(color) = ctx.style_color("color") {
            glyph = glyph.with_style("color", color);
        }
        if let Some(size) = ctx.style_length("size") {
            glyph = glyph.with_style("font-size", size);
        }

        let body = match ctx.link("link") {
            Some((href, new_tab)) => {
                let mut anchor = VNode::element("a").with_attr("href", href);
                if new_tab {
                    anchor = anchor.with_attr("target", "_blank").with_attr("rel", "noopener");
                }
                anchor.with_child(glyph)
            }
            None => glyph,
        };

        let mut wrapper = VNode::element("div").with_class("pc-icon-wrapper");
        if let Some(align) = ctx.style_str("align") {
            wrapper = wrapper.with_style("text-align", align);
        }
        wrapper.with_child(body)
    }
}
