use super::settings;
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

pub const INNER_SECTION: &str = "inner-section";

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new(INNER_SECTION, "Inner Section", WidgetCategory::Layout)
        .icon("columns")
        .container(2)
        .defaults(defaults)
        .editor(editor())
        .display(InnerSectionDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({
            "gap": "default",
            "verticalAlign": "top"
        }),
        json!({}),
    )
}

fn editor() -> Vec<EditorTab> {
    vec![EditorTab::content(vec![ControlSection::new(
        "Layout",
        vec![
            Control::content(
                "gap",
                "Columns Gap",
                ControlKind::select(&[
                    ("default", "Default"),
                    ("none", "No Gap"),
                    ("narrow", "Narrow"),
                    ("extended", "Extended"),
                    ("wide", "Wide"),
                ]),
            ),
            Control::content(
                "verticalAlign",
                "Vertical Align",
                ControlKind::select(&[("top", "Top"), ("middle", "Middle"), ("bottom", "Bottom")]),
            ),
        ],
    )])]
}

/// Lays out its already-rendered columns side by side
struct InnerSectionDisplay;

impl WidgetDisplay for InnerSectionDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let gap = match ctx.text("gap") {
            "" => "default",
            g => g,
        };
        let align = match ctx.text("verticalAlign") {
            "middle" => "center",
            "bottom" => "flex-end",
            _ => "flex-start",
        };
        VNode::element("div")
            .with_class("pc-inner-section")
            .with_class(format!("pc-column-gap-{}", gap))
            .with_style("display", "flex")
            .with_style("align-items", align)
            .with_children(ctx.children.to_vec())
    }
}
