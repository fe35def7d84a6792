use super::settings;
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new("html", "HTML", WidgetCategory::Advanced)
        .icon("code")
        .defaults(defaults)
        .editor(editor())
        .display(HtmlDisplay)
}

fn defaults() -> Settings {
    settings(json!({ "html": "" }), json!({}))
}

fn editor() -> Vec<EditorTab> {
    vec![EditorTab::content(vec![ControlSection::new(
        "Custom HTML",
        vec![Control::content(
            "html",
            "HTML Code",
            ControlKind::Code {
                language: "html".to_string(),
            },
        )],
    )])]
}

/// Author-supplied markup, emitted untouched
struct HtmlDisplay;

impl WidgetDisplay for HtmlDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        VNode::element("div")
            .with_class("pc-custom-html")
            .with_child(VNode::raw(ctx.text("html")))
    }
}
