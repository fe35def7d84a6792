use super::{settings, ALIGN_OPTIONS};
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{safe_url, DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab, MediaKind};
use pagecraft_model::{Settings, VNode};
use serde_json::{json, Value};

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new("image", "Image", WidgetCategory::Media)
        .icon("image")
        .defaults(defaults)
        .editor(editor())
        .display(ImageDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({
            "image": { "url": "", "alt": "" },
            "caption": "",
            "link": { "url": "", "newTab": false }
        }),
        json!({
            "align": "center",
            "width": { "size": 100, "unit": "%" },
            "maxWidth": { "size": null, "unit": "%" },
            "borderRadius": { "size": null, "unit": "px" },
            "opacity": 1
        }),
    )
}

fn editor() -> Vec<EditorTab> {
    vec![
        EditorTab::content(vec![ControlSection::new(
            "Image",
            vec![
                Control::content("image", "Choose Image", ControlKind::Media { accept: MediaKind::Image }),
                Control::content("image.alt", "Alternative Text", ControlKind::Text),
                Control::content("caption", "Caption", ControlKind::Text),
                Control::content("link", "Link", ControlKind::Url),
            ],
        )]),
        EditorTab::style(vec![ControlSection::new(
            "Image",
            vec![
                Control::style("align", "Alignment", ControlKind::select(ALIGN_OPTIONS)),
                Control::style("width", "Width", ControlKind::slider(1.0, 1000.0, &["%", "px", "vw"])),
                Control::style("maxWidth", "Max Width", ControlKind::slider(1.0, 1000.0, &["%", "px", "vw"])),
                Control::style("borderRadius", "Border Radius", ControlKind::slider(0.0, 200.0, &["px", "%"])),
                Control::style(
                    "opacity",
                    "Opacity",
                    ControlKind::Number {
                        min: Some(0.0),
                        max: Some(1.0),
                        step: 0.05,
                    },
                ),
            ],
        )]),
    ]
}

struct ImageDisplay;

impl WidgetDisplay for ImageDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let image = ctx.content.get("image");
        let src = image
            .and_then(|i| i.get("url"))
            .and_then(Value::as_str)
            .and_then(safe_url);
        let alt = image
            .and_then(|i| i.get("alt"))
            .and_then(Value::as_str)
            .unwrap_or("");

        let mut figure = VNode::element("figure").with_class("pc-image");
        if let Some(align) = ctx.style_str("align") {
            figure = figure.with_style("text-align", align);
        }

        let Some(src) = src else {
            return figure.with_child(
                VNode::element("div")
                    .with_class("pc-image-placeholder")
                    .with_attr("aria-label", "No image selected"),
            );
        };

        let mut img = VNode::element("img")
            .with_attr("src", src)
            .with_attr("alt", alt)
            .with_attr("loading", "lazy");
        if let Some(width) = ctx.style_length("width") {
            img = img.with_style("width", width);
        }
        if let Some(max_width) = ctx.style_length("maxWidth") {
            img = img.with_style("max-width", max_width);
        }
        if let Some(radius) = ctx.style_length("borderRadius") {
            img = img.with_style("border-radius", radius);
        }
        if let Some(opacity) = ctx.style.get("opacity").and_then(Value::as_f64) {
            if opacity < 1.0 {
                img = img.with_style("opacity", opacity.to_string());
            }
        }

        let body = match ctx.link("link") {
            Some((href, new_tab)) => {
                let mut anchor = VNode::element("a").with_attr("href", href);
                if new_tab {
                    anchor = anchor.with_attr("target", "_blank").with_attr("rel", "noopener");
                }
                anchor.with_child(img)
            }
            None => img,
        };
        figure = figure.with_child(body);

        let caption = ctx.text("caption");
        if !caption.is_empty() {
            figure = figure.with_child(
                VNode::element("figcaption")
                    .with_class("pc-image-caption")
                    .with_child(VNode::text(caption)),
            );
        }
        figure
    }
}
