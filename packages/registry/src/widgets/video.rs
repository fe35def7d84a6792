use super::settings;
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{safe_url, DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab, MediaKind};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

const RATIOS: &[(&str, &str)] = &[
    ("16:9", "16:9"),
    ("21:9", "21:9"),
    ("4:3", "4:3"),
    ("3:2", "3:2"),
    ("1:1", "1:1"),
    ("9:16", "9:16"),
];

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new("video", "Video", WidgetCategory::Media)
        .icon("video")
        .defaults(defaults)
        .editor(editor())
        .display(VideoDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({
            "url": "",
            "autoplay": false,
            "muted": false,
            "loop": false,
            "controls": true
        }),
        json!({
            "aspectRatio": "16:9"
        }),
    )
}

fn editor() -> Vec<EditorTab> {
    vec![
        EditorTab::content(vec![ControlSection::new(
            "Video",
            vec![
                Control::content("url", "Link", ControlKind::Media { accept: MediaKind::Video }),
                Control::content("autoplay", "Autoplay", ControlKind::Toggle),
                Control::content("muted", "Mute", ControlKind::Toggle),
                Control::content("loop", "Loop", ControlKind::Toggle),
                Control::content("controls", "Player Controls", ControlKind::Toggle),
            ],
        )]),
        EditorTab::style(vec![ControlSection::new(
            "Video",
            vec![Control::style("aspectRatio", "Aspect Ratio", ControlKind::select(RATIOS))],
        )]),
    ]
}

/// Hosted video platforms played through an embed iframe
#[derive(Debug, PartialEq)]
enum Embed {
    YouTube(String),
    Vimeo(String),
}

impl Embed {
    fn detect(url: &str) -> Option<Embed> {
        let without_scheme = url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        if let Some(rest) = without_scheme.strip_prefix("youtu.be/") {
            return video_id(rest).map(Embed::YouTube);
        }
        if let Some(rest) = without_scheme.strip_prefix("youtube.com/") {
            if let Some(query) = rest.strip_prefix("watch?") {
                return query
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("v="))
                    .and_then(video_id)
                    .map(Embed::YouTube);
            }
            if let Some(id) = rest.strip_prefix("embed/").or_else(|| rest.strip_prefix("shorts/")) {
                return video_id(id).map(Embed::YouTube);
            }
            return None;
        }
        if let Some(rest) = without_scheme.strip_prefix("vimeo.com/") {
            return video_id(rest)
                .filter(|id| id.chars().all(|c| c.is_ascii_digit()))
                .map(Embed::Vimeo);
        }
        None
    }

    fn src(&self, autoplay: bool, muted: bool, looped: bool, controls: bool) -> String {
        let flag = |b: bool| if b { "1" } else { "0" };
        match self {
            Embed::YouTube(id) => {
                let mut src = format!(
                    "https://www.youtube.com/embed/{}?autoplay={}&mute={}&controls={}",
                    id,
                    flag(autoplay),
                    flag(muted),
                    flag(controls)
                );
                if looped {
                    src.push_str(&format!("&loop=1&playlist={}", id));
                }
                src
            }
            Embed::Vimeo(id) => format!(
                "https://player.vimeo.com/video/{}?autoplay={}&muted={}&loop={}",
                id,
                flag(autoplay),
                flag(muted),
                flag(looped)
            ),
        }
    }
}

fn video_id(rest: &str) -> Option<String> {
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    (!id.is_empty()).then_some(id)
}

/// `"16:9"` → padding-top percentage keeping that ratio
fn ratio_padding(ratio: &str) -> String {
    let parsed = ratio
        .split_once(':')
        .and_then(|(w, h)| Some((w.trim().parse::<f64>().ok()?, h.trim().parse::<f64>().ok()?)))
        .filter(|(w, h)| *w > 0.0 && *h > 0.0);
    let (w, h) = parsed.unwrap_or((16.0, 9.0));
    format!("{}%", (h / w * 100_000.0).round() / 1000.0)
}

struct VideoDisplay;

impl WidgetDisplay for VideoDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let ratio = ctx.style_str("aspectRatio").unwrap_or("16:9");
        let mut wrapper = VNode::element("div")
            .with_class("pc-video-wrapper")
            .with_style("position", "relative")
            .with_style("padding-top", ratio_padding(ratio));

        let Some(url) = safe_url(ctx.text("url")) else {
            return wrapper.with_child(
                VNode::element("div")
                    .with_class("pc-video-placeholder")
                    .with_attr("aria-label", "No video selected"),
            );
        };

        let autoplay = ctx.flag("autoplay");
        let muted = ctx.flag("muted");
        let looped = ctx.flag("loop");
        let controls = ctx.flag("controls");

        let player = match Embed::detect(&url) {
            Some(embed) => VNode::element("iframe")
                .with_class("pc-video-iframe")
                .with_attr("src", embed.src(autoplay, muted, looped, controls))
                .with_attr("frameborder", "0")
                .with_attr("allow", "autoplay; fullscreen; picture-in-picture")
                .with_attr("allowfullscreen", ""),
            None => {
                let mut video = VNode::element("video")
                    .with_class("pc-video")
                    .with_attr("src", url)
                    .with_attr("playsinline", "");
                for (enabled, attr) in [(autoplay, "autoplay"), (muted, "muted"), (looped, "loop"), (controls, "controls")] {
                    if enabled {
                        video = video.with_attr(attr, "");
                    }
                }
                video
            }
        };

        wrapper = wrapper.with_child(
            player
                .with_style("position", "absolute")
                .with_style("inset", "0")
                .with_style("width", "100%")
                .with_style("height", "100%"),
        );
        wrapper
    }
}
