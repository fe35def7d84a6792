use crate::compiled::CompiledStyle;
use pagecraft_model::{
    AdvancedSettings, AttributeSettings, BackgroundSettings, BackgroundType, BorderGroup,
    BorderSettings, BoxSides, Dimension, LayoutSettings, MotionSettings, ResponsiveSettings,
    Stateful, TransformSettings, WidthMode,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Default hover transition when a hover state is set without a duration
const DEFAULT_TRANSITION_MS: u32 = 300;

/// Attributes the renderer owns; custom attributes may not override them
const RESERVED_ATTRIBUTES: &[&str] = &["id", "class", "style", "data-id"];

/// Compile a node's advanced settings into concrete presentation attributes.
///
/// Pure and total: the same input always yields the same output, and every
/// input compiles. Each rule targets its own CSS properties.
pub fn compile_advanced(advanced: &AdvancedSettings) -> CompiledStyle {
    let mut style = CompiledStyle::default();

    compile_layout(&advanced.layout, &mut style);
    compile_motion(&advanced.motion, &mut style);
    compile_transform(&advanced.transform, &mut style);
    compile_background(&advanced.background, &mut style);
    compile_border(&advanced.border, &mut style);
    compile_transition(advanced, &mut style);
    compile_responsive(&advanced.responsive, &mut style);
    compile_attributes(&advanced.attributes, &mut style);

    let custom_css = advanced.custom_css.trim();
    if !custom_css.is_empty() {
        style.custom_css = Some(custom_css.to_string());
    }

    style
}

fn compile_layout(layout: &LayoutSettings, style: &mut CompiledStyle) {
    if let Some(margin) = box_shorthand(&layout.margin) {
        style.inline.insert("margin".into(), margin);
    }
    if let Some(padding) = box_shorthand(&layout.padding) {
        style.inline.insert("padding".into(), padding);
    }

    match layout.width {
        WidthMode::FullWidth => {
            style.inline.insert("width".into(), "100%".into());
        }
        WidthMode::Custom => {
            if let Some(width) = dimension(&layout.custom_width) {
                style.inline.insert("width".into(), width);
            }
        }
        WidthMode::Inline => style.classes.push("pc-element-inline".into()),
        WidthMode::Auto | WidthMode::Default => {}
    }

    if let Some(position) = layout.position.as_css() {
        style.inline.insert("position".into(), position.into());
    }
    if let Some(z_index) = layout.z_index {
        style.inline.insert("z-index".into(), z_index.to_string());
    }
}

fn compile_motion(motion: &MotionSettings, style: &mut CompiledStyle) {
    let Some(animation) = motion
        .entrance_animation
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty() && *a != "none")
    else {
        return;
    };

    style.classes.push("pc-animated".into());
    style.classes.push(format!("pc-animation-{}", class_token(animation)));
    style
        .classes
        .push(format!("pc-duration-{}", motion.duration.as_str()));
    if motion.delay_ms > 0 {
        style
            .inline
            .insert("animation-delay".into(), format!("{}ms", motion.delay_ms));
    }
}

fn compile_transform(transform: &Stateful<TransformSettings>, style: &mut CompiledStyle) {
    if let Some(value) = transform_value(&transform.normal) {
        style.inline.insert("transform".into(), value);
    }
    if let Some(value) = transform_value(&transform.hover) {
        style.hover.insert("transform".into(), value);
    }
}

/// Composite transform in rotate, scale, translate, skew order.
///
/// Identity primitives are left out; all-identity input gives `None`.
pub fn transform_value(transform: &TransformSettings) -> Option<String> {
    let mut parts = Vec::new();

    if transform.rotate != 0.0 {
        parts.push(format!("rotate({}deg)", transform.rotate));
    }
    if transform.scale != 1.0 {
        parts.push(format!("scale({})", transform.scale));
    }
    if transform.offset_x != 0.0 || transform.offset_y != 0.0 {
        parts.push(format!(
            "translate({}px, {}px)",
            transform.offset_x, transform.offset_y
        ));
    }
    if transform.skew_x != 0.0 || transform.skew_y != 0.0 {
        parts.push(format!(
            "skew({}deg, {}deg)",
            transform.skew_x, transform.skew_y
        ));
    }

    (!parts.is_empty()).then(|| parts.join(" "))
}

fn compile_background(background: &Stateful<BackgroundSettings>, style: &mut CompiledStyle) {
    if let Some(color) = background_color(&background.normal) {
        style.inline.insert("background-color".into(), color);
    }
    if let Some(color) = background_color(&background.hover) {
        style.hover.insert("background-color".into(), color);
    }
}

/// Only the classic type compiles; the other modes stay in raw settings
fn background_color(background: &BackgroundSettings) -> Option<String> {
    match background.background_type {
        BackgroundType::Classic => non_empty(background.color.as_deref()),
        BackgroundType::None
        | BackgroundType::Gradient
        | BackgroundType::Image
        | BackgroundType::Video => None,
    }
}

fn compile_border(border: &BorderGroup, style: &mut CompiledStyle) {
    border_properties(&border.normal, &mut style.inline);
    border_properties(&border.hover, &mut style.hover);

    if let Some(radius) = box_shorthand(&border.radius) {
        style.inline.insert("border-radius".into(), radius);
    }
}

fn border_properties(border: &BorderSettings, out: &mut BTreeMap<String, String>) {
    let Some(border_style) = border.border_type.as_css() else {
        return;
    };
    out.insert("border-style".into(), border_style.into());
    if let Some(color) = non_empty(border.color.as_deref()) {
        out.insert("border-color".into(), color);
    }
    if let Some(width) = box_shorthand(&border.width) {
        out.insert("border-width".into(), width);
    }
}

/// Hover declarations animate over the longest configured duration
fn compile_transition(advanced: &AdvancedSettings, style: &mut CompiledStyle) {
    if style.hover.is_empty() {
        return;
    }
    let duration = [
        advanced.transform.transition_ms,
        advanced.background.transition_ms,
        advanced.border.transition_ms,
    ]
    .into_iter()
    .flatten()
    .max()
    .unwrap_or(DEFAULT_TRANSITION_MS);

    style
        .inline
        .insert("transition".into(), format!("all {}ms", duration));
}

fn compile_responsive(responsive: &ResponsiveSettings, style: &mut CompiledStyle) {
    for (hidden, class) in [
        (responsive.hide_desktop, "pc-hidden-desktop"),
        (responsive.hide_tablet, "pc-hidden-tablet"),
        (responsive.hide_mobile, "pc-hidden-mobile"),
    ] {
        if hidden {
            style.classes.push(class.into());
        }
    }
}

fn compile_attributes(attributes: &AttributeSettings, style: &mut CompiledStyle) {
    let css_id = attributes.css_id.trim();
    if !css_id.is_empty() && !css_id.contains(char::is_whitespace) {
        style.attributes.insert("id".into(), css_id.to_string());
    }

    style.classes.extend(
        attributes
            .css_classes
            .split_whitespace()
            .map(class_token)
            .filter(|c| !c.is_empty()),
    );

    for line in attributes.custom.lines() {
        let (key, value) = match line.split_once('|') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line.trim(), ""),
        };
        if key.is_empty() {
            continue;
        }
        let key = key.to_ascii_lowercase();
        if !is_allowed_attribute(&key) {
            debug!(attribute = %key, "Rejected custom attribute");
            continue;
        }
        style.attributes.insert(key, value.to_string());
    }
}

fn is_allowed_attribute(name: &str) -> bool {
    let well_formed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
        && name.starts_with(|c: char| c.is_ascii_alphabetic());

    well_formed && !name.starts_with("on") && !RESERVED_ATTRIBUTES.contains(&name)
}

/// Four-sided box as a CSS shorthand; `None` when no side was set
pub fn box_shorthand(sides: &BoxSides) -> Option<String> {
    if sides.is_unset() {
        return None;
    }
    let unit = sides.unit.as_str();
    let [top, right, bottom, left] = sides.sides();

    Some(if top == right && right == bottom && bottom == left {
        length(top, unit)
    } else {
        format!(
            "{} {} {} {}",
            length(top, unit),
            length(right, unit),
            length(bottom, unit),
            length(left, unit)
        )
    })
}

fn dimension(dimension: &Dimension) -> Option<String> {
    dimension.size.map(|size| length(size, dimension.unit.as_str()))
}

fn length(value: f64, unit: &str) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}{}", value, unit)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Restrict free text to characters valid in a class name
fn class_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}
