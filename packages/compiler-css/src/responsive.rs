use pagecraft_model::CssRule;
use std::collections::BTreeMap;

/// Device a hide flag applies to, with its viewport range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Desktop,
    Tablet,
    Mobile,
}

impl Device {
    pub const ALL: [Device; 3] = [Device::Desktop, Device::Tablet, Device::Mobile];

    pub fn media_query(&self) -> &'static str {
        match self {
            Device::Desktop => "(min-width: 1025px)",
            Device::Tablet => "(min-width: 768px) and (max-width: 1024px)",
            Device::Mobile => "(max-width: 767px)",
        }
    }

    pub fn hidden_class(&self) -> &'static str {
        match self {
            Device::Desktop => "pc-hidden-desktop",
            Device::Tablet => "pc-hidden-tablet",
            Device::Mobile => "pc-hidden-mobile",
        }
    }
}

/// Media rules that hide flagged elements on the matching device
pub fn responsive_rules() -> Vec<CssRule> {
    Device::ALL
        .iter()
        .map(|device| {
            let mut properties = BTreeMap::new();
            properties.insert("display".to_string(), "none !important".to_string());
            CssRule::new(format!(".{}", device.hidden_class()), properties)
                .in_media(device.media_query())
        })
        .collect()
}
