//! Editor configuration, read from `pagecraft.config.json`

use crate::EditorError;
use pagecraft_compiler_html::CompileOptions;
use pagecraft_registry::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE: &str = "pagecraft.config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo history depth (0 = unlimited)
    pub undo_levels: usize,

    /// How long `saved`/`error` stay visible before reverting to `idle`
    pub save_status_display_ms: u64,

    /// Largest file the media reader will embed
    pub max_media_bytes: u64,

    /// Fixed id seed; defaults to a hash of the page name
    pub id_seed: Option<String>,

    pub render: CompileOptions,

    pub theme: Theme,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_levels: 100,
            save_status_display_ms: 2000,
            max_media_bytes: 5 * 1024 * 1024,
            id_seed: None,
            render: CompileOptions::default(),
            theme: Theme::default(),
        }
    }
}

impl EditorConfig {
    /// Load `pagecraft.config.json` from `dir`, or defaults if absent
    pub fn load(dir: &Path) -> Result<Self, EditorError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config = serde_json::from_str(&content).map_err(|source| EditorError::Config {
            path: config_path.clone(),
            source,
        })?;

        debug!(path = %config_path.display(), "Loaded editor config");
        Ok(config)
    }

    pub fn save_status_display(&self) -> Duration {
        Duration::from_millis(self.save_status_display_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("pagecraft-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = temp_dir("missing");
        let config = EditorConfig::load(&dir).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.undo_levels, 100);
        assert_eq!(config.save_status_display(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = temp_dir("partial");
        fs::write(
            dir.join(CONFIG_FILE),
            r##"{ "undoLevels": 5, "render": { "pretty": false }, "theme": { "colors": { "primary": "#000" } } }"##,
        )
        .unwrap();

        let config = EditorConfig::load(&dir).unwrap();
        assert_eq!(config.undo_levels, 5);
        assert!(!config.render.pretty);
        assert_eq!(config.render.indent, "  ");
        assert_eq!(config.max_media_bytes, 5 * 1024 * 1024);
        assert_eq!(config.theme.resolve_color("theme:primary").as_deref(), Some("#000"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = temp_dir("malformed");
        fs::write(dir.join(CONFIG_FILE), "{ undoLevels: ").unwrap();
        assert!(matches!(EditorConfig::load(&dir), Err(EditorError::Config { .. })));
    }
}
