use serde::Deserialize;
use web_sys::Document;

use crate::scene::ModelPlacement;
use crate::state::CameraLimits;

/// Element id of the optional inline JSON config block in `index.html`.
pub const CONFIG_ELEMENT_ID: &str = "viewer-config";
const HELP_STORAGE_KEY: &str = "mv_help_visible";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub model_url: String,
    pub camera: CameraLimits,
    pub placement: ModelPlacement,
    /// Initial help overlay state when nothing is persisted yet.
    pub show_help: bool,
    /// `trace`, `debug`, `info`, `warn` or `error`.
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_url: "assets/map.gltf".to_string(),
            camera: CameraLimits::default(),
            placement: ModelPlacement::default(),
            show_help: false,
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the inline config block; a missing block or bad JSON yields defaults.
    /// Runs before logging is installed, so problems go to the console directly.
    pub fn from_page(document: &Document) -> Self {
        let Some(raw) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };
        if raw.trim().is_empty() {
            return Self::default();
        }
        match Self::from_json(&raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                web_sys::console::warn_1(&format!("ignoring #{CONFIG_ELEMENT_ID}: {e}").into());
                Self::default()
            }
        }
    }

    pub fn max_log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

pub fn load_help_visible(default: bool) -> bool {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            if let Ok(Some(v)) = store.get_item(HELP_STORAGE_KEY) {
                return v == "1" || v == "true";
            }
        }
    }
    default
}

pub fn store_help_visible(visible: bool) {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            let _ = store.set_item(HELP_STORAGE_KEY, if visible { "1" } else { "0" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = ViewerConfig::from_json("{}").expect("parse");
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.camera.min_zoom, 7.0);
        assert_eq!(cfg.camera.max_zoom, 15.0);
        assert_eq!(cfg.camera.default_position, [0.0, 0.0, 15.0]);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let cfg = ViewerConfig::from_json(
            r#"{ "model_url": "media/city.glb", "camera": { "max_zoom": 20.0 }, "log_level": "debug" }"#,
        )
        .expect("parse");
        assert_eq!(cfg.model_url, "media/city.glb");
        assert_eq!(cfg.camera.max_zoom, 20.0);
        assert_eq!(cfg.camera.min_zoom, 7.0);
        assert_eq!(cfg.placement, ModelPlacement::default());
        assert_eq!(cfg.max_log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let cfg = ViewerConfig {
            log_level: "chatty".into(),
            ..Default::default()
        };
        assert_eq!(cfg.max_log_level(), tracing::Level::INFO);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ViewerConfig::from_json("{ model_url: }").is_err());
    }
}
