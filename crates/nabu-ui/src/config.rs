use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use nabu_engine::coords::Vec2;
use nabu_engine::paint::Color;

use crate::error::ConfigError;

// ── SessionConfig ─────────────────────────────────────────────────────────

/// Session settings. Every field has a default, so a TOML file only needs
/// the keys it wants to change:
///
/// ```toml
/// root_tag = "UIML"
/// strict_attributes = true
/// screen_size = [1280.0, 720.0]
///
/// [addressables]
/// "ui/logo" = "textures/logo.png"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Required tag of the document's root element, compared ignoring case.
    pub root_tag: String,
    /// Clear the previous tree before loading a new document.
    pub clear_on_load: bool,
    /// Warn about present-but-malformed attribute values.
    pub strict_attributes: bool,
    /// Number of resource slots created with the session.
    pub slot_count: usize,
    /// Seconds used when an optional duration argument is omitted.
    pub default_duration: f32,
    /// Peak scale factor of `bounce`.
    pub bounce_scale: f32,
    /// Distance used by off-screen slides, `[width, height]`.
    pub screen_size: [f32; 2],
    /// Base directory for logical resource paths.
    pub resource_root: PathBuf,
    /// Address → location catalog for managed addressables. A location is
    /// either an `http(s)://` URL or a path under `resource_root`.
    pub addressables: BTreeMap<String, String>,
    /// Seconds a remote fetch may take.
    pub http_timeout_secs: u64,

    #[serde(skip)]
    pub theme: Theme,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root_tag: "UIML".to_string(),
            clear_on_load: true,
            strict_attributes: false,
            slot_count: 64,
            default_duration: 2.0,
            bounce_scale: 1.2,
            screen_size: [1920.0, 1080.0],
            resource_root: PathBuf::from("resources"),
            addressables: BTreeMap::new(),
            http_timeout_secs: 10,
            theme: Theme::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: SessionConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_tag.trim().is_empty() {
            return Err(ConfigError::invalid("root_tag must not be empty"));
        }
        if !self.default_duration.is_finite() || self.default_duration < 0.0 {
            return Err(ConfigError::invalid(format!(
                "default_duration must be a non-negative number, got {}",
                self.default_duration
            )));
        }
        if !self.bounce_scale.is_finite() || self.bounce_scale <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "bounce_scale must be positive, got {}",
                self.bounce_scale
            )));
        }
        if self.screen_size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::invalid("screen_size entries must be positive"));
        }
        Ok(())
    }

    #[inline]
    pub fn screen_extent(&self) -> Vec2 {
        Vec2::new(self.screen_size[0], self.screen_size[1])
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

// ── Theme ─────────────────────────────────────────────────────────────────

/// Fallback look for elements that do not set their own colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub text_color: Color,
    pub font_size: f32,
    pub panel: Color,
    pub button: Color,
    pub button_text: Color,
    pub checkbox: Color,
    pub checkmark: Color,
    pub input_field: Color,
    pub dropdown: Color,
    pub scroll_background: Color,
    pub progress_background: Color,
    pub progress_fill: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_color: Color::WHITE,
            font_size: 14.0,
            panel: Color::rgba(0.2, 0.2, 0.2, 0.8),
            button: Color::WHITE,
            button_text: Color::BLACK,
            checkbox: Color::WHITE,
            checkmark: Color::rgb(0.2, 0.6, 0.9),
            input_field: Color::rgb(0.17, 0.24, 0.31),
            dropdown: Color::rgb(0.17, 0.24, 0.31),
            scroll_background: Color::rgba(0.1, 0.1, 0.1, 0.8),
            progress_background: Color::rgb(0.2, 0.3, 0.4),
            progress_fill: Color::rgb(0.2, 0.6, 0.9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let cfg = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.root_tag, "UIML");
        assert!(cfg.clear_on_load);
        assert_eq!(cfg.slot_count, 64);
        assert_eq!(cfg.default_duration, 2.0);
    }

    #[test]
    fn partial_override() {
        let cfg = SessionConfig::from_toml_str(
            r#"
            root_tag = "Screen"
            strict_attributes = true
            screen_size = [1280.0, 720.0]

            [addressables]
            "ui/logo" = "textures/logo.png"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.root_tag, "Screen");
        assert!(cfg.strict_attributes);
        assert_eq!(cfg.screen_extent(), Vec2::new(1280.0, 720.0));
        assert_eq!(cfg.addressables.get("ui/logo").map(String::as_str), Some("textures/logo.png"));
        assert_eq!(cfg.bounce_scale, 1.2);
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("rot_tag = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("default_duration = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("root_tag = \"  \""),
            Err(ConfigError::Invalid(_))
        ));
    }
}
