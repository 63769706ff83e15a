//! Subtitle styling store.
//!
//! Holds the caption appearance, the subtitle delay and the related player
//! preferences, and persists them as a small JSON document. Writes go through
//! [`SubtitleStore::update_styling`] with a partial patch, the same way the
//! caption settings menu applies one control at a time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Preset caption colors offered next to the custom color picker.
pub const COLORS: [&str; 4] = ["#ffffff", "#80b1fa", "#e2e535", "#10B239FF"];

/// Subtitle delay bounds in seconds.
pub const MIN_DELAY: f64 = -20.0;
pub const MAX_DELAY: f64 = 20.0;

/// Caption size bounds as a scale factor (1.0 = 100%).
pub const MIN_SIZE: f64 = 0.01;
pub const MAX_SIZE: f64 = 2.0;

/// Return true for `#rgb`, `#rrggbb` and `#rrggbbaa` colors.
pub fn is_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Text effect applied to captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontStyle {
    #[default]
    Default,
    Raised,
    Depressed,
    Uniform,
    DropShadow,
}

impl FontStyle {
    pub const ALL: [FontStyle; 5] = [
        FontStyle::Default,
        FontStyle::Raised,
        FontStyle::Depressed,
        FontStyle::Uniform,
        FontStyle::DropShadow,
    ];

    pub fn id(self) -> &'static str {
        match self {
            FontStyle::Default => "default",
            FontStyle::Raised => "raised",
            FontStyle::Depressed => "depressed",
            FontStyle::Uniform => "uniform",
            FontStyle::DropShadow => "dropShadow",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.id() == id)
    }

    pub fn label_key(self) -> String {
        format!("settings.subtitles.textStyle.{}", self.id())
    }
}

/// Vertical caption placement. Stored as the line offset the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VerticalPosition {
    #[default]
    Default,
    Low,
}

impl From<VerticalPosition> for u8 {
    fn from(position: VerticalPosition) -> Self {
        match position {
            VerticalPosition::Default => 3,
            VerticalPosition::Low => 1,
        }
    }
}

impl TryFrom<u8> for VerticalPosition {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            3 => Ok(VerticalPosition::Default),
            1 => Ok(VerticalPosition::Low),
            other => Err(format!("invalid vertical position {}, expected 1 or 3", other)),
        }
    }
}

/// Caption appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubtitleStyling {
    /// Text color as hex.
    pub color: String,
    /// Background box opacity, 0.0 to 1.0.
    pub background_opacity: f64,
    /// Background blur strength, 0.0 to 1.0.
    pub background_blur: f64,
    /// Text scale factor (1.0 = 100%).
    pub size: f64,
    pub bold: bool,
    pub font_style: FontStyle,
    pub vertical_position: VerticalPosition,
}

impl Default for SubtitleStyling {
    fn default() -> Self {
        Self {
            color: COLORS[0].to_string(),
            background_opacity: 0.5,
            background_blur: 0.5,
            size: 1.0,
            bold: false,
            font_style: FontStyle::Default,
            vertical_position: VerticalPosition::Default,
        }
    }
}

/// Partial styling update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylingPatch {
    pub color: Option<String>,
    pub background_opacity: Option<f64>,
    pub background_blur: Option<f64>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub font_style: Option<FontStyle>,
    pub vertical_position: Option<VerticalPosition>,
}

impl StylingPatch {
    /// Patch that restores the reset defaults. Vertical position is kept.
    pub fn reset() -> Self {
        let defaults = SubtitleStyling::default();
        Self {
            color: Some(defaults.color),
            background_opacity: Some(defaults.background_opacity),
            background_blur: Some(defaults.background_blur),
            size: Some(defaults.size),
            bold: Some(defaults.bold),
            font_style: Some(defaults.font_style),
            vertical_position: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl SubtitleStyling {
    /// Merge a patch, clamping numeric fields. Non-finite numbers are ignored.
    fn apply(&mut self, patch: StylingPatch) {
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(opacity) = patch.background_opacity.filter(|v| v.is_finite()) {
            self.background_opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(blur) = patch.background_blur.filter(|v| v.is_finite()) {
            self.background_blur = blur.clamp(0.0, 1.0);
        }
        if let Some(size) = patch.size.filter(|v| v.is_finite()) {
            self.size = size.clamp(MIN_SIZE, MAX_SIZE);
        }
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(font_style) = patch.font_style {
            self.font_style = font_style;
        }
        if let Some(position) = patch.vertical_position {
            self.vertical_position = position;
        }
    }
}

/// Subtitle settings that travel together with the styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubtitleSettings {
    pub styling: SubtitleStyling,
    /// Delay applied to captions, in seconds.
    pub delay: f64,
    /// Fix all-caps captions.
    pub override_casing: bool,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            styling: SubtitleStyling::default(),
            delay: 0.0,
            override_casing: false,
        }
    }
}

impl SubtitleSettings {
    /// Pull values into the ranges the editors enforce. Non-finite numbers
    /// and non-hex colors fall back to their defaults.
    fn sanitize(&mut self) {
        let defaults = SubtitleStyling::default();
        let styling = &mut self.styling;

        if !is_hex_color(&styling.color) {
            styling.color = defaults.color;
        }
        styling.background_opacity =
            finite_or(styling.background_opacity, defaults.background_opacity).clamp(0.0, 1.0);
        styling.background_blur =
            finite_or(styling.background_blur, defaults.background_blur).clamp(0.0, 1.0);
        styling.size = finite_or(styling.size, defaults.size).clamp(MIN_SIZE, MAX_SIZE);
        self.delay = finite_or(self.delay, 0.0).clamp(MIN_DELAY, MAX_DELAY);
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Let the video element render captions natively instead of the overlay.
    pub enable_native_subtitles: bool,
}

/// On-disk document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredState {
    pub subtitles: SubtitleSettings,
    pub preferences: Preferences,
}

/// Subtitle settings with optional JSON persistence.
#[derive(Debug, Default)]
pub struct SubtitleStore {
    state: StoredState,
    path: Option<PathBuf>,
    dirty: bool,
}

impl SubtitleStore {
    /// In-memory store with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from `path`. A missing file yields defaults; the path
    /// is remembered for [`save`](Self::save).
    ///
    /// Values on disk go through the same limits as live edits; a file that
    /// needed correcting is marked dirty so the next save rewrites it.
    pub fn load(path: &Path) -> Result<Self> {
        let mut dirty = false;
        let state = if path.exists() {
            let content = fs::read_to_string(path)?;
            let loaded: StoredState = serde_json::from_str(&content)?;
            debug!("Loaded subtitle settings from {}", path.display());
            let mut state = loaded.clone();
            state.subtitles.sanitize();
            if state != loaded {
                warn!(
                    "Corrected out-of-range subtitle settings in {}",
                    path.display()
                );
                dirty = true;
            }
            state
        } else {
            debug!(
                "No subtitle settings at {}, using defaults",
                path.display()
            );
            StoredState::default()
        };

        Ok(Self {
            state,
            path: Some(path.to_path_buf()),
            dirty,
        })
    }

    /// Write the store back to its file if anything changed.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.state)?;
        fs::write(path, content)?;
        info!("Saved subtitle settings to {}", path.display());
        self.dirty = false;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> &StoredState {
        &self.state
    }

    pub fn styling(&self) -> &SubtitleStyling {
        &self.state.subtitles.styling
    }

    pub fn delay(&self) -> f64 {
        self.state.subtitles.delay
    }

    pub fn override_casing(&self) -> bool {
        self.state.subtitles.override_casing
    }

    pub fn enable_native_subtitles(&self) -> bool {
        self.state.preferences.enable_native_subtitles
    }

    /// Apply a partial styling update.
    ///
    /// Fails without changing anything if the patch carries a color that
    /// isn't a hex color.
    pub fn update_styling(&mut self, patch: StylingPatch) -> Result<()> {
        if let Some(color) = &patch.color
            && !is_hex_color(color)
        {
            return Err(Error::InvalidColor(color.clone()));
        }
        if patch.is_empty() {
            return Ok(());
        }
        self.state.subtitles.styling.apply(patch);
        self.dirty = true;
        Ok(())
    }

    /// Restore the default look (vertical position is kept).
    pub fn reset_styling(&mut self) {
        self.state.subtitles.styling.apply(StylingPatch::reset());
        self.dirty = true;
    }

    /// Set the caption delay in seconds, clamped to the supported window.
    pub fn set_delay(&mut self, delay: f64) {
        if !delay.is_finite() {
            return;
        }
        self.state.subtitles.delay = delay.clamp(MIN_DELAY, MAX_DELAY);
        self.dirty = true;
    }

    pub fn set_override_casing(&mut self, enabled: bool) {
        self.state.subtitles.override_casing = enabled;
        self.dirty = true;
    }

    pub fn set_enable_native_subtitles(&mut self, enabled: bool) {
        self.state.preferences.enable_native_subtitles = enabled;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styling() {
        let styling = SubtitleStyling::default();
        assert_eq!(styling.color, "#ffffff");
        assert_eq!(styling.background_opacity, 0.5);
        assert_eq!(styling.size, 1.0);
        assert_eq!(styling.vertical_position, VerticalPosition::Default);
    }

    #[test]
    fn test_is_hex_color() {
        for color in COLORS {
            assert!(is_hex_color(color), "{} should be valid", color);
        }
        assert!(is_hex_color("#abc"));
        assert!(!is_hex_color("ffffff"));
        assert!(!is_hex_color("#ffff"));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    fn test_update_styling_merges_partial() {
        let mut store = SubtitleStore::new();
        store
            .update_styling(StylingPatch {
                bold: Some(true),
                background_opacity: Some(0.8),
                ..Default::default()
            })
            .unwrap();

        assert!(store.styling().bold);
        assert_eq!(store.styling().background_opacity, 0.8);
        assert_eq!(store.styling().color, "#ffffff");
        assert!(store.is_dirty());
    }

    #[test]
    fn test_update_styling_clamps() {
        let mut store = SubtitleStore::new();
        store
            .update_styling(StylingPatch {
                background_opacity: Some(1.7),
                background_blur: Some(-0.2),
                size: Some(0.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.styling().background_opacity, 1.0);
        assert_eq!(store.styling().background_blur, 0.0);
        assert_eq!(store.styling().size, MIN_SIZE);

        store
            .update_styling(StylingPatch {
                size: Some(f64::NAN),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.styling().size, MIN_SIZE);
    }

    #[test]
    fn test_update_styling_rejects_bad_color() {
        let mut store = SubtitleStore::new();
        let result = store.update_styling(StylingPatch {
            color: Some("red".to_string()),
            bold: Some(true),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidColor(_))));
        assert!(!store.styling().bold);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_reset_keeps_vertical_position() {
        let mut store = SubtitleStore::new();
        store
            .update_styling(StylingPatch {
                color: Some("#e2e535".to_string()),
                size: Some(1.8),
                font_style: Some(FontStyle::DropShadow),
                vertical_position: Some(VerticalPosition::Low),
                ..Default::default()
            })
            .unwrap();

        store.reset_styling();

        let styling = store.styling();
        assert_eq!(styling.color, "#ffffff");
        assert_eq!(styling.size, 1.0);
        assert_eq!(styling.font_style, FontStyle::Default);
        assert_eq!(styling.vertical_position, VerticalPosition::Low);
    }

    #[test]
    fn test_delay_is_clamped() {
        let mut store = SubtitleStore::new();
        store.set_delay(35.0);
        assert_eq!(store.delay(), MAX_DELAY);
        store.set_delay(-2.5);
        assert_eq!(store.delay(), -2.5);
        store.set_delay(f64::INFINITY);
        assert_eq!(store.delay(), -2.5);
    }

    #[test]
    fn test_font_style_ids() {
        assert_eq!(FontStyle::from_id("dropShadow"), Some(FontStyle::DropShadow));
        assert_eq!(FontStyle::from_id("shadow"), None);
        assert_eq!(
            FontStyle::Raised.label_key(),
            "settings.subtitles.textStyle.raised"
        );
    }

    #[test]
    fn test_state_json_shape() {
        let mut state = StoredState::default();
        state.subtitles.styling.vertical_position = VerticalPosition::Low;
        state.subtitles.styling.font_style = FontStyle::DropShadow;

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["subtitles"]["styling"]["verticalPosition"], 1);
        assert_eq!(json["subtitles"]["styling"]["fontStyle"], "dropShadow");
        assert_eq!(json["subtitles"]["overrideCasing"], false);
        assert_eq!(json["preferences"]["enableNativeSubtitles"], false);
    }

    #[test]
    fn test_state_rejects_unknown_vertical_position() {
        let json = r#"{"subtitles":{"styling":{"verticalPosition":2}}}"#;
        assert!(serde_json::from_str::<StoredState>(json).is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = SubtitleStore::load(&path).unwrap();
        assert_eq!(store.state(), &StoredState::default());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state.json");

        let mut store = SubtitleStore::load(&path).unwrap();
        store.set_delay(1.5);
        store.set_override_casing(true);
        store.set_enable_native_subtitles(true);
        store
            .update_styling(StylingPatch {
                color: Some("#80b1fa".to_string()),
                ..Default::default()
            })
            .unwrap();
        store.save().unwrap();
        assert!(!store.is_dirty());

        let reloaded = SubtitleStore::load(&path).unwrap();
        assert_eq!(reloaded.delay(), 1.5);
        assert!(reloaded.override_casing());
        assert!(reloaded.enable_native_subtitles());
        assert_eq!(reloaded.styling().color, "#80b1fa");
    }

    #[test]
    fn test_save_without_changes_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = SubtitleStore::load(&path).unwrap();
        store.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_clamps_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{"subtitles":{"delay":100.0,"styling":{"color":"red","backgroundOpacity":7.0,"backgroundBlur":-1.0,"size":0.0,"bold":true}}}"#,
        )
        .unwrap();

        let mut store = SubtitleStore::load(&path).unwrap();
        assert_eq!(store.delay(), MAX_DELAY);
        assert_eq!(store.styling().color, COLORS[0]);
        assert_eq!(store.styling().background_opacity, 1.0);
        assert_eq!(store.styling().background_blur, 0.0);
        assert_eq!(store.styling().size, MIN_SIZE);
        assert!(store.styling().bold);
        assert!(store.is_dirty());

        store.save().unwrap();
        let reloaded = SubtitleStore::load(&path).unwrap();
        assert_eq!(reloaded.delay(), MAX_DELAY);
        assert_eq!(reloaded.styling().color, COLORS[0]);
        assert!(!reloaded.is_dirty());
    }

    #[test]
    fn test_load_in_range_file_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r##"{"subtitles":{"delay":-2.5,"styling":{"color":"#80b1fa","size":1.5}}}"##,
        )
        .unwrap();

        let store = SubtitleStore::load(&path).unwrap();
        assert_eq!(store.delay(), -2.5);
        assert_eq!(store.styling().size, 1.5);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_load_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(SubtitleStore::load(&path), Err(Error::Json(_))));
    }
}
