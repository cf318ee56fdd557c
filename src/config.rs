use anyhow::{Context, bail};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub popup: PopupConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            popup: PopupConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("failed to parse popup config")?;
        config.popup.placement.validate()?;
        Ok(config)
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<Config> {
    debug!("Reading config from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    Config::from_toml_str(&content).with_context(|| format!("invalid config file {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub placement: PlacementConfig,
    /// Keys that close the popup when pressed on the trigger. Empty means any key.
    pub close_keys: CloseKeys,
    pub animation_ms: u64,
    /// Vertical distance the surface slides in from, in pixels.
    pub slide_distance: f32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            close_keys: CloseKeys::Any,
            animation_ms: 250,
            slide_distance: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Space between the trigger's bottom edge and the popup.
    pub gap: f32,
    /// Distance of a right-aligned arrow from the popup's right edge.
    pub arrow_margin: f32,
    pub strategy: OverflowStrategy,
    pub frame: ReferenceFrame,
    /// Only used by [`OverflowStrategy::ShiftAndMark`]: never shift past the container's left edge.
    pub clamp_left: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: 16.0,
            arrow_margin: 16.0,
            strategy: OverflowStrategy::default(),
            frame: ReferenceFrame::default(),
            clamp_left: false,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.gap.is_finite() || self.gap < 0.0 {
            bail!("placement gap must be a non-negative number, got {}", self.gap);
        }
        if !self.arrow_margin.is_finite() || self.arrow_margin < 0.0 {
            bail!(
                "placement arrow_margin must be a non-negative number, got {}",
                self.arrow_margin
            );
        }
        Ok(())
    }
}

/// How a popup that would run past the container's right edge is moved back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowStrategy {
    /// Right-justify against the trigger, or keep the overflow if that would go negative.
    #[default]
    ClampOrFlip,
    /// Shift left by the overflow and report the shift for the arrow.
    ShiftAndMark,
}

/// Coordinate space the popup is positioned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceFrame {
    /// Document coordinates, overflow checked against the body.
    #[default]
    Document,
    /// Coordinates relative to the trigger's parent element, overflow checked against it.
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Character(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Key>", into = "Vec<Key>")]
pub enum CloseKeys {
    #[default]
    Any,
    Only(Vec<Key>),
}

impl CloseKeys {
    pub fn closes_on(&self, key: &Key) -> bool {
        match self {
            CloseKeys::Any => true,
            CloseKeys::Only(keys) => keys.contains(key),
        }
    }
}

impl From<Vec<Key>> for CloseKeys {
    fn from(keys: Vec<Key>) -> Self {
        if keys.is_empty() {
            CloseKeys::Any
        } else {
            CloseKeys::Only(keys)
        }
    }
}

impl From<CloseKeys> for Vec<Key> {
    fn from(keys: CloseKeys) -> Self {
        match keys {
            CloseKeys::Any => Vec::new(),
            CloseKeys::Only(keys) => keys,
        }
    }
}
