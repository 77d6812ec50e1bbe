// Tab Bar Manager
// YAML configuration structures and conversion helpers for the category tab bar

use std::time::Duration;

use ratatui::style::Modifier;
use serde::Deserialize;

use crate::core::{EdgeInsets, Size, DEFAULT_ANIMATION_DURATION};
use crate::elements::tab_bar::{CategoryTabBar, IndicatorWidth, TabBarConfig};
use crate::elements::tab_item::TabFont;
use crate::managers::ConfigError;
use crate::utilities::parse_color;

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                    YAML Configuration Structures                               │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

/// Font configuration from YAML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FontConfigYaml {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    /// Blank cells between characters
    #[serde(default)]
    pub letter_spacing: u16,
}

/// Indicator width from YAML: the string "dynamic" or a fixed number of cells
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IndicatorWidthYaml {
    Fixed(f64),
    Mode(String),
}

impl Default for IndicatorWidthYaml {
    fn default() -> Self {
        IndicatorWidthYaml::Mode("dynamic".to_string())
    }
}

/// Tab bar configuration from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct TabBarConfigYaml {
    /// Rows reserved for the bar (defaults to 3)
    #[serde(default = "default_height")]
    pub height: u16,
    /// Gap between neighbouring items (defaults to 2)
    #[serde(default = "default_item_spacing")]
    pub item_spacing: f64,
    #[serde(default)]
    pub bar_inset: EdgeInsets,
    /// Padding around each label (defaults to one cell left and right)
    #[serde(default = "default_item_inset")]
    pub item_inset: EdgeInsets,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_selected_text_color")]
    pub selected_text_color: String,
    #[serde(default)]
    pub font: FontConfigYaml,
    #[serde(default = "default_indicator_color")]
    pub indicator_color: String,
    #[serde(default = "default_indicator_height")]
    pub indicator_height: f64,
    #[serde(default)]
    pub indicator_width: IndicatorWidthYaml,
    #[serde(default)]
    pub default_index: usize,
    /// Indicator and strip animation length in milliseconds
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
}

fn default_height() -> u16 {
    3
}

fn default_item_spacing() -> f64 {
    2.0
}

fn default_item_inset() -> EdgeInsets {
    EdgeInsets::new(0.0, 1.0, 0.0, 1.0)
}

fn default_text_color() -> String {
    "gray".to_string()
}

fn default_selected_text_color() -> String {
    "white".to_string()
}

fn default_indicator_color() -> String {
    "cyan".to_string()
}

fn default_indicator_height() -> f64 {
    1.0
}

fn default_animation_ms() -> u64 {
    DEFAULT_ANIMATION_DURATION.as_millis() as u64
}

impl Default for TabBarConfigYaml {
    fn default() -> Self {
        Self {
            height: default_height(),
            item_spacing: default_item_spacing(),
            bar_inset: EdgeInsets::ZERO,
            item_inset: default_item_inset(),
            text_color: default_text_color(),
            selected_text_color: default_selected_text_color(),
            font: FontConfigYaml::default(),
            indicator_color: default_indicator_color(),
            indicator_height: default_indicator_height(),
            indicator_width: IndicatorWidthYaml::default(),
            default_index: 0,
            animation_ms: default_animation_ms(),
        }
    }
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                    Configuration Conversion Functions                          │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

fn non_negative(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn convert_insets(field: &'static str, insets: EdgeInsets) -> Result<EdgeInsets, ConfigError> {
    for value in [insets.top, insets.left, insets.bottom, insets.right] {
        non_negative(field, value)?;
    }
    Ok(insets)
}

fn convert_font(font: &FontConfigYaml) -> TabFont {
    let mut modifier = Modifier::empty();
    if font.bold {
        modifier |= Modifier::BOLD;
    }
    if font.italic {
        modifier |= Modifier::ITALIC;
    }
    TabFont::new(modifier).with_letter_spacing(font.letter_spacing)
}

fn convert_indicator_width(width: &IndicatorWidthYaml) -> Result<IndicatorWidth, ConfigError> {
    match width {
        IndicatorWidthYaml::Fixed(value) => Ok(IndicatorWidth::Fixed(non_negative("indicator_width", *value)?)),
        IndicatorWidthYaml::Mode(mode) if mode.trim().eq_ignore_ascii_case("dynamic") => Ok(IndicatorWidth::Dynamic),
        IndicatorWidthYaml::Mode(mode) => Err(ConfigError::UnknownIndicatorWidth(mode.clone())),
    }
}

/// Convert YAML tab bar configuration to widget configuration
pub fn convert_tab_bar_config(config: &TabBarConfigYaml) -> Result<TabBarConfig, ConfigError> {
    Ok(TabBarConfig {
        item_spacing: non_negative("item_spacing", config.item_spacing)?,
        bar_inset: convert_insets("bar_inset", config.bar_inset)?,
        item_inset: convert_insets("item_inset", config.item_inset)?,
        text_color: parse_color("text_color", &config.text_color)?,
        selected_text_color: parse_color("selected_text_color", &config.selected_text_color)?,
        font: convert_font(&config.font),
        indicator_color: parse_color("indicator_color", &config.indicator_color)?,
        indicator_height: non_negative("indicator_height", config.indicator_height)?,
        indicator_width: convert_indicator_width(&config.indicator_width)?,
        default_index: config.default_index,
        animation_duration: Duration::from_millis(config.animation_ms),
    })
}

/// Create a tab bar from YAML configuration, sized to `width` columns and the configured height
pub fn create_tab_bar_from_config<I, S>(
    config: &TabBarConfigYaml,
    titles: I,
    width: u16,
) -> Result<CategoryTabBar, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tab_bar_config = convert_tab_bar_config(config)?;
    let size = Size::new(width as f64, config.height as f64);
    Ok(CategoryTabBar::with_titles(titles, size, tab_bar_config))
}
