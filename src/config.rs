use crate::layout::{LayoutError, LayoutMode};
use crate::theme::{Theme, ThresholdStep};
use crate::viewport::ZoomMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hexagon radius used by the panel; not user configurable there either.
pub const DEFAULT_RADIUS: f32 = 50.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub hosts_per_row: usize,
    pub hex_spacing: f32,
    pub radius: f32,
    /// Horizontal gap between group boxes. `None` means twice the hex spacing.
    pub group_gap_x: Option<f32>,
    /// Vertical gap between group boxes. Unused by the wide layout, which
    /// only has one row of groups.
    pub group_gap_y: Option<f32>,
    pub layout_mode: LayoutMode,
    pub group_by_label: String,
    pub node_id_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hosts_per_row: 5,
            hex_spacing: 10.0,
            radius: DEFAULT_RADIUS,
            group_gap_x: None,
            group_gap_y: None,
            layout_mode: LayoutMode::Wide,
            group_by_label: String::new(),
            node_id_label: String::new(),
        }
    }
}

impl LayoutConfig {
    pub fn group_gap(&self) -> (f32, f32) {
        let fallback = self.hex_spacing * 2.0;
        (
            self.group_gap_x.unwrap_or(fallback),
            self.group_gap_y.unwrap_or(fallback),
        )
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.hosts_per_row < 1 {
            return Err(LayoutError::InvalidHostsPerRow(self.hosts_per_row));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(LayoutError::InvalidRadius(self.radius));
        }
        let (gap_x, gap_y) = self.group_gap();
        for (name, value) in [
            ("hexSpacing", self.hex_spacing),
            ("groupGapX", gap_x),
            ("groupGapY", gap_y),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidSpacing { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub zoom_mode: ZoomMode,
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_step: f32,
    /// Extra content-space room added to both axes when fitting to screen.
    pub fit_padding: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_mode: ZoomMode::Cooperative,
            min_scale: 0.13,
            max_scale: 2.25,
            zoom_step: 1.5,
            fit_padding: 40.0,
        }
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(LayoutError::InvalidScaleRange { min, max });
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(LayoutError::InvalidZoomStep(self.zoom_step));
        }
        if !self.fit_padding.is_finite() || self.fit_padding < 0.0 {
            return Err(LayoutError::InvalidFitPadding(self.fit_padding));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::light();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            viewport: ViewportConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThresholdFile {
    value: Option<f64>,
    color: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    hosts_per_row: Option<usize>,
    group_by_label: Option<String>,
    node_id_label: Option<String>,
    hex_spacing: Option<f32>,
    radius: Option<f32>,
    group_gap_x: Option<f32>,
    group_gap_y: Option<f32>,
    zoom_mode: Option<String>,
    layout_mode: Option<String>,
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    zoom_step: Option<f32>,
    fit_padding: Option<f32>,
    thresholds: Option<Vec<ThresholdFile>>,
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON5 options document on top of the defaults. Unknown layout or
/// zoom modes are rejected rather than silently replaced by a default.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = match theme_name {
            "dark" => Theme::dark(),
            "light" | "default" => Theme::light(),
            other => anyhow::bail!("unknown theme `{other}` (expected one of: light, dark)"),
        };
        config.render.background = config.theme.background.clone();
    }
    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.theme.font_size = v;
    }
    if let Some(steps) = parsed.thresholds {
        config.theme.thresholds = steps
            .into_iter()
            .map(|step| ThresholdStep {
                value: step.value,
                color: step.color,
            })
            .collect();
    }

    if let Some(v) = parsed.hosts_per_row {
        config.layout.hosts_per_row = v;
    }
    if let Some(v) = parsed.group_by_label {
        config.layout.group_by_label = v;
    }
    if let Some(v) = parsed.node_id_label {
        config.layout.node_id_label = v;
    }
    if let Some(v) = parsed.hex_spacing {
        config.layout.hex_spacing = v;
    }
    if let Some(v) = parsed.radius {
        config.layout.radius = v;
    }
    if parsed.group_gap_x.is_some() {
        config.layout.group_gap_x = parsed.group_gap_x;
    }
    if parsed.group_gap_y.is_some() {
        config.layout.group_gap_y = parsed.group_gap_y;
    }
    if let Some(v) = parsed.layout_mode.as_deref() {
        config.layout.layout_mode = v.parse()?;
    }

    if let Some(v) = parsed.zoom_mode.as_deref() {
        config.viewport.zoom_mode = v.parse()?;
    }
    if let Some(v) = parsed.min_scale {
        config.viewport.min_scale = v;
    }
    if let Some(v) = parsed.max_scale {
        config.viewport.max_scale = v;
    }
    if let Some(v) = parsed.zoom_step {
        config.viewport.zoom_step = v;
    }
    if let Some(v) = parsed.fit_padding {
        config.viewport.fit_padding = v;
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }
    if let Some(v) = parsed.background {
        config.render.background = v;
    }

    config.layout.validate()?;
    config.viewport.validate()?;
    Ok(config)
}
