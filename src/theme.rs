use serde::{Deserialize, Serialize};

/// One threshold step. The step without a value is the base color used below
/// the first valued step and for hosts without data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStep {
    pub value: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub secondary_text_color: String,
    pub panel_background: String,
    pub panel_border: String,
    pub host_border: String,
    pub tooltip_background: String,
    pub control_background: String,
    pub background: String,
    pub thresholds: Vec<ThresholdStep>,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Helvetica, Arial, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#24292E".to_string(),
            secondary_text_color: "#5A6171".to_string(),
            panel_background: "#F4F5F5".to_string(),
            panel_border: "#C7D0D9".to_string(),
            host_border: "#3D71D9".to_string(),
            tooltip_background: "#F4F5F5".to_string(),
            control_background: "rgba(255, 255, 255, 0.9)".to_string(),
            background: "#FFFFFF".to_string(),
            thresholds: default_thresholds(),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Helvetica, Arial, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#CCCCDC".to_string(),
            secondary_text_color: "#9D9DA6".to_string(),
            panel_background: "#22252B".to_string(),
            panel_border: "#3A3D44".to_string(),
            host_border: "#6E9FFF".to_string(),
            tooltip_background: "#22252B".to_string(),
            control_background: "rgba(24, 27, 31, 0.9)".to_string(),
            background: "#111217".to_string(),
            thresholds: default_thresholds(),
        }
    }

    /// Color of the last step whose value is at or below `value`.
    pub fn threshold_color(&self, value: Option<f64>) -> &str {
        let base = self
            .thresholds
            .iter()
            .find(|step| step.value.is_none())
            .or_else(|| self.thresholds.first())
            .map(|step| step.color.as_str())
            .unwrap_or("#73BF69");
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return base;
        };
        let mut active = base;
        let mut active_value = f64::NEG_INFINITY;
        for step in &self.thresholds {
            if let Some(limit) = step.value
                && limit <= value
                && limit >= active_value
            {
                active = step.color.as_str();
                active_value = limit;
            }
        }
        active
    }
}

fn default_thresholds() -> Vec<ThresholdStep> {
    vec![
        ThresholdStep {
            value: None,
            color: "#73BF69".to_string(),
        },
        ThresholdStep {
            value: Some(80.0),
            color: "#F2495C".to_string(),
        },
    ]
}
