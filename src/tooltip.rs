use crate::ir::Host;
use crate::layout::{Point, Rect};
use crate::text_metrics::text_width;
use crate::theme::Theme;

pub const TOOLTIP_TITLE: &str = "Host Details";
pub const TOOLTIP_PADDING: f32 = 6.0;
pub const TOOLTIP_LINE_HEIGHT: f32 = 14.0;
pub const TOOLTIP_FONT_SIZE: f32 = 12.0;
/// Offset of the box from the host center, right and up.
pub const TOOLTIP_OFFSET: f32 = 12.0;
pub const CLOSE_BOX_SIZE: f32 = 12.0;

/// Detail box for the selected host, in content coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
    pub rect: Rect,
    pub close_box: Rect,
}

impl Tooltip {
    pub fn for_host(host: &Host, anchor: Point, theme: &Theme) -> Self {
        let lines = tooltip_lines(host);
        let widest = lines
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(TOOLTIP_TITLE))
            .map(|line| text_width(line, TOOLTIP_FONT_SIZE, &theme.font_family))
            .fold(0.0_f32, f32::max);
        // Room for the close box next to the title.
        let width = widest + TOOLTIP_PADDING * 2.0 + CLOSE_BOX_SIZE;
        let height = TOOLTIP_LINE_HEIGHT + lines.len() as f32 * TOOLTIP_LINE_HEIGHT + TOOLTIP_PADDING * 2.0;
        let rect = Rect {
            x: anchor.x + TOOLTIP_OFFSET,
            y: anchor.y - height - TOOLTIP_OFFSET,
            width,
            height,
        };
        let close_box = Rect {
            x: rect.x + width - 18.0,
            y: rect.y + 6.0,
            width: CLOSE_BOX_SIZE,
            height: CLOSE_BOX_SIZE,
        };
        Self {
            title: TOOLTIP_TITLE.to_string(),
            lines,
            rect,
            close_box,
        }
    }
}

/// One `name: value` line per series, then one `key: value` line per label.
pub fn tooltip_lines(host: &Host) -> Vec<String> {
    let values = host.series.iter().map(|series| {
        let name = if series.ref_id.is_empty() {
            "Unknown"
        } else {
            series.ref_id.as_str()
        };
        format!("{name}: {}", format_value(series.latest()))
    });
    let labels = host
        .merged_labels()
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}"));
    values.chain(labels).collect()
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        None => "No data".to_string(),
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) if v.is_infinite() => if v > 0.0 { "+Inf" } else { "-Inf" }.to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => {
            let text = format!("{v:.2}");
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Series;

    fn host() -> Host {
        Host {
            id: "web-1".to_string(),
            series: vec![
                Series {
                    ref_id: "cpu".to_string(),
                    labels: [("host".to_string(), "web-1".to_string())].into(),
                    values: vec![Some(0.5), Some(0.25)],
                },
                Series {
                    ref_id: String::new(),
                    labels: [("dc".to_string(), "eu".to_string())].into(),
                    values: vec![],
                },
            ],
        }
    }

    #[test]
    fn lines_list_values_then_labels() {
        assert_eq!(
            tooltip_lines(&host()),
            vec!["cpu: 0.25", "Unknown: No data", "dc: eu", "host: web-1"]
        );
    }

    #[test]
    fn box_sits_above_and_right_of_the_anchor() {
        let tooltip = Tooltip::for_host(&host(), Point::new(100.0, 100.0), &Theme::light());
        assert_eq!(tooltip.rect.x, 112.0);
        assert!((tooltip.rect.bottom() - 88.0).abs() < 1e-4);
        assert_eq!(tooltip.rect.height, 14.0 + 4.0 * 14.0 + 12.0);
        assert!(tooltip.rect.contains(Point::new(tooltip.close_box.x, tooltip.close_box.y)));
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(Some(3.0)), "3");
        assert_eq!(format_value(Some(0.126)), "0.13");
        assert_eq!(format_value(Some(1.5)), "1.5");
        assert_eq!(format_value(None), "No data");
    }
}
