use crate::config::RenderConfig;
use crate::interaction::hexagon_points;
use crate::ir::DEFAULT_GROUP;
use crate::layout::GroupLayout;
use crate::panel::HostmapPanel;
use crate::theme::Theme;
use crate::tooltip::{TOOLTIP_FONT_SIZE, TOOLTIP_LINE_HEIGHT, TOOLTIP_PADDING, Tooltip};
use anyhow::Result;
use std::path::Path;

const HEADER_PADDING: f32 = 6.0;
const CONTROL_SIZE: f32 = 32.0;
const CONTROL_GAP: f32 = 6.0;
const CONTROL_MARGIN: f32 = 8.0;

/// Renders the panel as a standalone SVG document of the display size. Every
/// content primitive sits inside one group transformed by the viewport.
pub fn render_svg(panel: &HostmapPanel, config: &RenderConfig) -> String {
    let theme = panel.theme();
    let (width, height) = panel.display_size();
    let viewport = panel.viewport();
    let translation = viewport.translation();
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    svg.push_str(&format!(
        "<g class=\"hostmap-content\" transform=\"translate({:.2}, {:.2}) scale({:.4})\">",
        translation.x,
        translation.y,
        viewport.scale()
    ));
    for group in &panel.layout().groups {
        svg.push_str(&group_svg(panel, group, theme));
    }
    if let Some(tooltip) = panel.tooltip() {
        svg.push_str(&tooltip_svg(tooltip, theme));
    }
    svg.push_str("</g>");

    svg.push_str(&controls_svg(panel, theme, width));
    svg.push_str("</svg>");
    svg
}

fn group_svg(panel: &HostmapPanel, group: &GroupLayout, theme: &Theme) -> String {
    let mut out = String::new();
    if group.cells.is_empty() {
        return out;
    }
    let show_header = group.name != DEFAULT_GROUP;
    let header_height = if show_header {
        theme.font_size + HEADER_PADDING * 2.0
    } else {
        0.0
    };
    let rect = group.rect;

    out.push_str(&format!(
        "<g class=\"hostmap-group\" data-group=\"{}\">",
        escape_xml(&group.name)
    ));
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\" stroke=\"{}\"/>",
        rect.x,
        rect.y - header_height,
        rect.width,
        rect.height + header_height,
        theme.panel_background,
        theme.panel_border
    ));
    if show_header {
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            rect.x + rect.width / 2.0,
            rect.y - HEADER_PADDING / 2.0,
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.text_color,
            escape_xml(&group.name)
        ));
    }

    let radius = panel.layout().metrics.radius;
    for cell in &group.cells {
        let hovered = panel.hover().is_hovered(&cell.key);
        let (stroke_width, opacity) = if hovered { (3, "1") } else { (1, "0.7") };
        let points = hexagon_points(cell.center, radius)
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            "<polygon data-key=\"{}\" points=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\"/>",
            escape_xml(&cell.key),
            points,
            theme.threshold_color(cell.host.latest()),
            theme.host_border,
            stroke_width,
            opacity
        ));
    }
    out.push_str("</g>");
    out
}

fn tooltip_svg(tooltip: &Tooltip, theme: &Theme) -> String {
    let mut out = String::from("<g class=\"hostmap-tooltip\">");
    let rect = tooltip.rect;
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\"/>",
        rect.x, rect.y, rect.width, rect.height, theme.tooltip_background, theme.panel_border
    ));

    let close = tooltip.close_box;
    out.push_str(&format!(
        "<g class=\"hostmap-tooltip-close\" transform=\"translate({:.2}, {:.2})\"><rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" rx=\"2\" ry=\"2\" fill=\"{}\" stroke=\"{}\"/><text x=\"6\" y=\"9\" text-anchor=\"middle\" font-size=\"10\" font-weight=\"700\" fill=\"{}\">x</text></g>",
        close.x, close.y, close.width, close.height, theme.background, theme.panel_border, theme.text_color
    ));

    let text_x = rect.x + TOOLTIP_PADDING;
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
        text_x,
        rect.y + TOOLTIP_PADDING + TOOLTIP_LINE_HEIGHT / 2.0,
        escape_xml(&theme.font_family),
        TOOLTIP_FONT_SIZE,
        theme.text_color,
        escape_xml(&tooltip.title)
    ));
    for (idx, line) in tooltip.lines.iter().enumerate() {
        let y = rect.y
            + TOOLTIP_PADDING * 2.0
            + TOOLTIP_LINE_HEIGHT
            + TOOLTIP_LINE_HEIGHT / 2.0
            + idx as f32 * TOOLTIP_LINE_HEIGHT;
        out.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            escape_xml(&theme.font_family),
            TOOLTIP_FONT_SIZE,
            theme.secondary_text_color,
            escape_xml(line)
        ));
    }
    out.push_str("</g>");
    out
}

/// Zoom in / zoom out / fit buttons and the scale indicator, in screen space.
fn controls_svg(panel: &HostmapPanel, theme: &Theme, width: f32) -> String {
    let x = width - CONTROL_MARGIN - CONTROL_SIZE;
    let mut out = String::from("<g class=\"hostmap-controls\">");
    let buttons = [
        ("zoom in", "+", panel.can_zoom_in()),
        ("zoom out", "-", panel.can_zoom_out()),
        ("fit to screen", "\u{2922}", true),
    ];
    for (idx, (label, glyph, enabled)) in buttons.iter().enumerate() {
        let y = CONTROL_MARGIN + idx as f32 * (CONTROL_SIZE + CONTROL_GAP);
        let opacity = if *enabled { "1" } else { "0.4" };
        out.push_str(&format!(
            "<g aria-label=\"{label}\" opacity=\"{opacity}\"><rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{CONTROL_SIZE}\" height=\"{CONTROL_SIZE}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"rgba(0, 0, 0, 0.2)\"/><text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-size=\"18\" fill=\"{}\">{glyph}</text></g>",
            theme.control_background,
            x + CONTROL_SIZE / 2.0,
            y + CONTROL_SIZE / 2.0,
            theme.text_color
        ));
    }
    let indicator_y = CONTROL_MARGIN + 3.0 * (CONTROL_SIZE + CONTROL_GAP) + 12.0;
    out.push_str(&format!(
        "<text class=\"hostmap-zoom\" x=\"{:.2}\" y=\"{indicator_y:.2}\" text-anchor=\"middle\" font-size=\"12\" fill=\"{}\">{}%</text>",
        x + CONTROL_SIZE / 2.0,
        theme.text_color,
        zoom_percent(panel.viewport().scale())
    ));
    out.push_str("</g>");
    out
}

pub fn zoom_percent(scale: f32) -> i32 {
    (scale * 100.0).round() as i32
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ir::{Host, HostGroup, Series};
    use crate::panel::PanelEvent;

    fn panel() -> HostmapPanel {
        let groups = vec![
            HostGroup {
                name: "eu <west>".to_string(),
                hosts: vec![Host {
                    id: "a".to_string(),
                    series: vec![Series {
                        ref_id: "cpu".to_string(),
                        labels: Default::default(),
                        values: vec![Some(95.0)],
                    }],
                }],
            },
            HostGroup {
                name: DEFAULT_GROUP.to_string(),
                hosts: vec![Host {
                    id: "b".to_string(),
                    series: Vec::new(),
                }],
            },
        ];
        HostmapPanel::new(&groups, &Config::default()).unwrap()
    }

    #[test]
    fn render_svg_basic() {
        let panel = panel();
        let svg = render_svg(&panel, &Config::default().render);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert!(svg.contains("eu &lt;west&gt;"));
        assert!(svg.contains("#F2495C"));
        assert!(svg.contains(">100%</text>"));
    }

    #[test]
    fn default_group_has_no_header() {
        let svg = render_svg(&panel(), &Config::default().render);
        assert_eq!(svg.matches("font-weight=\"bold\"").count(), 1);
    }

    #[test]
    fn selected_host_renders_tooltip() {
        let mut panel = panel();
        assert!(panel.select_key("eu <west>/a"));
        panel.handle(PanelEvent::ZoomIn);
        let svg = render_svg(&panel, &Config::default().render);
        assert!(svg.contains("Host Details"));
        assert!(svg.contains("cpu: 95"));
        assert!(svg.contains(">150%</text>"));
    }
}
