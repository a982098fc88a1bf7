use hostmap_renderer::layout::Point;
use hostmap_renderer::{
    HostmapPanel, Modifiers, PanelEvent, RenderOptions, build_panel, render_svg,
    render_with_options,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostmapRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    hosts_per_row: Option<usize>,
    group_by_label: Option<String>,
    node_id_label: Option<String>,
    hex_spacing: Option<f32>,
    zoom_mode: Option<String>,
    layout_mode: Option<String>,
    fit: Option<bool>,
    select: Option<String>,
}

fn build_render_options(options: HostmapRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = if options.theme.as_deref() == Some("dark") {
        RenderOptions::dark()
    } else {
        RenderOptions::light()
    };
    let config = &mut render_options.config;

    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(n) = options.hosts_per_row {
        config.layout.hosts_per_row = n;
    }
    if let Some(label) = options.group_by_label {
        config.layout.group_by_label = label;
    }
    if let Some(label) = options.node_id_label {
        config.layout.node_id_label = label;
    }
    if let Some(spacing) = options.hex_spacing {
        config.layout.hex_spacing = spacing;
    }
    if let Some(mode) = options.zoom_mode.as_deref() {
        config.viewport.zoom_mode = mode.parse().map_err(|error: hostmap_renderer::LayoutError| error.to_string())?;
    }
    if let Some(mode) = options.layout_mode.as_deref() {
        config.layout.layout_mode = mode.parse().map_err(|error: hostmap_renderer::LayoutError| error.to_string())?;
    }
    render_options.fit_to_screen = options.fit.unwrap_or(false);
    render_options.select = options.select;
    Ok(render_options)
}

fn parse_options(options_json: Option<String>) -> Result<RenderOptions, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<HostmapRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        HostmapRenderOptions::default()
    };
    build_render_options(options).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_hostmap_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = parse_options(options_json)?;
    render_with_options(input, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Interactive panel for hosts that forward pointer and wheel input.
#[wasm_bindgen]
pub struct HostmapView {
    panel: HostmapPanel,
    options: RenderOptions,
}

#[wasm_bindgen]
impl HostmapView {
    #[wasm_bindgen(constructor)]
    pub fn new(input: &str, options_json: Option<String>) -> Result<HostmapView, JsValue> {
        let options = parse_options(options_json)?;
        let panel = build_panel(input, &options).map_err(|error| JsValue::from_str(&error.to_string()))?;
        Ok(HostmapView { panel, options })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.panel.handle(PanelEvent::PointerDown(Point::new(x, y)))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.panel.handle(PanelEvent::PointerMove(Point::new(x, y)))
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.panel.handle(PanelEvent::PointerUp(Point::new(x, y)))
    }

    pub fn wheel(&mut self, delta_y: f32, ctrl: bool, meta: bool) -> bool {
        let modifiers = Modifiers {
            ctrl,
            meta,
            ..Modifiers::NONE
        };
        self.panel.handle(PanelEvent::Wheel { delta_y, modifiers })
    }

    pub fn focus_lost(&mut self) -> bool {
        self.panel.handle(PanelEvent::FocusLost)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.panel.handle(PanelEvent::ZoomIn)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.panel.handle(PanelEvent::ZoomOut)
    }

    pub fn fit_to_screen(&mut self) -> bool {
        self.panel.handle(PanelEvent::FitToScreen)
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.options.config.render.width = width;
        self.options.config.render.height = height;
        self.panel.handle(PanelEvent::Resize { width, height })
    }

    pub fn selected_key(&self) -> Option<String> {
        self.panel.selection().selected().map(|selected| selected.key.clone())
    }

    pub fn render(&self) -> String {
        render_svg(&self.panel, &self.options.config.render)
    }
}

#[cfg(test)]
mod tests {
    use hostmap_renderer::LayoutMode;
    use hostmap_renderer::render_with_options;

    use crate::{HostmapRenderOptions, HostmapView, build_render_options};

    const INPUT: &str = r#"node_load1{instance="a",dc="eu"} 0.5
node_load1{instance="b",dc="eu"} 95
node_load1{instance="c",dc="us"} 12"#;

    #[test]
    fn renders_grouped_exposition() {
        let options = HostmapRenderOptions {
            group_by_label: Some("dc".to_string()),
            node_id_label: Some("instance".to_string()),
            ..HostmapRenderOptions::default()
        };
        let svg = render_with_options(INPUT, build_render_options(options).unwrap())
            .expect("grouped exposition should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("data-group=\"us\""));
        assert_eq!(svg.matches("<polygon").count(), 3);
    }

    #[test]
    fn unknown_zoom_mode_is_rejected() {
        let options = HostmapRenderOptions {
            zoom_mode: Some("sideways".to_string()),
            ..HostmapRenderOptions::default()
        };
        assert!(build_render_options(options).is_err());
    }

    #[test]
    fn layout_mode_is_parsed_and_unknown_modes_rejected() {
        let options = HostmapRenderOptions {
            layout_mode: Some("wide".to_string()),
            ..HostmapRenderOptions::default()
        };
        let render_options = build_render_options(options).unwrap();
        assert_eq!(render_options.config.layout.layout_mode, LayoutMode::Wide);

        let options = HostmapRenderOptions {
            layout_mode: Some("compact".to_string()),
            ..HostmapRenderOptions::default()
        };
        let err = build_render_options(options).unwrap_err();
        assert!(err.contains("unknown layout mode `compact`"), "{err}");
    }

    #[test]
    fn view_selects_on_click() {
        let raw = r#"{"groupByLabel": "dc", "nodeIdLabel": "instance"}"#.to_string();
        let mut view = HostmapView::new(INPUT, Some(raw)).unwrap();
        let center = view.panel.layout().cell("eu/b").unwrap().center;
        let at = view.panel.viewport().to_screen(center);
        view.pointer_down(at.x, at.y);
        view.pointer_up(at.x, at.y);
        assert_eq!(view.selected_key().as_deref(), Some("eu/b"));
        assert!(view.render().contains("Host Details"));
    }
}
