#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod panel;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod tooltip;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, ViewportConfig};
pub use ir::{Host, HostGroup, Series, group_by};
pub use layout::{HostmapLayout, LayoutError, LayoutMode, compute_layout};
pub use panel::{HostmapPanel, PanelEvent};
pub use parser::{ParseError, parse_input};
pub use render::render_svg;
pub use theme::Theme;
pub use viewport::{Modifiers, Viewport, ZoomMode};

/// Everything needed to go from raw series input to a rendered panel.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
    /// Fit the whole scene to the display instead of centering it at 100%.
    pub fit_to_screen: bool,
    /// Cell key (`"{group}/{node id}"`) to select before rendering.
    pub select: Option<String>,
}

impl RenderOptions {
    pub fn light() -> Self {
        Self::default()
    }

    pub fn dark() -> Self {
        let mut options = Self::default();
        options.config.theme = Theme::dark();
        options.config.render.background = options.config.theme.background.clone();
        options
    }
}

/// Parses `input`, groups it, lays it out and applies the initial viewport and
/// selection requested by `options`.
pub fn build_panel(input: &str, options: &RenderOptions) -> anyhow::Result<HostmapPanel> {
    let series = parse_input(input)?;
    let layout_cfg = &options.config.layout;
    let groups = group_by(&series, &layout_cfg.group_by_label, &layout_cfg.node_id_label);
    let mut panel = HostmapPanel::new(&groups, &options.config)?;
    if options.fit_to_screen {
        panel.handle(PanelEvent::FitToScreen);
    }
    if let Some(key) = options.select.as_deref()
        && !panel.select_key(key)
    {
        anyhow::bail!("no host with key `{key}` in the layout");
    }
    Ok(panel)
}

pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let panel = build_panel(input, &options)?;
    Ok(render_svg(&panel, &options.config.render))
}
