//! Top-level panel state: one owner for layout, viewport, hover and selection.
//!
//! Input arrives as discrete [`PanelEvent`]s and each one is applied to
//! completion before the next, so a gesture can never observe a half-updated
//! viewport.

use tracing::trace;

use crate::config::{Config, LayoutConfig};
use crate::interaction::{Hover, Selection, hit_test};
use crate::ir::HostGroup;
use crate::layout::{CellLayout, HostmapLayout, LayoutError, Point, compute_layout};
use crate::theme::Theme;
use crate::tooltip::Tooltip;
use crate::viewport::{Modifiers, Viewport};

/// Pointer travel, in screen pixels, below which a press and release counts as
/// a click instead of a pan.
pub const CLICK_SLOP: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Wheel { delta_y: f32, modifiers: Modifiers },
    FocusLost,
    ZoomIn,
    ZoomOut,
    FitToScreen,
    Resize { width: f32, height: f32 },
}

#[derive(Debug, Clone)]
pub struct HostmapPanel {
    layout: HostmapLayout,
    viewport: Viewport,
    selection: Selection,
    hover: Hover,
    tooltip: Option<Tooltip>,
    theme: Theme,
    width: f32,
    height: f32,
    press: Option<Point>,
    travel: f32,
}

impl HostmapPanel {
    /// Lays out `groups` and centers the scene in a `width` x `height` display
    /// at scale 1 (clamped).
    pub fn new(groups: &[HostGroup], config: &Config) -> Result<Self, LayoutError> {
        config.viewport.validate()?;
        let layout = compute_layout(groups, &config.layout)?;
        Ok(Self::from_layout(layout, config))
    }

    pub fn from_layout(layout: HostmapLayout, config: &Config) -> Self {
        let mut viewport = Viewport::new(&config.viewport);
        let (width, height) = (config.render.width, config.render.height);
        viewport.center_on(layout.bounds.center, width, height);
        Self {
            layout,
            viewport,
            selection: Selection::default(),
            hover: Hover::default(),
            tooltip: None,
            theme: config.theme.clone(),
            width,
            height,
            press: None,
            travel: 0.0,
        }
    }

    /// Recomputes the layout for new input or options. Viewport state is kept;
    /// a selection whose cell disappeared is dropped.
    pub fn relayout(&mut self, groups: &[HostGroup], config: &LayoutConfig) -> Result<(), LayoutError> {
        self.layout = compute_layout(groups, config)?;
        let still_there = self
            .selection
            .selected()
            .and_then(|selected| self.layout.cell(&selected.key))
            .cloned();
        self.selection.clear();
        self.tooltip = None;
        if let Some(cell) = still_there {
            self.select(&cell);
        }
        let hover_gone = self
            .hover
            .key()
            .is_some_and(|key| self.layout.cell(key).is_none());
        if hover_gone {
            self.hover.clear();
        }
        Ok(())
    }

    pub fn layout(&self) -> &HostmapLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hover(&self) -> &Hover {
        &self.hover
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn display_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn can_zoom_in(&self) -> bool {
        self.viewport.can_zoom_in()
    }

    pub fn can_zoom_out(&self) -> bool {
        self.viewport.can_zoom_out()
    }

    /// Applies one input event. Returns true when anything visible changed.
    pub fn handle(&mut self, event: PanelEvent) -> bool {
        trace!(?event, "panel event");
        match event {
            PanelEvent::PointerDown(screen) => {
                self.press = Some(screen);
                self.travel = 0.0;
                self.viewport.begin_pan(screen);
                false
            }
            PanelEvent::PointerMove(screen) => {
                if let Some(delta) = self.viewport.pan_to(screen) {
                    self.travel += delta.x.hypot(delta.y);
                    return delta != Point::default();
                }
                self.update_hover(screen)
            }
            PanelEvent::PointerUp(screen) => {
                if let Some(delta) = self.viewport.pan_to(screen) {
                    self.travel += delta.x.hypot(delta.y);
                }
                self.viewport.end_pan();
                let was_click = self.press.take().is_some() && self.travel <= CLICK_SLOP;
                if was_click {
                    self.click(screen);
                }
                true
            }
            PanelEvent::Wheel { delta_y, modifiers } => self.viewport.wheel(delta_y, modifiers),
            PanelEvent::FocusLost => {
                self.viewport.end_pan();
                self.press = None;
                self.hover.clear();
                true
            }
            PanelEvent::ZoomIn => self.viewport.zoom_in(),
            PanelEvent::ZoomOut => self.viewport.zoom_out(),
            PanelEvent::FitToScreen => {
                self.viewport
                    .fit_to_screen(&self.layout.bounds, self.width, self.height);
                true
            }
            PanelEvent::Resize { width, height } => {
                self.width = width.max(0.0);
                self.height = height.max(0.0);
                true
            }
        }
    }

    /// A click at `screen`: the tooltip close box clears the selection, a click
    /// inside the tooltip does nothing, a cell toggles its selection and empty
    /// canvas clears it.
    pub fn click(&mut self, screen: Point) {
        let content = self.viewport.to_content(screen);
        if let Some((close_box, rect)) = self.tooltip.as_ref().map(|t| (t.close_box, t.rect)) {
            if close_box.contains(content) {
                self.clear_selection();
                return;
            }
            if rect.contains(content) {
                return;
            }
        }
        match hit_test(&self.layout, content).cloned() {
            Some(cell) => self.select(&cell),
            None => self.clear_selection(),
        }
    }

    pub fn select_key(&mut self, key: &str) -> bool {
        match self.layout.cell(key).cloned() {
            Some(cell) => {
                self.select(&cell);
                true
            }
            None => false,
        }
    }

    fn select(&mut self, cell: &CellLayout) {
        self.selection.toggle(cell);
        self.tooltip = self
            .selection
            .selected()
            .map(|selected| Tooltip::for_host(&cell.host, selected.center, &self.theme));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.tooltip = None;
    }

    fn update_hover(&mut self, screen: Point) -> bool {
        let content = self.viewport.to_content(screen);
        let key = hit_test(&self.layout, content).map(|cell| cell.key.clone());
        if self.hover.key() == key.as_deref() {
            return false;
        }
        self.hover.set(key.as_deref());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Host;

    fn groups() -> Vec<HostGroup> {
        ["eu", "us"]
            .iter()
            .map(|name| HostGroup {
                name: name.to_string(),
                hosts: (0..6)
                    .map(|idx| Host {
                        id: format!("h{idx}"),
                        series: Vec::new(),
                    })
                    .collect(),
            })
            .collect()
    }

    fn panel() -> HostmapPanel {
        HostmapPanel::new(&groups(), &Config::default()).unwrap()
    }

    fn screen_of(panel: &HostmapPanel, key: &str) -> Point {
        let cell = panel.layout().cell(key).unwrap();
        panel.viewport().to_screen(cell.center)
    }

    fn click(panel: &mut HostmapPanel, at: Point) {
        panel.handle(PanelEvent::PointerDown(at));
        panel.handle(PanelEvent::PointerUp(at));
    }

    #[test]
    fn scene_starts_centered() {
        let panel = panel();
        let center = panel.viewport().to_screen(panel.layout().bounds.center);
        assert!((center.x - 600.0).abs() < 1e-3);
        assert!((center.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn clicking_a_cell_twice_toggles_selection() {
        let mut panel = panel();
        let at = screen_of(&panel, "eu/h2");
        click(&mut panel, at);
        assert!(panel.selection().is_selected("eu/h2"));
        assert!(panel.tooltip().is_some());
        click(&mut panel, at);
        assert_eq!(panel.selection().selected(), None);
        assert!(panel.tooltip().is_none());
    }

    #[test]
    fn clicking_empty_canvas_clears_selection() {
        let mut panel = panel();
        let at = screen_of(&panel, "us/h0");
        click(&mut panel, at);
        assert!(panel.selection().selected().is_some());
        click(&mut panel, Point::new(2.0, 790.0));
        assert_eq!(panel.selection().selected(), None);
    }

    #[test]
    fn close_box_clears_selection() {
        let mut panel = panel();
        let at = screen_of(&panel, "us/h5");
        click(&mut panel, at);
        let close = panel.tooltip().unwrap().close_box;
        let at = panel
            .viewport()
            .to_screen(Point::new(close.x + close.width / 2.0, close.y + close.height / 2.0));
        click(&mut panel, at);
        assert_eq!(panel.selection().selected(), None);
    }

    #[test]
    fn dragging_pans_without_selecting() {
        let mut panel = panel();
        let start = screen_of(&panel, "eu/h0");
        let before = panel.viewport().translation();
        panel.handle(PanelEvent::PointerDown(start));
        assert!(panel.viewport().is_panning());
        panel.handle(PanelEvent::PointerMove(Point::new(start.x + 40.0, start.y + 10.0)));
        panel.handle(PanelEvent::PointerUp(Point::new(start.x + 40.0, start.y + 10.0)));
        let after = panel.viewport().translation();
        assert!((after.x - before.x - 40.0).abs() < 1e-3);
        assert!((after.y - before.y - 10.0).abs() < 1e-3);
        assert!(!panel.viewport().is_panning());
        assert_eq!(panel.selection().selected(), None);
    }

    #[test]
    fn release_far_from_press_pans_without_selecting() {
        let mut panel = panel();
        let start = screen_of(&panel, "eu/h0");
        let end = Point::new(start.x + 200.0, start.y);
        let before = panel.viewport().translation();
        panel.handle(PanelEvent::PointerDown(start));
        panel.handle(PanelEvent::PointerUp(end));
        assert!((panel.viewport().translation().x - before.x - 200.0).abs() < 1e-3);
        assert_eq!(panel.selection().selected(), None);
        assert!(panel.tooltip().is_none());
    }

    #[test]
    fn invalid_viewport_options_fail_construction() {
        let mut config = Config::default();
        config.viewport.min_scale = f32::NAN;
        assert!(matches!(
            HostmapPanel::new(&groups(), &config),
            Err(LayoutError::InvalidScaleRange { .. })
        ));
    }

    #[test]
    fn focus_loss_cancels_pan() {
        let mut panel = panel();
        panel.handle(PanelEvent::PointerDown(Point::new(10.0, 10.0)));
        panel.handle(PanelEvent::FocusLost);
        assert!(!panel.viewport().is_panning());
        let before = panel.viewport().translation();
        panel.handle(PanelEvent::PointerMove(Point::new(90.0, 90.0)));
        assert_eq!(panel.viewport().translation(), before);
    }

    #[test]
    fn hover_follows_pointer() {
        let mut panel = panel();
        let at = screen_of(&panel, "eu/h3");
        assert!(panel.handle(PanelEvent::PointerMove(at)));
        assert!(panel.hover().is_hovered("eu/h3"));
        assert!(!panel.handle(PanelEvent::PointerMove(at)));
        panel.handle(PanelEvent::PointerMove(Point::new(1.0, 1.0)));
        assert_eq!(panel.hover().key(), None);
    }

    #[test]
    fn zoom_controls_report_limits() {
        let mut panel = panel();
        while panel.handle(PanelEvent::ZoomIn) {}
        assert!(!panel.can_zoom_in());
        assert!(panel.can_zoom_out());
        panel.handle(PanelEvent::FitToScreen);
        let (min, max) = panel.viewport().scale_limits();
        assert!(panel.viewport().scale() >= min && panel.viewport().scale() <= max);
    }

    #[test]
    fn relayout_keeps_surviving_selection() {
        let mut panel = panel();
        assert!(panel.select_key("eu/h1"));
        let mut fewer = groups();
        fewer[1].hosts.truncate(2);
        panel.relayout(&fewer, &LayoutConfig::default()).unwrap();
        assert!(panel.selection().is_selected("eu/h1"));
        assert!(panel.select_key("us/h1"));
        panel.relayout(&fewer[..1], &LayoutConfig::default()).unwrap();
        assert_eq!(panel.selection().selected(), None);
    }
}
