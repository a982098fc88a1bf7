//! Pan and zoom state for one panel.
//!
//! Content is mapped to the screen as `screen = translation + scale * content`.
//! The translation is in screen pixels and is never clamped, so the content can
//! be dragged off screen. The scale always stays inside the configured range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::ViewportConfig;
use crate::layout::{Bounds, LayoutError, Point};

/// Which wheel gestures zoom the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomMode {
    /// Wheel zooms only while Ctrl or Cmd is held; a plain wheel scrolls the page.
    #[default]
    Cooperative,
    /// Every wheel gesture zooms.
    Greedy,
}

impl ZoomMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomMode::Cooperative => "cooperative",
            ZoomMode::Greedy => "greedy",
        }
    }
}

impl FromStr for ZoomMode {
    type Err = LayoutError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            "cooperative" => Ok(ZoomMode::Cooperative),
            "greedy" => Ok(ZoomMode::Greedy),
            other => Err(LayoutError::UnknownZoomMode(other.to_string())),
        }
    }
}

impl fmt::Display for ZoomMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        shift: false,
        alt: false,
    };
}

#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f32,
    translation: Point,
    panning: bool,
    last_pointer: Option<Point>,
    min_scale: f32,
    max_scale: f32,
    step: f32,
    fit_padding: f32,
    zoom_mode: ZoomMode,
}

impl Viewport {
    /// Starts at scale 1 (clamped into range) with no translation. Settings
    /// that fail [`ViewportConfig::validate`] are replaced by the defaults.
    pub fn new(config: &ViewportConfig) -> Self {
        let fallback;
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(%err, "invalid viewport settings, using defaults");
                fallback = ViewportConfig {
                    zoom_mode: config.zoom_mode,
                    ..ViewportConfig::default()
                };
                &fallback
            }
        };
        let (min_scale, max_scale) = (config.min_scale, config.max_scale);
        Self {
            scale: 1.0_f32.clamp(min_scale, max_scale),
            translation: Point::default(),
            panning: false,
            last_pointer: None,
            min_scale,
            max_scale,
            step: config.zoom_step,
            fit_padding: config.fit_padding,
            zoom_mode: config.zoom_mode,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn zoom_mode(&self) -> ZoomMode {
        self.zoom_mode
    }

    pub fn scale_limits(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    /// Sets the scale, clamped into range. Non-finite values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            return;
        }
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    pub fn set_translation(&mut self, translation: Point) {
        self.translation = translation;
    }

    pub fn can_zoom_in(&self) -> bool {
        self.scale < self.max_scale
    }

    pub fn can_zoom_out(&self) -> bool {
        self.scale > self.min_scale
    }

    /// One zoom step in. Returns false, and does nothing, at the upper bound.
    pub fn zoom_in(&mut self) -> bool {
        if !self.can_zoom_in() {
            return false;
        }
        self.set_scale(self.scale * self.step);
        debug!(scale = self.scale, "zoom in");
        true
    }

    /// One zoom step out. Returns false, and does nothing, at the lower bound.
    pub fn zoom_out(&mut self) -> bool {
        if !self.can_zoom_out() {
            return false;
        }
        self.set_scale(self.scale / self.step);
        debug!(scale = self.scale, "zoom out");
        true
    }

    /// Scales the content to fit the display with some padding and moves the
    /// content center to the display center.
    pub fn fit_to_screen(&mut self, bounds: &Bounds, display_width: f32, display_height: f32) {
        let sx = display_width / (bounds.width() + self.fit_padding);
        let sy = display_height / (bounds.height() + self.fit_padding);
        let target = sx.min(sy);
        if target.is_finite() {
            self.set_scale(target);
        } else {
            self.set_scale(self.max_scale);
        }
        self.center_on(bounds.center, display_width, display_height);
        debug!(
            target,
            scale = self.scale,
            tx = self.translation.x,
            ty = self.translation.y,
            "fit to screen"
        );
    }

    /// Keeps the scale and moves `content` to the middle of the display.
    pub fn center_on(&mut self, content: Point, display_width: f32, display_height: f32) {
        self.translation = Point::new(
            display_width / 2.0 - self.scale * content.x,
            display_height / 2.0 - self.scale * content.y,
        );
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.translation.x += dx;
        self.translation.y += dy;
    }

    pub fn begin_pan(&mut self, screen: Point) {
        self.panning = true;
        self.last_pointer = Some(screen);
        trace!(x = screen.x, y = screen.y, "pan start");
    }

    /// Applies the pointer delta since the last update while a pan is active.
    /// Returns the applied delta, or `None` when no pan is in progress.
    pub fn pan_to(&mut self, screen: Point) -> Option<Point> {
        if !self.panning {
            return None;
        }
        let last = self.last_pointer.unwrap_or(screen);
        let delta = Point::new(screen.x - last.x, screen.y - last.y);
        self.pan_by(delta.x, delta.y);
        self.last_pointer = Some(screen);
        Some(delta)
    }

    pub fn end_pan(&mut self) {
        if self.panning {
            debug!(
                tx = self.translation.x,
                ty = self.translation.y,
                "pan end"
            );
        }
        self.panning = false;
        self.last_pointer = None;
    }

    /// Whether a wheel gesture with these modifiers should zoom.
    pub fn wheel_zooms(&self, modifiers: Modifiers) -> bool {
        match self.zoom_mode {
            ZoomMode::Greedy => true,
            ZoomMode::Cooperative => modifiers.ctrl || modifiers.meta,
        }
    }

    /// Handles a wheel gesture. Negative `delta_y` (wheel up) zooms in.
    /// Returns true when the gesture was consumed as a zoom step.
    pub fn wheel(&mut self, delta_y: f32, modifiers: Modifiers) -> bool {
        if !self.wheel_zooms(modifiers) || delta_y == 0.0 {
            return false;
        }
        if delta_y < 0.0 {
            self.zoom_in()
        } else {
            self.zoom_out()
        }
    }

    pub fn to_screen(&self, content: Point) -> Point {
        Point::new(
            self.translation.x + self.scale * content.x,
            self.translation.y + self.scale * content.y,
        )
    }

    pub fn to_content(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translation.x) / self.scale,
            (screen.y - self.translation.y) / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(&ViewportConfig::default())
    }

    #[test]
    fn zoom_steps_stop_at_bounds() {
        let mut vp = viewport();
        let (min, max) = vp.scale_limits();
        while vp.zoom_in() {}
        assert_eq!(vp.scale(), max);
        assert!(!vp.can_zoom_in());
        assert!(!vp.zoom_in());
        while vp.zoom_out() {}
        assert_eq!(vp.scale(), min);
        assert!(!vp.zoom_out());
    }

    #[test]
    fn fit_clamps_scale_and_centers_content() {
        let mut vp = viewport();
        let tiny = Bounds::from_edges(-1.0, -1.0, 1.0, 1.0);
        vp.fit_to_screen(&tiny, 800.0, 600.0);
        assert_eq!(vp.scale(), vp.scale_limits().1);
        let center = vp.to_screen(tiny.center);
        assert!((center.x - 400.0).abs() < 1e-3);
        assert!((center.y - 300.0).abs() < 1e-3);

        let huge = Bounds::from_edges(-1.0e6, -10.0, 1.0e6, 30.0);
        vp.fit_to_screen(&huge, 800.0, 600.0);
        assert_eq!(vp.scale(), vp.scale_limits().0);
    }

    #[test]
    fn fit_uses_the_tighter_axis() {
        let mut vp = Viewport::new(&ViewportConfig {
            min_scale: 0.01,
            max_scale: 100.0,
            fit_padding: 40.0,
            ..ViewportConfig::default()
        });
        let bounds = Bounds::from_edges(-380.0, -80.0, 380.0, 80.0);
        vp.fit_to_screen(&bounds, 400.0, 400.0);
        assert!((vp.scale() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn pan_is_unaffected_by_scale() {
        let mut vp = viewport();
        vp.set_scale(2.0);
        vp.begin_pan(Point::new(10.0, 10.0));
        assert_eq!(vp.pan_to(Point::new(25.0, 5.0)), Some(Point::new(15.0, -5.0)));
        vp.end_pan();
        assert_eq!(vp.translation(), Point::new(15.0, -5.0));
        assert!(!vp.is_panning());
        assert_eq!(vp.pan_to(Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn screen_and_content_round_trip() {
        let mut vp = viewport();
        vp.set_scale(1.5);
        vp.set_translation(Point::new(40.0, -20.0));
        let screen = vp.to_screen(Point::new(10.0, 10.0));
        assert_eq!(screen, Point::new(55.0, -5.0));
        let content = vp.to_content(screen);
        assert!((content.x - 10.0).abs() < 1e-4);
        assert!((content.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn cooperative_wheel_requires_modifier() {
        let mut vp = viewport();
        assert!(!vp.wheel(-1.0, Modifiers::NONE));
        assert_eq!(vp.scale(), 1.0);
        assert!(vp.wheel(-1.0, Modifiers::CTRL));
        assert!(vp.scale() > 1.0);
    }

    #[test]
    fn greedy_wheel_always_zooms() {
        let mut vp = Viewport::new(&ViewportConfig {
            zoom_mode: ZoomMode::Greedy,
            ..ViewportConfig::default()
        });
        assert!(vp.wheel(3.0, Modifiers::NONE));
        assert!(vp.scale() < 1.0);
    }

    #[test]
    fn invalid_settings_fall_back_to_defaults() {
        let mut vp = Viewport::new(&ViewportConfig {
            min_scale: 0.0,
            zoom_mode: ZoomMode::Greedy,
            ..ViewportConfig::default()
        });
        assert_eq!(vp.scale_limits(), (0.13, 2.25));
        assert_eq!(vp.zoom_mode(), ZoomMode::Greedy);
        let mut steps = 0;
        while vp.zoom_out() {
            steps += 1;
        }
        assert!(steps < 10);
        assert_eq!(vp.scale(), 0.13);
    }

    #[test]
    fn zoom_mode_tokens() {
        assert_eq!("greedy".parse::<ZoomMode>(), Ok(ZoomMode::Greedy));
        assert!("eager".parse::<ZoomMode>().is_err());
    }
}
