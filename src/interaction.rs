//! Hover and selection state, plus hit testing against hexagon cells.
//!
//! Both states are plain values owned by the panel and handed to the renderer;
//! nothing here is global.

use tracing::debug;

use crate::layout::{CellLayout, HostmapLayout, Point};

/// Vertices of a pointy-top hexagon with circumradius `radius`, starting at
/// 30 degrees and going clockwise in screen coordinates.
pub fn hexagon_points(center: Point, radius: f32) -> [Point; 6] {
    let mut points = [Point::default(); 6];
    for (idx, point) in points.iter_mut().enumerate() {
        let theta = (30.0 + 60.0 * idx as f32).to_radians();
        *point = Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin());
    }
    points
}

pub fn point_in_hexagon(point: Point, center: Point, radius: f32) -> bool {
    let dx = (point.x - center.x).abs();
    let dy = (point.y - center.y).abs();
    let half_width = 3.0_f32.sqrt() / 2.0 * radius;
    if dx > half_width || dy > radius {
        return false;
    }
    dx / 3.0_f32.sqrt() + dy <= radius
}

/// The cell whose hexagon contains `content`, if any. Hexagons never overlap,
/// so at most one cell matches.
pub fn hit_test(layout: &HostmapLayout, content: Point) -> Option<&CellLayout> {
    let radius = layout.metrics.radius;
    layout
        .groups
        .iter()
        .filter(|group| group.rect.contains(content))
        .flat_map(|group| group.cells.iter())
        .find(|cell| point_in_hexagon(content, cell.center, radius))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedHost {
    pub key: String,
    pub center: Point,
}

/// At most one selected cell for the whole panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Option<SelectedHost>,
}

impl Selection {
    pub fn selected(&self) -> Option<&SelectedHost> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.as_ref().is_some_and(|host| host.key == key)
    }

    /// Selects the cell, or clears the selection if it was already selected.
    pub fn toggle(&mut self, cell: &CellLayout) {
        if self.is_selected(&cell.key) {
            debug!(key = %cell.key, "host deselected");
            self.selected = None;
        } else {
            debug!(key = %cell.key, "host selected");
            self.selected = Some(SelectedHost {
                key: cell.key.clone(),
                center: cell.center,
            });
        }
    }

    pub fn clear(&mut self) {
        if self.selected.take().is_some() {
            debug!("selection cleared");
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hover {
    key: Option<String>,
}

impl Hover {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_hovered(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    pub fn set(&mut self, key: Option<&str>) {
        self.key = key.map(str::to_string);
    }

    pub fn clear(&mut self) {
        self.key = None;
    }
}
