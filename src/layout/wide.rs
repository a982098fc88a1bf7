use super::geometry::{Bounds, HexMetrics, Point, RowScheme};

/// A group measured at a reference origin, before it has a position.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    pub name: String,
    pub host_count: usize,
    pub box_width: f32,
    pub box_height: f32,
}

impl GroupEntry {
    pub fn measure(name: &str, host_count: usize, scheme: RowScheme, metrics: HexMetrics) -> Self {
        let rect = scheme.group_bbox(host_count, metrics, Point::default());
        Self {
            name: name.to_string(),
            host_count,
            box_width: rect.width,
            box_height: rect.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGroup {
    pub name: String,
    pub host_count: usize,
    pub box_width: f32,
    pub box_height: f32,
    pub origin: Point,
}

/// Groups side by side, left to right in input order, centered on x = 0.
///
/// Every group shares `rect_top = -max_height / 2`, so shorter groups hang
/// from the top of the band instead of being centered in it.
#[derive(Debug, Clone)]
pub struct WideLayout<'a> {
    entries: &'a [GroupEntry],
    gap_x: f32,
    scheme: RowScheme,
    metrics: HexMetrics,
}

impl<'a> WideLayout<'a> {
    pub fn new(entries: &'a [GroupEntry], gap_x: f32, scheme: RowScheme, metrics: HexMetrics) -> Self {
        Self {
            entries,
            gap_x,
            scheme,
            metrics,
        }
    }

    pub fn total_width(&self) -> f32 {
        let widths: f32 = self.entries.iter().map(|entry| entry.box_width).sum();
        widths + self.gap_x * self.entries.len().saturating_sub(1) as f32
    }

    pub fn max_height(&self) -> f32 {
        self.entries
            .iter()
            .map(|entry| entry.box_height)
            .fold(0.0_f32, f32::max)
    }

    /// Rectangle left edges, one per group.
    pub fn rect_lefts(&self) -> Vec<f32> {
        let mut lefts = Vec::with_capacity(self.entries.len());
        let mut cursor = -self.total_width() / 2.0;
        for entry in self.entries {
            lefts.push(cursor);
            cursor += entry.box_width + self.gap_x;
        }
        lefts
    }

    pub fn group_coordinates(&self) -> Vec<PlacedGroup> {
        let rect_top = -self.max_height() / 2.0;
        self.entries
            .iter()
            .zip(self.rect_lefts())
            .map(|(entry, rect_left)| PlacedGroup {
                name: entry.name.clone(),
                host_count: entry.host_count,
                box_width: entry.box_width,
                box_height: entry.box_height,
                origin: self
                    .scheme
                    .origin_for_rect(entry.host_count, self.metrics, rect_left, rect_top),
            })
            .collect()
    }

    /// Union of every placed group's box, re-derived from the origins.
    pub fn bounds(&self) -> Bounds {
        scene_bounds(&self.group_coordinates(), self.scheme, self.metrics)
    }
}

pub fn scene_bounds(placed: &[PlacedGroup], scheme: RowScheme, metrics: HexMetrics) -> Bounds {
    if placed.is_empty() {
        return Bounds::default();
    }
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for group in placed {
        let rect = scheme.group_bbox(group.host_count, metrics, group.origin);
        min_x = min_x.min(rect.x);
        min_y = min_y.min(rect.y);
        max_x = max_x.max(rect.right());
        max_y = max_y.max(rect.bottom());
    }
    Bounds::from_edges(min_x, min_y, max_x, max_y)
}
