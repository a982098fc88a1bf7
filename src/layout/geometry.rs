//! Row scheme and hex pitch shared by the bounding-box math and cell placement.
//!
//! Rows alternate between a short row of `N` cells (even row indices) and a
//! long row of `N + 1` cells (odd row indices). Short rows are shifted right
//! by half a horizontal pitch, long rows start at the origin. Every formula
//! that needs the row scheme goes through [`RowScheme`] so the bounding box
//! and the cell centers cannot drift apart.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn zero_at(origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when `point` lies inside the rectangle and not on its border.
    pub fn contains_strict(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Union rectangle over all placed groups, plus its center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub center: Point,
}

impl Bounds {
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            center: Point::new((left + right) / 2.0, (top + bottom) / 2.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowCol {
    pub row: usize,
    pub column: usize,
}

/// Center-to-center pitch of the hex grid, derived from the hexagon radius and
/// the configured spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HexMetrics {
    pub radius: f32,
    pub spacing: f32,
}

impl HexMetrics {
    pub fn new(radius: f32, spacing: f32) -> Self {
        Self { radius, spacing }
    }

    pub fn dx(&self) -> f32 {
        3.0_f32.sqrt() * self.radius + self.spacing
    }

    pub fn dy(&self) -> f32 {
        1.5 * self.radius + self.spacing
    }

    /// Halo around the outermost centers: room for the hexagon plus its stroke.
    pub fn pad(&self) -> f32 {
        self.radius + self.spacing
    }
}

/// Row count and long-row presence for a group of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowShape {
    pub full_pairs: usize,
    pub remainder: usize,
    pub rows: usize,
    pub has_long_row: bool,
}

/// Alternating short/long row scheme with `base` cells per short row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowScheme {
    base: usize,
}

impl RowScheme {
    /// `base` is the short row length; callers validate it is at least one.
    pub fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn short_len(&self) -> usize {
        self.base
    }

    pub fn long_len(&self) -> usize {
        self.base + 1
    }

    pub fn pair_len(&self) -> usize {
        self.short_len() + self.long_len()
    }

    /// Maps a linear cell index to its row and column.
    pub fn row_col(&self, index: usize) -> RowCol {
        let pair_index = index / self.pair_len();
        let in_pair = index % self.pair_len();
        if in_pair < self.short_len() {
            RowCol {
                row: pair_index * 2,
                column: in_pair,
            }
        } else {
            RowCol {
                row: pair_index * 2 + 1,
                column: in_pair - self.short_len(),
            }
        }
    }

    pub fn shape(&self, count: usize) -> RowShape {
        let full_pairs = count / self.pair_len();
        let remainder = count - full_pairs * self.pair_len();
        let mut rows = full_pairs * 2;
        let mut has_long_row = full_pairs > 0;
        if remainder > 0 {
            if remainder <= self.short_len() {
                rows += 1;
            } else {
                rows += 2;
                has_long_row = true;
            }
        }
        RowShape {
            full_pairs,
            remainder,
            rows,
            has_long_row,
        }
    }

    /// Horizontal shift of a row in units of the horizontal pitch: even (short)
    /// rows sit half a pitch to the right.
    pub fn row_shift(row: usize) -> f32 {
        0.5 * ((row + 1) % 2) as f32
    }

    pub fn cell_center(&self, index: usize, metrics: HexMetrics, origin: Point) -> Point {
        let RowCol { row, column } = self.row_col(index);
        Point::new(
            origin.x + metrics.dx() * (column as f32 + Self::row_shift(row)),
            origin.y + metrics.dy() * row as f32,
        )
    }

    /// Leftmost center x, relative to the origin, for a group of this shape.
    pub fn min_center_offset_x(shape: &RowShape, metrics: HexMetrics) -> f32 {
        if shape.has_long_row {
            0.0
        } else {
            metrics.dx() * Self::row_shift(0)
        }
    }

    /// Bounding rectangle of `count` cells anchored at `origin`, padded by
    /// radius plus spacing on every side.
    pub fn group_bbox(&self, count: usize, metrics: HexMetrics, origin: Point) -> Rect {
        if count == 0 || self.base == 0 {
            return Rect::zero_at(origin);
        }
        let shape = self.shape(count);
        let dx = metrics.dx();
        let dy = metrics.dy();

        let min_cy = origin.y;
        let max_cy = origin.y + dy * (shape.rows - 1) as f32;

        let min_cx = origin.x + Self::min_center_offset_x(&shape, metrics);
        let max_cx = if shape.has_long_row {
            origin.x + dx * self.base as f32
        } else {
            origin.x + dx * (shape.remainder as f32 - Self::row_shift(0))
        };

        let pad = metrics.pad();
        Rect {
            x: min_cx - pad,
            y: min_cy - pad,
            width: max_cx - min_cx + 2.0 * pad,
            height: max_cy - min_cy + 2.0 * pad,
        }
    }

    /// Origin that places this group's bounding box top-left at `rect_left`,
    /// `rect_top`. Inverse of [`RowScheme::group_bbox`].
    pub fn origin_for_rect(&self, count: usize, metrics: HexMetrics, rect_left: f32, rect_top: f32) -> Point {
        if count == 0 || self.base == 0 {
            return Point::new(rect_left, rect_top);
        }
        let shape = self.shape(count);
        let pad = metrics.pad();
        Point::new(
            rect_left - Self::min_center_offset_x(&shape, metrics) + pad,
            rect_top + pad,
        )
    }
}
