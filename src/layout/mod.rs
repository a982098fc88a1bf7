mod error;
mod geometry;
mod placement;
mod types;
mod wide;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::ir::HostGroup;

pub use error::LayoutError;
pub use geometry::{Bounds, HexMetrics, Point, Rect, RowCol, RowScheme, RowShape};
pub use placement::place_cells;
pub use types::{CellLayout, GroupLayout, HostmapLayout};
pub use wide::{GroupEntry, PlacedGroup, WideLayout, scene_bounds};

/// Arrangement strategies. `Wide` is the only one today; adding a variant
/// forces every `match` below to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Wide,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Wide => "wide",
        }
    }
}

impl FromStr for LayoutMode {
    type Err = LayoutError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            "wide" => Ok(LayoutMode::Wide),
            other => Err(LayoutError::UnknownLayoutMode(other.to_string())),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measures, arranges and places every group. Fails only on invalid
/// configuration; empty groups and empty input produce empty layouts.
pub fn compute_layout(groups: &[HostGroup], config: &LayoutConfig) -> Result<HostmapLayout, LayoutError> {
    config.validate()?;
    let scheme = RowScheme::new(config.hosts_per_row);
    let metrics = HexMetrics::new(config.radius, config.hex_spacing);
    let (gap_x, _gap_y) = config.group_gap();

    let entries: Vec<GroupEntry> = groups
        .iter()
        .map(|group| GroupEntry::measure(&group.name, group.hosts.len(), scheme, metrics))
        .collect();

    let (placed, bounds) = match config.layout_mode {
        LayoutMode::Wide => {
            let wide = WideLayout::new(&entries, gap_x, scheme, metrics);
            let placed = wide.group_coordinates();
            let bounds = scene_bounds(&placed, scheme, metrics);
            (placed, bounds)
        }
    };

    let groups: Vec<GroupLayout> = groups
        .iter()
        .zip(placed)
        .map(|(group, placed)| GroupLayout {
            name: group.name.clone(),
            origin: placed.origin,
            rect: scheme.group_bbox(group.hosts.len(), metrics, placed.origin),
            cells: place_cells(&group.name, &group.hosts, scheme, metrics, placed.origin),
        })
        .collect();

    debug!(
        mode = %config.layout_mode,
        groups = groups.len(),
        left = bounds.left,
        top = bounds.top,
        right = bounds.right,
        bottom = bounds.bottom,
        "computed hostmap layout"
    );

    Ok(HostmapLayout {
        mode: config.layout_mode,
        hosts_per_row: config.hosts_per_row,
        metrics,
        groups,
        bounds,
    })
}
