use crate::ir::Host;

use super::LayoutMode;
use super::geometry::{Bounds, HexMetrics, Point, Rect};

#[derive(Debug, Clone)]
pub struct CellLayout {
    /// `"{group}/{node id}"`, unique within one layout.
    pub key: String,
    /// Position in the group's host order.
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub center: Point,
    pub host: Host,
}

#[derive(Debug, Clone)]
pub struct GroupLayout {
    pub name: String,
    pub origin: Point,
    pub rect: Rect,
    pub cells: Vec<CellLayout>,
}

#[derive(Debug, Clone)]
pub struct HostmapLayout {
    pub mode: LayoutMode,
    pub hosts_per_row: usize,
    pub metrics: HexMetrics,
    pub groups: Vec<GroupLayout>,
    pub bounds: Bounds,
}

impl HostmapLayout {
    pub fn cells(&self) -> impl Iterator<Item = &CellLayout> {
        self.groups.iter().flat_map(|group| group.cells.iter())
    }

    pub fn cell(&self, key: &str) -> Option<&CellLayout> {
        self.cells().find(|cell| cell.key == key)
    }

    pub fn host_count(&self) -> usize {
        self.groups.iter().map(|group| group.cells.len()).sum()
    }
}
