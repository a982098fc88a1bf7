use crate::ir::Host;

use super::geometry::{HexMetrics, Point, RowScheme};
use super::types::CellLayout;

/// Centers for every host of a group, in the group's stable host order.
pub fn place_cells(
    group_name: &str,
    hosts: &[Host],
    scheme: RowScheme,
    metrics: HexMetrics,
    origin: Point,
) -> Vec<CellLayout> {
    hosts
        .iter()
        .enumerate()
        .map(|(index, host)| {
            let rc = scheme.row_col(index);
            CellLayout {
                key: format!("{group_name}/{}", host.id),
                index,
                row: rc.row,
                column: rc.column,
                center: scheme.cell_center(index, metrics, origin),
                host: host.clone(),
            }
        })
        .collect()
}
