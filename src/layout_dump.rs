use crate::layout::{Bounds, HostmapLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub mode: String,
    pub hosts_per_row: usize,
    pub radius: f32,
    pub spacing: f32,
    pub bounds: Bounds,
    pub groups: Vec<GroupDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDump {
    pub name: String,
    pub origin: [f32; 2],
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub cells: Vec<CellDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDump {
    pub key: String,
    pub row: usize,
    pub column: usize,
    pub x: f32,
    pub y: f32,
    pub value: Option<f64>,
}

impl LayoutDump {
    pub fn from_layout(layout: &HostmapLayout) -> Self {
        let groups = layout
            .groups
            .iter()
            .map(|group| GroupDump {
                name: group.name.clone(),
                origin: [group.origin.x, group.origin.y],
                x: group.rect.x,
                y: group.rect.y,
                width: group.rect.width,
                height: group.rect.height,
                cells: group
                    .cells
                    .iter()
                    .map(|cell| CellDump {
                        key: cell.key.clone(),
                        row: cell.row,
                        column: cell.column,
                        x: cell.center.x,
                        y: cell.center.y,
                        value: cell.host.latest().filter(|v| v.is_finite()),
                    })
                    .collect(),
            })
            .collect();

        LayoutDump {
            mode: layout.mode.as_str().to_string(),
            hosts_per_row: layout.hosts_per_row,
            radius: layout.metrics.radius,
            spacing: layout.metrics.spacing,
            bounds: layout.bounds,
            groups,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &HostmapLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
