use dataset::MergedTable;
use foundation::geo::GeoPoint;

use crate::selection::Destination;

/// Arc width is migrants scaled by this fixed divisor. Presentation
/// only, but reproduced for visual parity with the reference charts.
pub const ARC_WIDTH_DIVISOR: f64 = 1_000_000.0;

/// One arc: a source country's centroid to the destination's centroid,
/// weighted by the source's migrant stock in the selected year.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub source: String,
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub migrants: f64,
}

impl FlowRecord {
    pub fn arc_width(&self) -> f64 {
        self.migrants / ARC_WIDTH_DIVISOR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeFlows {
    pub destination: String,
    pub year: i32,
    pub records: Vec<FlowRecord>,
}

/// One record per country other than the destination; the destination
/// contributes no self-flow. An empty record set is valid and renders
/// as zero arcs. Returns None when `year` is not a column.
pub fn derive_flows(
    merged: &MergedTable,
    destination: &Destination,
    year: i32,
) -> Option<GlobeFlows> {
    let col = merged.year_index(year)?;
    let dest_row = merged.rows().get(destination.row())?;
    let to = dest_row.centroid;

    let mut records = Vec::new();
    for row in merged.rows() {
        if row.entity == destination.entity() {
            continue;
        }
        records.push(FlowRecord {
            source: row.entity.clone(),
            from: row.centroid,
            to,
            migrants: row.values[col],
        });
    }

    Some(GlobeFlows {
        destination: destination.entity().to_string(),
        year,
        records,
    })
}
