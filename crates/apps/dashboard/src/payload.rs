//! Chart-ready JSON documents. This is the boundary to the charting
//! layer: everything downstream of here is presentation.

use foundation::bounds::Aabb2;
use foundation::geo::{Boundary, GeoPoint};
use serde::Serialize;
use serde_json::{Map, Value};
use views::{ChoroplethSlice, GlobeFlows, SankeyGraph, YEAR_STEP, YearDomain};

#[derive(Debug, Serialize)]
pub struct SelectorsDoc {
    pub years: Vec<i32>,
    pub year_step: i32,
    pub selected_year: i32,
    pub destinations: Vec<String>,
    pub selected_destination: String,
}

impl SelectorsDoc {
    pub fn new(
        years: &YearDomain,
        destinations: &[String],
        selected_year: i32,
        selected_destination: &str,
    ) -> Self {
        Self {
            years: years.years().to_vec(),
            year_step: YEAR_STEP,
            selected_year,
            destinations: destinations.to_vec(),
            selected_destination: selected_destination.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChoroplethCountryDoc {
    pub entity: String,
    pub value: f64,
    pub geometry: Value,
}

#[derive(Debug, Serialize)]
pub struct ChoroplethDoc {
    pub year: i32,
    /// [[min_lon, min_lat], [max_lon, max_lat]] for view auto-fit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_bounds: Option<[[f64; 2]; 2]>,
    pub countries: Vec<ChoroplethCountryDoc>,
}

impl ChoroplethDoc {
    pub fn new(slice: &ChoroplethSlice<'_>) -> Self {
        Self {
            year: slice.year,
            fit_bounds: slice.bounds.map(fit_bounds),
            countries: slice
                .entries
                .iter()
                .map(|e| ChoroplethCountryDoc {
                    entity: e.entity.to_string(),
                    value: e.value,
                    geometry: boundary_to_geojson(e.boundary),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArcDoc {
    pub source: String,
    pub from_lon: f64,
    pub from_lat: f64,
    pub to_lon: f64,
    pub to_lat: f64,
    pub migrants: f64,
    pub width: f64,
}

#[derive(Debug, Serialize)]
pub struct GlobeDoc {
    pub destination: String,
    pub year: i32,
    pub arcs: Vec<ArcDoc>,
}

impl GlobeDoc {
    pub fn new(flows: &GlobeFlows) -> Self {
        Self {
            destination: flows.destination.clone(),
            year: flows.year,
            arcs: flows
                .records
                .iter()
                .map(|r| ArcDoc {
                    source: r.source.clone(),
                    from_lon: r.from.lon_deg,
                    from_lat: r.from.lat_deg,
                    to_lon: r.to.lon_deg,
                    to_lat: r.to.lat_deg,
                    migrants: r.migrants,
                    width: r.arc_width(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SankeyLinkDoc {
    /// Positions into `labels`, resolved from node ids.
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct SankeyDoc {
    pub year: i32,
    pub labels: Vec<String>,
    pub links: Vec<SankeyLinkDoc>,
}

impl SankeyDoc {
    pub fn new(graph: &SankeyGraph) -> Self {
        let links = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = graph.position_of(edge.source)?;
                let target = graph.position_of(edge.target)?;
                Some(SankeyLinkDoc {
                    source,
                    target,
                    value: edge.value,
                })
            })
            .collect();
        Self {
            year: graph.year(),
            labels: graph.labels().iter().map(|s| s.to_string()).collect(),
            links,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardDoc {
    pub selectors: SelectorsDoc,
    pub choropleth: ChoroplethDoc,
    pub globe: GlobeDoc,
    pub sankey: SankeyDoc,
}

fn fit_bounds(b: Aabb2) -> [[f64; 2]; 2] {
    [b.min, b.max]
}

fn point_coords(p: &GeoPoint) -> Value {
    Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)])
}

fn ring_coords(ring: &[GeoPoint]) -> Value {
    Value::Array(ring.iter().map(point_coords).collect())
}

pub fn boundary_to_geojson(boundary: &Boundary) -> Value {
    let mut obj = Map::new();
    match boundary {
        Boundary::Polygon(rings) => {
            obj.insert("type".to_string(), Value::String("Polygon".to_string()));
            let coords = rings.iter().map(|ring| ring_coords(ring)).collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
        Boundary::MultiPolygon(polys) => {
            obj.insert("type".to_string(), Value::String("MultiPolygon".to_string()));
            let coords = polys
                .iter()
                .map(|poly| Value::Array(poly.iter().map(|ring| ring_coords(ring)).collect()))
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
    }
    Value::Object(obj)
}
