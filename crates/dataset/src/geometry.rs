use formats::boundaries::BoundaryCollection;
use foundation::geo::{Boundary, GeoPoint};

/// One boundary row with its derived planar centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRow {
    pub entity: String,
    pub boundary: Boundary,
    pub centroid: GeoPoint,
}

/// All boundary rows, in file order, unfiltered. Name normalization
/// happens entirely on the migration side.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryGeometry {
    rows: Vec<GeometryRow>,
}

impl CountryGeometry {
    pub fn from_collection(collection: BoundaryCollection) -> Self {
        let rows = collection
            .features
            .into_iter()
            .map(|feature| {
                let centroid = feature.boundary.centroid();
                GeometryRow {
                    entity: feature.entity,
                    boundary: feature.boundary,
                    centroid,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[GeometryRow] {
        &self.rows
    }

    pub fn get(&self, entity: &str) -> Option<&GeometryRow> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
