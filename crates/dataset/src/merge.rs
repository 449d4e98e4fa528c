use foundation::geo::{Boundary, GeoPoint};
use foundation::years::YearAxis;

use crate::geometry::CountryGeometry;
use crate::table::MigrationTable;

/// One country surviving the inner join: geometry, centroid, and a
/// migrant value for every year on the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCountry {
    pub entity: String,
    pub boundary: Boundary,
    pub centroid: GeoPoint,
    pub values: Vec<f64>,
}

/// Inner join of the migration table and the country geometries,
/// computed once after both loads. Row order follows the geometry side,
/// which is what makes downstream tie-breaks stable.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    axis: YearAxis,
    rows: Vec<MergedCountry>,
}

impl MergedTable {
    pub fn join(geometry: &CountryGeometry, table: &MigrationTable) -> Self {
        let mut rows = Vec::new();
        for geom_row in geometry.rows() {
            // A normalization alias can leave several table rows with
            // the same name; each joins the geometry independently.
            for table_row in table.rows().iter().filter(|r| r.entity == geom_row.entity) {
                rows.push(MergedCountry {
                    entity: geom_row.entity.clone(),
                    boundary: geom_row.boundary.clone(),
                    centroid: geom_row.centroid,
                    values: table_row.values.clone(),
                });
            }
        }
        Self {
            axis: table.axis().clone(),
            rows,
        }
    }

    pub fn axis(&self) -> &YearAxis {
        &self.axis
    }

    pub fn years(&self) -> &[i32] {
        self.axis.years()
    }

    pub fn rows(&self) -> &[MergedCountry] {
        &self.rows
    }

    pub fn year_index(&self, year: i32) -> Option<usize> {
        self.axis.index_of(year)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.rows.iter().any(|r| r.entity == entity)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::MergedTable;
    use crate::geometry::CountryGeometry;
    use crate::table::MigrationTable;
    use formats::boundaries::{BoundaryCollection, BoundaryFeature};
    use formats::migration_csv::MigrationRecord;
    use foundation::geo::{Boundary, GeoPoint};
    use pretty_assertions::assert_eq;

    fn square(x0: f64, y0: f64) -> Boundary {
        Boundary::Polygon(vec![vec![
            GeoPoint::new(x0, y0),
            GeoPoint::new(x0 + 1.0, y0),
            GeoPoint::new(x0 + 1.0, y0 + 1.0),
            GeoPoint::new(x0, y0 + 1.0),
            GeoPoint::new(x0, y0),
        ]])
    }

    fn geometry(names: &[&str]) -> CountryGeometry {
        let features = names
            .iter()
            .enumerate()
            .map(|(i, name)| BoundaryFeature {
                entity: name.to_string(),
                boundary: square(i as f64 * 2.0, 0.0),
            })
            .collect();
        CountryGeometry::from_collection(BoundaryCollection { features })
    }

    fn table(names: &[&str]) -> MigrationTable {
        let mut records = Vec::new();
        for name in names {
            for year in [1990, 1995, 2000, 2005, 2010] {
                records.push(MigrationRecord {
                    entity: name.to_string(),
                    year,
                    value: Some(f64::from(year)),
                });
            }
        }
        MigrationTable::build(&records).unwrap()
    }

    #[test]
    fn join_is_a_true_inner_join() {
        let geometry = geometry(&["Albania", "Benin", "Chad"]);
        let table = table(&["Benin", "Chad", "Denmark"]);
        let merged = MergedTable::join(&geometry, &table);

        let names: Vec<&str> = merged.rows().iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(names, vec!["Benin", "Chad"]);
        assert!(!merged.contains("Albania"));
        assert!(!merged.contains("Denmark"));
    }

    #[test]
    fn row_order_follows_the_geometry_side() {
        let geometry = geometry(&["Chad", "Albania", "Benin"]);
        let table = table(&["Albania", "Benin", "Chad"]);
        let merged = MergedTable::join(&geometry, &table);

        let names: Vec<&str> = merged.rows().iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(names, vec!["Chad", "Albania", "Benin"]);
    }

    #[test]
    fn aliased_table_rows_each_join_the_same_boundary() {
        // "South Sudan" normalizes to "Sudan", so the cleaned table can
        // carry two rows named Sudan; both join the Sudan boundary.
        let geometry = geometry(&["Sudan"]);
        let mut records = Vec::new();
        for name in ["South Sudan", "Sudan"] {
            for year in [1990, 1995, 2000, 2005, 2010] {
                records.push(MigrationRecord {
                    entity: name.to_string(),
                    year,
                    value: Some(1.0),
                });
            }
        }
        let table = MigrationTable::build(&records).unwrap();
        let merged = MergedTable::join(&geometry, &table);

        assert_eq!(merged.rows().len(), 2);
        assert!(merged.rows().iter().all(|r| r.entity == "Sudan"));
    }

    #[test]
    fn carries_values_and_centroid() {
        let geometry = geometry(&["Albania"]);
        let table = table(&["Albania"]);
        let merged = MergedTable::join(&geometry, &table);

        let row = &merged.rows()[0];
        let col = merged.year_index(2000).unwrap();
        assert_eq!(row.values[col], 2000.0);
        assert!((row.centroid.lon_deg - 0.5).abs() < 1e-12);
    }
}
