use dataset::MergedTable;
use foundation::bounds::Aabb2;
use foundation::geo::Boundary;

/// One country's contribution to the map: its geometry and its value
/// for the selected year. A direct per-row projection, no filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethEntry<'a> {
    pub entity: &'a str,
    pub boundary: &'a Boundary,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethSlice<'a> {
    pub year: i32,
    pub entries: Vec<ChoroplethEntry<'a>>,
    /// Union of all included geometries, for view auto-fit.
    pub bounds: Option<Aabb2>,
}

/// Returns None when `year` is not a column of the table.
pub fn derive_choropleth(merged: &MergedTable, year: i32) -> Option<ChoroplethSlice<'_>> {
    let col = merged.year_index(year)?;

    let mut entries = Vec::with_capacity(merged.rows().len());
    let mut bounds: Option<Aabb2> = None;
    for row in merged.rows() {
        entries.push(ChoroplethEntry {
            entity: &row.entity,
            boundary: &row.boundary,
            value: row.values[col],
        });
        bounds = match (bounds, row.boundary.bounds()) {
            (Some(a), Some(b)) => Some(Aabb2::union(a, b)),
            (a, b) => a.or(b),
        };
    }

    Some(ChoroplethSlice { year, entries, bounds })
}

#[cfg(test)]
mod tests {
    use super::derive_choropleth;
    use crate::fixtures;

    #[test]
    fn projects_every_row_unfiltered() {
        let merged = fixtures::merged(&[("Albania", 100.0), ("Benin", 50.0), ("Chad", 25.0)]);
        let slice = derive_choropleth(&merged, 2010).unwrap();

        assert_eq!(slice.entries.len(), merged.rows().len());
        let albania = slice.entries.iter().find(|e| e.entity == "Albania").unwrap();
        assert_eq!(albania.value, 100.0);
    }

    #[test]
    fn bounds_cover_all_geometries() {
        let merged = fixtures::merged(&[("Albania", 1.0), ("Benin", 2.0)]);
        let slice = derive_choropleth(&merged, 1990).unwrap();

        let bounds = slice.bounds.unwrap();
        for row in merged.rows() {
            let b = row.boundary.bounds().unwrap();
            assert!(bounds.contains(b.min));
            assert!(bounds.contains(b.max));
        }
    }

    #[test]
    fn unknown_year_is_none() {
        let merged = fixtures::merged(&[("Albania", 1.0)]);
        assert!(derive_choropleth(&merged, 1991).is_none());
    }
}
