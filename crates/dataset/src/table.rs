use std::collections::BTreeMap;

use formats::migration_csv::MigrationRecord;
use foundation::years::YearAxis;

/// Rows with fewer known values than this are dropped rather than imputed.
pub const MIN_KNOWN_YEARS: usize = 5;

/// Supranational and income-band labels that appear in the migration
/// source but are not countries.
pub const AGGREGATE_ENTITIES: [&str; 15] = [
    "Africa",
    "Americas",
    "Asia",
    "Europe",
    "European Union",
    "High income",
    "Low income",
    "Lower middle income",
    "Upper middle income",
    "Oceania",
    "World",
    "North America",
    "South America",
    "Sub-Saharan Africa",
    "Middle East",
];

/// Exact-match renames from the migration table's naming convention to
/// the boundary file's. Applied once; targets are never re-mapped.
pub const NAME_FIXES: [(&str, &str); 10] = [
    ("United States", "United States of America"),
    ("Czechia", "Czech Republic"),
    ("Democratic Republic of Congo", "Democratic Republic of the Congo"),
    ("Republic of Congo", "Republic of the Congo"),
    ("Eswatini", "Swaziland"),
    ("Timor", "Timor-Leste"),
    ("Myanmar", "Burma"),
    ("North Macedonia", "Macedonia"),
    ("South Sudan", "Sudan"),
    ("Laos", "Lao PDR"),
];

pub fn is_aggregate(entity: &str) -> bool {
    AGGREGATE_ENTITIES.contains(&entity)
}

pub fn normalize_entity(entity: &str) -> &str {
    for (from, to) in NAME_FIXES {
        if entity == from {
            return to;
        }
    }
    entity
}

/// One cleaned row: a value for every year on the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub entity: String,
    pub values: Vec<f64>,
}

/// The cleaned wide-form migration table. Rows are ordered
/// alphabetically by their pre-normalization name and never change
/// after construction. Names are unique in the source; the
/// normalization step can alias two rows to one name (e.g. South Sudan
/// joins the Sudan boundary), which the merge handles per-row.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationTable {
    axis: YearAxis,
    rows: Vec<CountryRow>,
}

#[derive(Debug)]
pub enum TableBuildError {
    DuplicateCell { entity: String, year: i32 },
}

impl std::fmt::Display for TableBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableBuildError::DuplicateCell { entity, year } => {
                write!(f, "duplicate cell for {entity:?} in {year}")
            }
        }
    }
}

impl std::error::Error for TableBuildError {}

impl MigrationTable {
    /// Pivots long-format records to wide form, drops unreliable rows,
    /// fills the remaining gaps (interpolate, then backward-fill, then
    /// forward-fill -- the order is contractual), removes aggregate
    /// labels, and normalizes names.
    pub fn build(records: &[MigrationRecord]) -> Result<Self, TableBuildError> {
        let axis = YearAxis::new(records.iter().map(|r| r.year));

        // Pivot. BTreeMap gives the alphabetical row order the rest of
        // the pipeline relies on for stable tie-breaks.
        let mut pivot: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
        for record in records {
            let Some(value) = record.value else {
                continue;
            };
            let Some(col) = axis.index_of(record.year) else {
                continue;
            };
            let row = pivot
                .entry(record.entity.clone())
                .or_insert_with(|| vec![None; axis.len()]);
            if row[col].is_some() {
                return Err(TableBuildError::DuplicateCell {
                    entity: record.entity.clone(),
                    year: record.year,
                });
            }
            row[col] = Some(value);
        }

        let mut rows = Vec::with_capacity(pivot.len());
        for (entity, mut values) in pivot {
            let known = values.iter().filter(|v| v.is_some()).count();
            if known < MIN_KNOWN_YEARS {
                continue;
            }
            if is_aggregate(&entity) {
                continue;
            }

            fill_interpolate(axis.years(), &mut values);
            fill_backward(&mut values);
            fill_forward(&mut values);

            let dense: Vec<f64> = values.into_iter().flatten().collect();
            debug_assert_eq!(dense.len(), axis.len());

            rows.push(CountryRow {
                entity: normalize_entity(&entity).to_string(),
                values: dense,
            });
        }

        Ok(Self { axis, rows })
    }

    pub fn axis(&self) -> &YearAxis {
        &self.axis
    }

    pub fn years(&self) -> &[i32] {
        self.axis.years()
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    /// First row with the given (post-normalization) name.
    pub fn get(&self, entity: &str) -> Option<&CountryRow> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    pub fn value(&self, entity: &str, year: i32) -> Option<f64> {
        let col = self.axis.index_of(year)?;
        Some(self.get(entity)?.values[col])
    }
}

/// Linear interpolation between known neighbors along the year axis.
/// Leading and trailing gaps are left for the directional fills.
fn fill_interpolate(years: &[i32], values: &mut [Option<f64>]) {
    let known: Vec<usize> = (0..values.len()).filter(|&i| values[i].is_some()).collect();

    for pair in known.windows(2) {
        let (i, j) = (pair[0], pair[1]);
        if j == i + 1 {
            continue;
        }
        let (Some(vi), Some(vj)) = (values[i], values[j]) else {
            continue;
        };
        let span = f64::from(years[j] - years[i]);
        for k in (i + 1)..j {
            let t = f64::from(years[k] - years[i]) / span;
            values[k] = Some(vi + t * (vj - vi));
        }
    }
}

/// Fills leading gaps from the nearest later known value.
fn fill_backward(values: &mut [Option<f64>]) {
    let mut next_known: Option<f64> = None;
    for v in values.iter_mut().rev() {
        match *v {
            Some(x) => next_known = Some(x),
            None => *v = next_known,
        }
    }
}

/// Fills trailing gaps from the nearest earlier known value.
fn fill_forward(values: &mut [Option<f64>]) {
    let mut last_known: Option<f64> = None;
    for v in values.iter_mut() {
        match *v {
            Some(x) => last_known = Some(x),
            None => *v = last_known,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AGGREGATE_ENTITIES, MigrationTable, NAME_FIXES, normalize_entity};
    use formats::migration_csv::MigrationRecord;
    use pretty_assertions::assert_eq;

    const YEARS: [i32; 5] = [1990, 1995, 2000, 2005, 2010];

    fn records(entity: &str, values: [Option<f64>; 5]) -> Vec<MigrationRecord> {
        YEARS
            .iter()
            .zip(values)
            .map(|(&year, value)| MigrationRecord {
                entity: entity.to_string(),
                year,
                value,
            })
            .collect()
    }

    #[test]
    fn fill_order_interpolate_then_bfill_then_ffill() {
        let mut input = records("Albania", [None, Some(10.0), None, Some(30.0), None]);
        // A fully-known row keeps every year on the axis.
        input.extend(records(
            "Benin",
            [Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(1.0)],
        ));
        let table = MigrationTable::build(&input).unwrap();

        let row = table.get("Albania").unwrap();
        assert_eq!(row.values, vec![10.0, 10.0, 20.0, 30.0, 30.0]);
    }

    #[test]
    fn rows_below_reliability_threshold_are_dropped() {
        let mut input = records("Four", [Some(1.0), Some(2.0), Some(3.0), Some(4.0), None]);
        input.extend(records(
            "Five",
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        ));
        let table = MigrationTable::build(&input).unwrap();

        assert!(table.get("Four").is_none());
        let kept = table.get("Five").unwrap();
        assert_eq!(kept.values.len(), table.years().len());
    }

    #[test]
    fn exactly_five_known_values_are_retained_and_dense() {
        // 6 year columns, 5 known values: retained, and the gap filled.
        let mut input: Vec<MigrationRecord> = [1990, 1995, 2000, 2005, 2010, 2015]
            .iter()
            .zip([Some(10.0), None, Some(30.0), Some(40.0), Some(50.0), Some(60.0)])
            .map(|(&year, value)| MigrationRecord {
                entity: "Chad".to_string(),
                year,
                value,
            })
            .collect();
        for year in [1990, 1995, 2000, 2005, 2010, 2015] {
            input.push(MigrationRecord {
                entity: "Mali".to_string(),
                year,
                value: Some(1.0),
            });
        }
        let table = MigrationTable::build(&input).unwrap();

        let row = table.get("Chad").unwrap();
        assert_eq!(row.values, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn aggregates_never_survive_cleaning() {
        let mut input = Vec::new();
        for aggregate in AGGREGATE_ENTITIES {
            input.extend(records(
                aggregate,
                [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
            ));
        }
        input.extend(records(
            "Albania",
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        ));
        let table = MigrationTable::build(&input).unwrap();

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].entity, "Albania");
    }

    #[test]
    fn name_normalization_is_idempotent() {
        for (from, to) in NAME_FIXES {
            assert_eq!(normalize_entity(from), to);
            assert_eq!(normalize_entity(normalize_entity(from)), to);
        }
        assert_eq!(normalize_entity("Albania"), "Albania");
    }

    #[test]
    fn rows_are_renamed_to_boundary_convention() {
        let mut input = records(
            "United States",
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        );
        input.extend(records(
            "Czechia",
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        ));
        let table = MigrationTable::build(&input).unwrap();

        assert!(table.get("United States of America").is_some());
        assert!(table.get("Czech Republic").is_some());
        assert!(table.get("United States").is_none());
    }

    #[test]
    fn row_order_is_alphabetical_by_source_name() {
        let mut input = records(
            "Zimbabwe",
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        );
        input.extend(records(
            "Albania",
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        ));
        let table = MigrationTable::build(&input).unwrap();

        let names: Vec<&str> = table.rows().iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(names, vec!["Albania", "Zimbabwe"]);
    }

    #[test]
    fn duplicate_cell_is_an_error() {
        let mut input = records(
            "Albania",
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        );
        input.push(MigrationRecord {
            entity: "Albania".to_string(),
            year: 1990,
            value: Some(9.0),
        });
        assert!(MigrationTable::build(&input).is_err());
    }
}
