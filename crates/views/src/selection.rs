use dataset::MergedTable;
use foundation::years::YearAxis;

/// The native cadence of the migration data.
pub const YEAR_STEP: i32 = 5;

/// The years a slider may select: the table's own year columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearDomain {
    axis: YearAxis,
}

impl YearDomain {
    pub fn new(axis: &YearAxis) -> Self {
        Self { axis: axis.clone() }
    }

    pub fn years(&self) -> &[i32] {
        self.axis.years()
    }

    pub fn min(&self) -> Option<i32> {
        self.axis.min()
    }

    pub fn max(&self) -> Option<i32> {
        self.axis.max()
    }

    /// Default selection is the latest year.
    pub fn default_year(&self) -> Option<i32> {
        self.axis.max()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.axis.index_of(year).is_some()
    }
}

/// A destination validated against a merged table. Only the domain can
/// construct one, so a selected destination is a member by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    row: usize,
    entity: String,
}

impl Destination {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Index of the destination's (first) row in the merged table.
    pub fn row(&self) -> usize {
        self.row
    }
}

/// Sorted, de-duplicated destination names from the merged table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationDomain {
    names: Vec<String>,
    rows: Vec<usize>,
}

impl DestinationDomain {
    pub fn new(merged: &MergedTable) -> Self {
        let mut pairs: Vec<(&str, usize)> = Vec::new();
        for (i, row) in merged.rows().iter().enumerate() {
            if !pairs.iter().any(|(name, _)| *name == row.entity) {
                pairs.push((&row.entity, i));
            }
        }
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        Self {
            names: pairs.iter().map(|(name, _)| name.to_string()).collect(),
            rows: pairs.iter().map(|&(_, row)| row).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn resolve(&self, entity: &str) -> Option<Destination> {
        let i = self.names.iter().position(|n| n == entity)?;
        Some(Destination {
            row: self.rows[i],
            entity: self.names[i].clone(),
        })
    }

    /// Default selection is the first name in sorted order.
    pub fn default_destination(&self) -> Option<Destination> {
        self.names.first().and_then(|n| self.resolve(n))
    }
}
