use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

pub const ENTITY_COLUMN: &str = "Entity";
pub const YEAR_COLUMN: &str = "Year";
pub const VALUE_COLUMN: &str = "Total number of international immigrants";

/// One long-format row of the migration source table. Extra columns in
/// the file (e.g. the ISO `Code` column) are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRecord {
    pub entity: String,
    pub year: i32,
    /// Missing when the source cell is empty.
    pub value: Option<f64>,
}

#[derive(Debug)]
pub enum MigrationCsvError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidRecord {
        record: u64,
        reason: String,
    },
}

impl std::fmt::Display for MigrationCsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationCsvError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            MigrationCsvError::Csv(e) => write!(f, "malformed CSV: {e}"),
            MigrationCsvError::MissingColumn(name) => {
                write!(f, "missing required column: {name}")
            }
            MigrationCsvError::InvalidRecord { record, reason } => {
                write!(f, "invalid record {record}: {reason}")
            }
        }
    }
}

impl std::error::Error for MigrationCsvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationCsvError::Io { source, .. } => Some(source),
            MigrationCsvError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

pub fn read_migration_csv(path: impl AsRef<Path>) -> Result<Vec<MigrationRecord>, MigrationCsvError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MigrationCsvError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_migration_csv(file)
}

pub fn parse_migration_csv(reader: impl Read) -> Result<Vec<MigrationRecord>, MigrationCsvError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers().map_err(MigrationCsvError::Csv)?.clone();
    let col = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(MigrationCsvError::MissingColumn(name))
    };
    let entity_col = col(ENTITY_COLUMN)?;
    let year_col = col(YEAR_COLUMN)?;
    let value_col = col(VALUE_COLUMN)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(MigrationCsvError::Csv)?;
        let record_no = i as u64 + 1;

        let field = |idx: usize| {
            record
                .get(idx)
                .ok_or_else(|| MigrationCsvError::InvalidRecord {
                    record: record_no,
                    reason: format!("expected at least {} fields", idx + 1),
                })
        };

        let entity = field(entity_col)?.trim().to_string();
        if entity.is_empty() {
            return Err(MigrationCsvError::InvalidRecord {
                record: record_no,
                reason: "empty entity name".to_string(),
            });
        }

        let year_str = field(year_col)?.trim();
        let year = year_str
            .parse::<i32>()
            .map_err(|_| MigrationCsvError::InvalidRecord {
                record: record_no,
                reason: format!("bad year: {year_str:?}"),
            })?;

        let value_str = field(value_col)?.trim();
        let value = if value_str.is_empty() {
            None
        } else {
            let v = value_str
                .parse::<f64>()
                .map_err(|_| MigrationCsvError::InvalidRecord {
                    record: record_no,
                    reason: format!("bad value: {value_str:?}"),
                })?;
            Some(v)
        };

        records.push(MigrationRecord { entity, year, value });
    }

    Ok(records)
}
