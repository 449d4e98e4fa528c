use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use formats::boundaries::{BoundaryCollection, BoundaryError};
use formats::migration_csv::{MigrationCsvError, parse_migration_csv};

use crate::geometry::CountryGeometry;
use crate::table::{MigrationTable, TableBuildError};

#[derive(Debug)]
pub enum DatasetError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    NotUtf8 {
        path: PathBuf,
    },
    MigrationCsv(MigrationCsvError),
    Boundaries(BoundaryError),
    Table(TableBuildError),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            DatasetError::NotUtf8 { path } => {
                write!(f, "{} is not valid UTF-8", path.display())
            }
            DatasetError::MigrationCsv(e) => write!(f, "migration table: {e}"),
            DatasetError::Boundaries(e) => write!(f, "boundary file: {e}"),
            DatasetError::Table(e) => write!(f, "migration table: {e}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io { source, .. } => Some(source),
            DatasetError::NotUtf8 { .. } => None,
            DatasetError::MigrationCsv(e) => Some(e),
            DatasetError::Boundaries(e) => Some(e),
            DatasetError::Table(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedEntry<T> {
    /// blake3 hash of the source bytes at load time.
    version: String,
    value: T,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RepositoryStats {
    pub loads: u64,
    pub hits: u64,
}

/// Explicit, passed-in load cache: each distinct source is read and
/// cleaned once, then reused for the lifetime of the repository. No
/// eviction; at most one entry per distinct source path.
#[derive(Debug, Default)]
pub struct DatasetRepository {
    migrations: BTreeMap<PathBuf, CachedEntry<MigrationTable>>,
    boundaries: BTreeMap<PathBuf, CachedEntry<CountryGeometry>>,
    stats: RepositoryStats,
}

impl DatasetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cleaned migration table for `path`, loading it on first use.
    pub fn migration_table(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&MigrationTable, DatasetError> {
        let key = cache_key(path.as_ref());
        let entry = match self.migrations.entry(key) {
            Entry::Occupied(e) => {
                self.stats.hits += 1;
                e.into_mut()
            }
            Entry::Vacant(v) => {
                let bytes = read_source(path.as_ref())?;
                let version = blake3::hash(&bytes).to_hex().to_string();
                let records =
                    parse_migration_csv(bytes.as_slice()).map_err(DatasetError::MigrationCsv)?;
                let table = MigrationTable::build(&records).map_err(DatasetError::Table)?;
                self.stats.loads += 1;
                v.insert(CachedEntry {
                    version,
                    value: table,
                })
            }
        };
        Ok(&entry.value)
    }

    /// The boundary rows (with centroids) for `path`, loading on first use.
    pub fn country_geometry(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&CountryGeometry, DatasetError> {
        let key = cache_key(path.as_ref());
        let entry = match self.boundaries.entry(key) {
            Entry::Occupied(e) => {
                self.stats.hits += 1;
                e.into_mut()
            }
            Entry::Vacant(v) => {
                let bytes = read_source(path.as_ref())?;
                let version = blake3::hash(&bytes).to_hex().to_string();
                let payload = std::str::from_utf8(&bytes).map_err(|_| DatasetError::NotUtf8 {
                    path: path.as_ref().to_path_buf(),
                })?;
                let collection = BoundaryCollection::from_geojson_str(payload)
                    .map_err(DatasetError::Boundaries)?;
                self.stats.loads += 1;
                v.insert(CachedEntry {
                    version,
                    value: CountryGeometry::from_collection(collection),
                })
            }
        };
        Ok(&entry.value)
    }

    /// Content version (blake3 hex) recorded when `path` was loaded.
    pub fn version(&self, path: impl AsRef<Path>) -> Option<&str> {
        let key = cache_key(path.as_ref());
        self.migrations
            .get(&key)
            .map(|e| e.version.as_str())
            .or_else(|| self.boundaries.get(&key).map(|e| e.version.as_str()))
    }

    pub fn stats(&self) -> RepositoryStats {
        self.stats
    }
}

fn cache_key(path: &Path) -> PathBuf {
    // Canonicalize so two spellings of the same file share an entry;
    // fall back to the given path if the file vanished (the read will
    // then report the real error).
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read_source(path: &Path) -> Result<Vec<u8>, DatasetError> {
    fs::read(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
