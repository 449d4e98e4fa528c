pub mod boundaries;
pub mod migration_csv;

pub use boundaries::*;
pub use migration_csv::*;
