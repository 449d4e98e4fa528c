pub mod geometry;
pub mod merge;
pub mod repository;
pub mod table;

pub use geometry::*;
pub use merge::*;
pub use repository::*;
pub use table::*;
