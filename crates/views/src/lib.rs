pub mod choropleth;
pub mod globe;
pub mod sankey;
pub mod selection;

pub use choropleth::*;
pub use globe::*;
pub use sankey::*;
pub use selection::*;
