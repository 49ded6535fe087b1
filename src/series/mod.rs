pub mod aggregate;
pub mod columns;
pub mod write;

pub use aggregate::{aggregate, aggregate_file, SeriesRecord};
pub use columns::required_columns;
pub use write::write_series;
