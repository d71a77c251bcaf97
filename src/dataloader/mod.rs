pub mod parser;
pub mod table;

pub use parser::read_file;
pub use table::{TimeSeriesTable, Timestamp};
