pub mod csv;
pub mod summary;

pub use crate::csv::{export_csv, write_csv, ExportError, COLUMNS};
pub use summary::RunSummary;
