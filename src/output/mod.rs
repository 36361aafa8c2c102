//! Files consumed and produced by runs
//!
//! - [`csv`] - Export CSV writer and id CSV reader
//! - [`report`] - JSON run report

pub mod csv;
pub mod report;

pub use self::csv::{read_id_csv, read_id_file, write_export_csv, ExportFile, IdList};
pub use self::report::write_report_file;
