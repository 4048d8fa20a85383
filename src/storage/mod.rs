pub mod csv;
pub mod sqlite;

pub use csv::{read_asset_list, read_table, write_report};
pub use sqlite::{load_report_files, ReportStore};
