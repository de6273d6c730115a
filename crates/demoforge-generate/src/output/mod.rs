//! Output writers for generated record batches.

pub mod csv;
pub mod json;

pub use csv::write_records_csv;
pub use json::write_records_json;
