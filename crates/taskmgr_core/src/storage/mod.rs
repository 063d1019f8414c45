pub mod csv_export;
pub mod json_store;
