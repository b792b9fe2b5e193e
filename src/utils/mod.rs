pub mod csv_handler;
pub mod date;

pub use date::{format_date_dmy, parse_iso_date};
