// Output module
pub mod export;
pub mod table;

pub use export::{export_calls, write_calls};
pub use table::{CallRow, OutputFormat, PricingRow};
