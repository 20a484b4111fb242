// Models module
pub mod call_record;
pub mod pricing;

pub use call_record::CallRecord;
pub use pricing::{FALLBACK_PRICING, PricingEntry, PricingTable};
