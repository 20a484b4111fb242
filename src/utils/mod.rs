// Utility functions module
pub mod format;
pub mod timestamp;

// Re-export for easy access
pub use format::*;
pub use timestamp::hour_of;
