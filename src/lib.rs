// llm-observatory library crate
// Exposes modules for integration testing

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod observatory;
pub mod output;
pub mod parser;
pub mod utils;

pub use error::{ObservatoryError, ObservatoryResult};
pub use observatory::Observatory;
