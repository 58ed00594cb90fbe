pub mod config;
pub mod directory;
pub mod errors;
pub mod reporting;
pub mod sweep;
pub mod utils;
