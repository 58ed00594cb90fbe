pub mod commands;
pub mod probe;
pub mod sweep;

pub use commands::{Cli, Commands};
