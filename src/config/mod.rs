pub mod loader;
pub mod parser;
pub mod types;

pub use types::*;
pub use loader::load_identity_list;
pub use parser::parse_config;
