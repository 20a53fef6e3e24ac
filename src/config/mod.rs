pub mod resolver;
pub mod schema;

pub use resolver::{ConfigResolver, ConfigWarning, DelimitedField, ResolvedConfig};
pub use schema::{load_from_path, load_from_str, ConfigError, Settings};
