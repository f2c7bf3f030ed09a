//! Resolution of what to run and how to connect
//!
//! - `MethodResolver`: picks the backend operation from the supplied filters
//! - `ConfigResolver`: merges client settings from env and config files

mod method_resolver;
mod config_resolver;

pub use method_resolver::{pick_method, Method, MethodResolver, MethodRule, Resolution};
pub use config_resolver::{ConfigResolver, ResolvedConfig};
