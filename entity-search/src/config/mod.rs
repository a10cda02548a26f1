//! Runtime configuration for the entity search tool.

mod dependencies;
mod logging;

pub use dependencies::Dependencies;
pub use logging::{init_tracing, LogFormat};
