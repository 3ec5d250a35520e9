pub mod config;
pub mod error;
pub mod exec;
pub mod github;
pub mod outputs;
pub mod paths;
pub mod pipeline;
pub mod report;
pub mod result;
pub mod tool;

pub use error::{ActionError, ErrorClass};
pub use pipeline::{RunOutcome, run};

/// Name of the external analysis tool this action drives.
pub const TOOL_NAME: &str = "modularguard";

/// Hard cap on annotations accepted by a single check-run call.
pub const MAX_ANNOTATIONS: usize = 50;

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("guardrun/", env!("CARGO_PKG_VERSION"));
