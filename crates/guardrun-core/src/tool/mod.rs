pub mod archive;
pub mod cache;
pub mod install;
pub mod platform;

pub use install::{BinaryProvider, ToolInstaller};
pub use platform::Target;
