pub mod model;
pub mod parse;

pub use model::{AnalysisResult, Module, Project, Summary, Violation};
pub use parse::parse_output;
