//! Workflow step outputs and job summary.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ActionError;
use crate::result::model::AnalysisResult;

pub const OUTPUT_VIOLATIONS: &str = "violations-count";
pub const OUTPUT_ERRORS: &str = "error-count";
pub const OUTPUT_WARNINGS: &str = "warning-count";
pub const OUTPUT_STATUS: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Failure => "failure",
        })
    }
}

/// The four outputs exposed to later workflow steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutputs {
    pub violations_count: usize,
    pub error_count: u64,
    pub warning_count: u64,
    /// Gated on errors only; warnings still report `success`.
    pub status: Status,
}

impl ActionOutputs {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let s = &result.summary;
        Self {
            violations_count: result.violations.len(),
            error_count: s.error_count,
            warning_count: s.warning_count,
            status: if s.error_count > 0 {
                Status::Failure
            } else {
                Status::Success
            },
        }
    }

    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            (OUTPUT_VIOLATIONS, self.violations_count.to_string()),
            (OUTPUT_ERRORS, self.error_count.to_string()),
            (OUTPUT_WARNINGS, self.warning_count.to_string()),
            (OUTPUT_STATUS, self.status.to_string()),
        ]
    }
}

/// Append outputs to the runner's `GITHUB_OUTPUT` file.
///
/// Without an output file (local runs) the values are only logged.
pub fn write_outputs(path: Option<&Path>, outputs: &ActionOutputs) -> Result<(), ActionError> {
    let Some(path) = path else {
        for (key, value) in outputs.pairs() {
            info!(output = key, %value, "no GITHUB_OUTPUT file, output not exported");
        }
        return Ok(());
    };

    let fail = |e| ActionError::workflow_file(path, e);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(fail)?;
    for (key, value) in outputs.pairs() {
        writeln!(file, "{key}={value}").map_err(fail)?;
    }
    debug!(path = %path.display(), "wrote step outputs");
    Ok(())
}

/// Append markdown to the job summary, if the runner provides one.
pub fn append_step_summary(path: Option<&Path>, markdown: &str) -> Result<(), ActionError> {
    let Some(path) = path else {
        return Ok(());
    };
    let fail = |e| ActionError::workflow_file(path, e);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(fail)?;
    writeln!(file, "{markdown}").map_err(fail)?;
    Ok(())
}
