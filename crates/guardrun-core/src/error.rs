use thiserror::Error;

/// Coarse failure class used to decide how a failure propagates.
///
/// Environment, acquisition, execution and output failures abort the run.
/// Publication failures are reported but never change the job verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Environment,
    Acquisition,
    Execution,
    Output,
    Publication,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("missing required environment variable `{0}`")]
    MissingEnv(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("failed to acquire {tool} binary: {reason}")]
    Acquisition { tool: String, reason: String },

    #[error("archive checksum mismatch: expected {expected}, got {actual}")]
    Integrity { expected: String, actual: String },

    #[error("failed to execute {binary}: {source}")]
    Execution {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{reason}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    Output {
        reason: String,
        stdout: String,
        stderr: String,
    },

    #[error("GitHub API {operation} failed: {reason}")]
    Api { operation: String, reason: String },

    #[error("failed to write {path}: {source}")]
    WorkflowFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ActionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingEnv(_) | Self::Config(_) | Self::WorkflowFile { .. } => {
                ErrorClass::Environment
            }
            Self::UnsupportedPlatform { .. } | Self::Acquisition { .. } | Self::Integrity { .. } => {
                ErrorClass::Acquisition
            }
            Self::Execution { .. } => ErrorClass::Execution,
            Self::Output { .. } => ErrorClass::Output,
            Self::Api { .. } => ErrorClass::Publication,
            // Runner files go through `WorkflowFile`; bare IO is the tool cache.
            Self::Io(_) => ErrorClass::Acquisition,
        }
    }

    pub(crate) fn acquisition(reason: impl Into<String>) -> Self {
        Self::Acquisition {
            tool: crate::TOOL_NAME.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn workflow_file(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::WorkflowFile {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn api(operation: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Api {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }
}
