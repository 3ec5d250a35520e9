use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::ActionError;

/// What to analyse.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub directory: PathBuf,
    pub config_file: Option<PathBuf>,
}

impl AnalysisRequest {
    /// Arguments in the order the tool expects:
    /// `check <dir> --format json --quiet [--config <path>]`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "check".to_string(),
            self.directory.display().to_string(),
            "--format".to_string(),
            "json".to_string(),
            "--quiet".to_string(),
        ];
        if let Some(config) = &self.config_file {
            args.push("--config".to_string());
            args.push(config.display().to_string());
        }
        args
    }
}

/// Fully buffered process output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

pub trait AnalysisRunner {
    fn run(&self, binary: &Path, request: &AnalysisRequest) -> Result<RawOutput, ActionError>;
}

/// Runs the tool as a child process and waits for it to exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl AnalysisRunner for ProcessRunner {
    fn run(&self, binary: &Path, request: &AnalysisRequest) -> Result<RawOutput, ActionError> {
        let args = request.args();
        info!(binary = %binary.display(), ?args, "running analysis");

        let output = Command::new(binary)
            .args(&args)
            .output()
            .map_err(|source| ActionError::Execution {
                binary: binary.display().to_string(),
                source,
            })?;

        // A non-zero exit is expected when violations exist; only the
        // parsed stdout decides whether the run produced a result.
        let exit_code = output.status.code();
        debug!(?exit_code, stdout_bytes = output.stdout.len(), "analysis finished");

        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn builds_arguments_without_config() {
        let req = AnalysisRequest {
            directory: "/ws/src".into(),
            config_file: None,
        };
        assert_eq!(req.args(), vec!["check", "/ws/src", "--format", "json", "--quiet"]);
    }

    #[test]
    fn appends_config_flag() {
        let req = AnalysisRequest {
            directory: "/ws".into(),
            config_file: Some("/ws/guard.json".into()),
        };
        let args = req.args();
        assert_eq!(&args[5..], ["--config", "/ws/guard.json"]);
    }

    #[test]
    fn missing_binary_is_execution_error() {
        let req = AnalysisRequest {
            directory: ".".into(),
            config_file: None,
        };
        let err = ProcessRunner
            .run(Path::new("/definitely/not/here/modularguard"), &req)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Execution);
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_and_nonzero_exit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("modularguard");
        std::fs::write(&script, "#!/bin/sh\necho \"$1 $3\"\necho oops >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let req = AnalysisRequest {
            directory: dir.path().to_path_buf(),
            config_file: None,
        };
        let out = ProcessRunner.run(&script, &req).unwrap();
        assert_eq!(out.stdout.trim(), "check json");
        assert_eq!(out.stderr.trim(), "oops");
        assert_eq!(out.exit_code, Some(1));
    }
}
