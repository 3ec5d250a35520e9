//! One end-to-end action run.
//!
//! Steps, strictly sequential:
//!
//!   1. find pull requests for the commit (none means standalone mode)
//!   2. acquire the analysis binary
//!   3. run it and parse its JSON output
//!   4. make violation paths workspace-relative
//!   5. in PR mode: publish a check run, then upsert one comment per PR
//!   6. write step outputs
//!   7. decide the verdict
//!
//! Steps 2-4 abort the run on failure. Publication failures in step 5 are
//! logged and collected; each PR is handled independently and a failed
//! check run does not prevent comments.
//!
//! Verdict policy: any violation, error or warning, fails the run.

use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::error::ActionError;
use crate::exec::{AnalysisRequest, AnalysisRunner};
use crate::github::client::GitHubApi;
use crate::github::comments::{CommentAction, upsert_comment};
use crate::outputs::{ActionOutputs, append_step_summary, write_outputs};
use crate::paths::normalize_path;
use crate::report::check_run::build_check_run;
use crate::report::markdown::render_comment;
use crate::result::model::AnalysisResult;
use crate::result::parse::parse_output;
use crate::tool::install::BinaryProvider;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Result with workspace-relative paths.
    pub result: AnalysisResult,
    pub outputs: ActionOutputs,
    /// Empty in standalone mode.
    pub pull_requests: Vec<u64>,
    pub comments: Vec<(u64, CommentAction)>,
    pub check_run_id: Option<u64>,
    /// Reporting failures; these never change the verdict.
    pub publication_errors: Vec<String>,
    /// Set when the run must fail the job.
    pub failure: Option<String>,
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_failure() { 1 } else { 0 }
    }
}

pub fn run(
    config: &RunConfig,
    api: &dyn GitHubApi,
    provider: &dyn BinaryProvider,
    runner: &dyn AnalysisRunner,
) -> Result<RunOutcome, ActionError> {
    let mut publication_errors = Vec::new();

    let pull_requests = match api.pulls_for_commit(&config.sha) {
        Ok(prs) => prs.into_iter().map(|pr| pr.number).collect::<Vec<_>>(),
        Err(e) => {
            warn!(error = %e, "could not list pull requests, continuing without publication");
            publication_errors.push(e.to_string());
            Vec::new()
        }
    };
    if pull_requests.is_empty() {
        info!(sha = %config.sha, "no associated pull request, running standalone");
    } else {
        info!(?pull_requests, "found associated pull requests");
    }

    let binary = provider.acquire(&config.tool_version)?;

    let request = AnalysisRequest {
        directory: config.directory.clone(),
        config_file: config.config_file.clone(),
    };
    let raw = runner.run(&binary, &request)?;
    if raw.exit_code != Some(0) {
        info!(exit_code = ?raw.exit_code, "analysis exited non-zero, inspecting output");
    }
    let result = parse_output(&raw.stdout, &raw.stderr)?
        .with_rewritten_paths(|p| normalize_path(p, &config.workspace));

    info!(
        modules = result.summary.total_modules,
        projects = result.summary.total_projects,
        errors = result.summary.error_count,
        warnings = result.summary.warning_count,
        "analysis complete"
    );

    let body = render_comment(&result, config.run_url.as_deref());
    if let Err(e) = append_step_summary(config.step_summary.as_deref(), &body) {
        warn!(error = %e, "could not write job summary");
    }

    let mut check_run_id = None;
    let mut comments = Vec::new();
    if !pull_requests.is_empty() {
        match api.create_check_run(&config.check_name, &config.sha, &build_check_run(&result)) {
            Ok(id) => {
                info!(check_run_id = id, "created check run");
                check_run_id = Some(id);
            }
            Err(e) => {
                error!(error = %e, "failed to create check run");
                publication_errors.push(e.to_string());
            }
        }

        for &pr in &pull_requests {
            match upsert_comment(api, pr, &body) {
                Ok(action) => comments.push((pr, action)),
                Err(e) => {
                    error!(pr, error = %e, "failed to publish comment");
                    publication_errors.push(format!("PR #{pr}: {e}"));
                }
            }
        }
    }

    let outputs = ActionOutputs::from_result(&result);
    write_outputs(config.output_file.as_deref(), &outputs)?;

    let failure = verdict(&result);

    Ok(RunOutcome {
        result,
        outputs,
        pull_requests,
        comments,
        check_run_id,
        publication_errors,
        failure,
    })
}

/// Failure message when the result contains any violation.
pub fn verdict(result: &AnalysisResult) -> Option<String> {
    if result.violations.is_empty() {
        return None;
    }
    Some(format!(
        "Architecture violations found: {} error(s), {} warning(s)",
        result.summary.error_count, result.summary.warning_count
    ))
}
