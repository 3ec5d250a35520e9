//! Run configuration.
//!
//! Everything the pipeline needs from the outside world is resolved here,
//! once, at the start of a run. Later stages receive a `&RunConfig` and never
//! consult the process environment themselves.

use std::path::{Path, PathBuf};

use crate::error::ActionError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SERVER_URL: &str = "https://github.com";
pub const DEFAULT_TOOL_REPOSITORY: &str = "modularguard/ModularGuard";
pub const DEFAULT_CHECK_NAME: &str = "ModularGuard";
pub const LATEST: &str = "latest";

/// User-facing action inputs, as collected by the CLI.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub directory: PathBuf,
    pub config: Option<PathBuf>,
    pub version: String,
    pub token: Option<String>,
    pub check_name: String,
    pub binary_sha256: Option<String>,
    pub tool_repository: String,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            config: None,
            version: LATEST.to_string(),
            token: None,
            check_name: DEFAULT_CHECK_NAME.to_string(),
            binary_sha256: None,
            tool_repository: DEFAULT_TOOL_REPOSITORY.to_string(),
        }
    }
}

/// `owner/name` of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn parse(slug: &str) -> Result<Self, ActionError> {
        match slug.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ActionError::Config(format!(
                "repository must look like `owner/name`, got `{slug}`"
            ))),
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory handed to `modularguard check`.
    pub directory: PathBuf,
    pub config_file: Option<PathBuf>,

    /// `latest` or a bare version such as `1.4.0`.
    pub tool_version: String,
    pub tool_repository: Repository,
    /// Lowercase hex SHA-256 the downloaded archive must match.
    pub expected_sha256: Option<String>,
    pub tool_cache: PathBuf,

    pub repository: Repository,
    pub sha: String,
    pub token: String,
    pub check_name: String,

    /// Root that violation paths are made relative to.
    pub workspace: PathBuf,
    pub api_url: String,
    pub run_url: Option<String>,

    pub output_file: Option<PathBuf>,
    pub step_summary: Option<PathBuf>,
}

impl RunConfig {
    /// Resolve inputs against the environment exposed through `lookup`.
    ///
    /// Empty variables count as unset, matching how the runner passes
    /// optional inputs.
    pub fn resolve(
        inputs: Inputs,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ActionError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ActionError::MissingEnv(key));

        let repository = Repository::parse(&required("GITHUB_REPOSITORY")?)?;
        let sha = required("GITHUB_SHA")?;
        let token = inputs
            .token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| var("GITHUB_TOKEN"))
            .ok_or(ActionError::MissingEnv("GITHUB_TOKEN"))?;

        let workspace = match var("GITHUB_WORKSPACE") {
            Some(ws) => PathBuf::from(ws),
            None => std::env::current_dir().map_err(|e| {
                ActionError::Config(format!("cannot determine working directory: {e}"))
            })?,
        };

        let api_url = var("GITHUB_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let server_url = var("GITHUB_SERVER_URL")
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let run_url = var("GITHUB_RUN_ID")
            .map(|id| format!("{server_url}/{repository}/actions/runs/{id}"));

        let tool_cache = var("RUNNER_TOOL_CACHE")
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|d| d.join("guardrun")))
            .unwrap_or_else(|| std::env::temp_dir().join("guardrun-tool-cache"));

        let expected_sha256 = inputs
            .binary_sha256
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_sha256(&s))
            .transpose()?;

        let tool_repository = if inputs.tool_repository.trim().is_empty() {
            Repository::parse(DEFAULT_TOOL_REPOSITORY)?
        } else {
            Repository::parse(&inputs.tool_repository)?
        };

        let check_name = if inputs.check_name.trim().is_empty() {
            DEFAULT_CHECK_NAME.to_string()
        } else {
            inputs.check_name
        };

        Ok(Self {
            directory: resolve_against(&workspace, &inputs.directory),
            config_file: inputs
                .config
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| resolve_against(&workspace, &p)),
            tool_version: normalize_version(&inputs.version),
            tool_repository,
            expected_sha256,
            tool_cache,
            repository,
            sha,
            token,
            check_name,
            workspace,
            api_url,
            run_url,
            output_file: var("GITHUB_OUTPUT").map(PathBuf::from),
            step_summary: var("GITHUB_STEP_SUMMARY").map(PathBuf::from),
        })
    }
}

fn resolve_against(workspace: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

fn normalize_version(version: &str) -> String {
    let v = version.trim();
    if v.is_empty() || v.eq_ignore_ascii_case(LATEST) {
        LATEST.to_string()
    } else {
        v.strip_prefix('v').unwrap_or(v).to_string()
    }
}

fn parse_sha256(s: &str) -> Result<String, ActionError> {
    let s = s.trim().to_ascii_lowercase();
    if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(s)
    } else {
        Err(ActionError::Config(format!(
            "binary-sha256 must be 64 hex characters, got `{s}`"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn base_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("GITHUB_REPOSITORY", "acme/shop"),
            ("GITHUB_SHA", "abc123"),
            ("GITHUB_TOKEN", "t0k3n"),
            ("GITHUB_WORKSPACE", "/ws"),
            ("RUNNER_TOOL_CACHE", "/opt/hostedtoolcache"),
        ]
    }

    #[test]
    fn resolves_defaults() {
        let cfg = RunConfig::resolve(Inputs::default(), env(&base_env())).unwrap();

        assert_eq!(cfg.repository.to_string(), "acme/shop");
        assert_eq!(cfg.sha, "abc123");
        assert_eq!(cfg.token, "t0k3n");
        assert_eq!(cfg.workspace, PathBuf::from("/ws"));
        assert_eq!(cfg.directory, PathBuf::from("/ws/."));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.tool_version, LATEST);
        assert_eq!(cfg.tool_cache, PathBuf::from("/opt/hostedtoolcache"));
        assert_eq!(cfg.check_name, DEFAULT_CHECK_NAME);
        assert!(cfg.run_url.is_none());
        assert!(cfg.output_file.is_none());
    }

    #[test]
    fn builds_run_url_when_run_id_present() {
        let mut vars = base_env();
        vars.push(("GITHUB_RUN_ID", "42"));
        vars.push(("GITHUB_SERVER_URL", "https://ghe.example.com/"));
        let cfg = RunConfig::resolve(Inputs::default(), env(&vars)).unwrap();
        assert_eq!(
            cfg.run_url.as_deref(),
            Some("https://ghe.example.com/acme/shop/actions/runs/42")
        );
    }

    #[test]
    fn missing_repository_is_environment_error() {
        let vars: Vec<_> = base_env()
            .into_iter()
            .filter(|(k, _)| *k != "GITHUB_REPOSITORY")
            .collect();
        let err = RunConfig::resolve(Inputs::default(), env(&vars)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Environment);
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));
    }

    #[test]
    fn empty_variable_counts_as_missing() {
        let mut vars = base_env();
        vars.retain(|(k, _)| *k != "GITHUB_SHA");
        vars.push(("GITHUB_SHA", ""));
        let err = RunConfig::resolve(Inputs::default(), env(&vars)).unwrap_err();
        assert!(matches!(err, ActionError::MissingEnv("GITHUB_SHA")));
    }

    #[test]
    fn token_input_wins_over_environment() {
        let inputs = Inputs {
            token: Some("from-input".into()),
            ..Inputs::default()
        };
        let cfg = RunConfig::resolve(inputs, env(&base_env())).unwrap();
        assert_eq!(cfg.token, "from-input");
    }

    #[test]
    fn missing_token_is_fatal() {
        let vars: Vec<_> = base_env()
            .into_iter()
            .filter(|(k, _)| *k != "GITHUB_TOKEN")
            .collect();
        let err = RunConfig::resolve(Inputs::default(), env(&vars)).unwrap_err();
        assert!(matches!(err, ActionError::MissingEnv("GITHUB_TOKEN")));
    }

    #[test]
    fn malformed_repository_is_rejected() {
        let mut vars = base_env();
        vars.retain(|(k, _)| *k != "GITHUB_REPOSITORY");
        vars.push(("GITHUB_REPOSITORY", "no-slash"));
        assert!(RunConfig::resolve(Inputs::default(), env(&vars)).is_err());
    }

    #[test]
    fn version_and_paths_are_normalized() {
        let inputs = Inputs {
            directory: "src".into(),
            config: Some("/etc/modularguard.json".into()),
            version: "v1.4.0".into(),
            ..Inputs::default()
        };
        let cfg = RunConfig::resolve(inputs, env(&base_env())).unwrap();
        assert_eq!(cfg.tool_version, "1.4.0");
        assert_eq!(cfg.directory, PathBuf::from("/ws/src"));
        assert_eq!(cfg.config_file, Some(PathBuf::from("/etc/modularguard.json")));
    }

    #[test]
    fn checksum_input_is_validated() {
        let good = Inputs {
            binary_sha256: Some("AB".repeat(32)),
            ..Inputs::default()
        };
        let cfg = RunConfig::resolve(good, env(&base_env())).unwrap();
        assert_eq!(cfg.expected_sha256, Some("ab".repeat(32)));

        let bad = Inputs {
            binary_sha256: Some("xyz".into()),
            ..Inputs::default()
        };
        assert!(RunConfig::resolve(bad, env(&base_env())).is_err());
    }
}
