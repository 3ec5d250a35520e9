use std::path::PathBuf;

use clap::Parser;
use guardrun_core::config::{DEFAULT_CHECK_NAME, DEFAULT_TOOL_REPOSITORY, Inputs, LATEST};

#[derive(Debug, Parser)]
#[command(
    name = "guardrun",
    version,
    about = "Run ModularGuard architecture checks and report them on GitHub pull requests"
)]
pub struct Args {
    /// Directory to analyse, relative to the workspace
    #[arg(long, env = "INPUT_DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    /// ModularGuard configuration file
    #[arg(long, env = "INPUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tool version to install, or `latest`
    #[arg(long, env = "INPUT_VERSION", default_value = LATEST)]
    pub tool_version: String,

    /// GitHub token (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Name of the check run
    #[arg(long, env = "INPUT_CHECK_NAME", default_value = DEFAULT_CHECK_NAME)]
    pub check_name: String,

    /// Expected SHA-256 of the downloaded release archive
    #[arg(long, env = "INPUT_BINARY_SHA256")]
    pub binary_sha256: Option<String>,

    /// Repository the tool is released from
    #[arg(long, env = "INPUT_TOOL_REPOSITORY", default_value = DEFAULT_TOOL_REPOSITORY)]
    pub tool_repository: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn inputs(&self) -> Inputs {
        Inputs {
            directory: self.directory.clone(),
            config: self.config.clone(),
            version: self.tool_version.clone(),
            token: self.token.clone(),
            check_name: self.check_name.clone(),
            binary_sha256: self.binary_sha256.clone(),
            tool_repository: self.tool_repository.clone(),
        }
    }
}
