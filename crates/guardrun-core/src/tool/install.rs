use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_API_URL, LATEST, Repository, RunConfig};
use crate::error::ActionError;
use crate::tool::archive::{extract, find_binary, make_executable, read_archive};
use crate::tool::cache::{CacheKey, ToolCache};
use crate::tool::platform::{Target, download_url};
use crate::{TOOL_NAME, USER_AGENT};

/// Supplies a runnable analysis binary.
pub trait BinaryProvider {
    /// Path to an executable for `version` (`latest` or a bare semver).
    fn acquire(&self, version: &str) -> Result<PathBuf, ActionError>;
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

/// Downloads release assets into the tool cache.
pub struct ToolInstaller {
    http: Client,
    cache: ToolCache,
    target: Target,
    repository: Repository,
    token: Option<String>,
    expected_sha256: Option<String>,
}

impl ToolInstaller {
    pub fn new(config: &RunConfig, target: Target) -> Result<Self, ActionError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ActionError::acquisition(format!("cannot build HTTP client: {e}")))?;

        // The tool is published on github.com; a GHES token is useless there.
        let token = (config.api_url == DEFAULT_API_URL).then(|| config.token.clone());

        Ok(Self {
            http,
            cache: ToolCache::new(&config.tool_cache),
            target,
            repository: config.tool_repository.clone(),
            token,
            expected_sha256: config.expected_sha256.clone(),
        })
    }

    /// Newest tagged release, with the `v` prefix stripped.
    pub fn resolve_latest(&self) -> Result<String, ActionError> {
        let url = format!(
            "{DEFAULT_API_URL}/repos/{}/releases/latest",
            self.repository
        );
        debug!(%url, "resolving latest release");

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let release: Release = request
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| ActionError::acquisition(format!("cannot resolve latest release: {e}")))?;

        Ok(strip_tag_prefix(&release.tag_name))
    }

    fn install(&self, version: &str, key: CacheKey<'_>) -> Result<PathBuf, ActionError> {
        let url = download_url(&self.repository, version, &self.target);
        info!(%url, "downloading {TOOL_NAME}");

        let staging = tempfile::tempdir()?;
        let archive_path = staging.path().join(self.target.asset_name());
        let mut response = self
            .http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ActionError::acquisition(format!("download of {url} failed: {e}")))?;
        let mut file = File::create(&archive_path)?;
        response
            .copy_to(&mut file)
            .map_err(|e| ActionError::acquisition(format!("download of {url} failed: {e}")))?;
        drop(file);

        let archive = read_archive(&archive_path)?;
        info!(
            size_bytes = archive.size_bytes,
            sha256 = %archive.sha256,
            "downloaded archive"
        );
        archive.verify(self.expected_sha256.as_deref())?;

        let dir = self.cache.prepare(key)?;
        extract(&archive.path, self.target.archive_kind(), &dir)?;

        let binary = find_binary(&dir, &self.target.binary_name()).ok_or_else(|| {
            ActionError::acquisition(format!(
                "{} not found in {}",
                self.target.binary_name(),
                self.target.asset_name()
            ))
        })?;
        make_executable(&binary)?;
        self.cache.complete(key, &archive.sha256)?;
        Ok(binary)
    }

    /// Cached binary for `key`, if the entry is complete and was installed
    /// from an archive matching the configured checksum.
    fn cached_binary(&self, key: CacheKey<'_>) -> Option<PathBuf> {
        let dir = self.cache.find(key)?;
        if let Some(expected) = &self.expected_sha256 {
            let recorded = self.cache.recorded_digest(key);
            if !recorded
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(expected))
            {
                warn!(
                    version = key.version,
                    expected = %expected,
                    recorded = recorded.as_deref().unwrap_or("none"),
                    "cached {TOOL_NAME} does not match the configured checksum, reinstalling"
                );
                return None;
            }
        }
        find_binary(&dir, &self.target.binary_name())
    }
}

impl BinaryProvider for ToolInstaller {
    fn acquire(&self, version: &str) -> Result<PathBuf, ActionError> {
        let version = if version == LATEST {
            self.resolve_latest()?
        } else {
            version.to_string()
        };
        let key = CacheKey {
            tool: TOOL_NAME,
            version: &version,
            arch: self.target.arch_label(),
        };

        if let Some(binary) = self.cached_binary(key) {
            info!(version = %version, path = %binary.display(), "using cached {TOOL_NAME}");
            return Ok(binary);
        }

        let binary = self.install(&version, key)?;
        info!(version = %version, path = %binary.display(), "installed {TOOL_NAME}");
        Ok(binary)
    }
}

fn strip_tag_prefix(tag: &str) -> String {
    let tag = tag.trim();
    tag.strip_prefix('v').unwrap_or(tag).to_string()
}
