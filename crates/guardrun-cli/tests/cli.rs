#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn guardrun_cmd() -> Command {
    let mut cmd = Command::cargo_bin("guardrun-cli").expect("binary should be built");
    cmd.env_clear();
    cmd
}

#[test]
fn help_lists_action_inputs() {
    guardrun_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--directory"))
        .stdout(predicate::str::contains("--tool-version"))
        .stdout(predicate::str::contains("--check-name"));
}

#[test]
fn version_flag_prints_version() {
    guardrun_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_repository_fails_before_any_network_call() {
    guardrun_cmd()
        .env("GITHUB_SHA", "abc")
        .env("GITHUB_TOKEN", "t")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("::error::"))
        .stdout(predicate::str::contains("GITHUB_REPOSITORY"));
}

#[test]
fn missing_token_fails() {
    guardrun_cmd()
        .env("GITHUB_REPOSITORY", "acme/shop")
        .env("GITHUB_SHA", "abc")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn malformed_checksum_input_is_rejected() {
    let workspace = tempfile::tempdir().unwrap();
    guardrun_cmd()
        .env("GITHUB_REPOSITORY", "acme/shop")
        .env("GITHUB_SHA", "abc")
        .env("GITHUB_TOKEN", "t")
        .env("GITHUB_WORKSPACE", workspace.path())
        .env("INPUT_BINARY_SHA256", "not-a-digest")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("binary-sha256"));
}

#[test]
fn malformed_repository_is_rejected() {
    guardrun_cmd()
        .env("GITHUB_REPOSITORY", "just-a-name")
        .env("GITHUB_SHA", "abc")
        .env("GITHUB_TOKEN", "t")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("owner/name"));
}

#[test]
fn logs_go_to_stderr() {
    guardrun_cmd()
        .env("GITHUB_SHA", "abc")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_REPOSITORY"));
}

/// Seeds the tool cache with a stand-in binary that prints a clean result.
#[cfg(unix)]
fn seed_tool_cache(root: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;

    let arch = if cfg!(target_arch = "aarch64") { "arm64" } else { "x64" };
    let version_dir = root.join("modularguard").join("1.2.3");
    let entry = version_dir.join(arch);
    std::fs::create_dir_all(&entry).unwrap();

    let binary = entry.join("modularguard");
    std::fs::write(
        &binary,
        "#!/bin/sh\nprintf '%s\\n' '{\"summary\":{\"totalModules\":1,\"totalProjects\":1,\"errorCount\":0,\"warningCount\":0,\"isValid\":true},\"modules\":[],\"violations\":[]}'\n",
    )
    .unwrap();
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::fs::write(version_dir.join(format!("{arch}.complete")), b"").unwrap();
}

#[cfg(unix)]
#[test]
fn publication_failure_is_reported_as_error_without_failing() {
    let workspace = tempfile::tempdir().unwrap();
    let cache = tempfile::tempdir().unwrap();
    seed_tool_cache(cache.path());

    guardrun_cmd()
        .env("GITHUB_REPOSITORY", "acme/shop")
        .env("GITHUB_SHA", "abc")
        .env("GITHUB_TOKEN", "t")
        .env("GITHUB_WORKSPACE", workspace.path())
        .env("GITHUB_API_URL", "http://127.0.0.1:9")
        .env("RUNNER_TOOL_CACHE", cache.path())
        .env("INPUT_VERSION", "1.2.3")
        .assert()
        .success()
        .stdout(predicate::str::contains("::error::"))
        .stdout(predicate::str::contains("::warning::").not());
}
