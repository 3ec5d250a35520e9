use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ActionError;
use crate::tool::platform::ArchiveKind;

/// A downloaded release archive and its fingerprint.
#[derive(Debug, Clone)]
pub struct ArchiveInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 of the archive bytes.
    pub sha256: String,
}

impl ArchiveInfo {
    /// Fails with `Integrity` when `expected` is set and does not match.
    pub fn verify(&self, expected: Option<&str>) -> Result<(), ActionError> {
        match expected {
            Some(expected) if !expected.eq_ignore_ascii_case(&self.sha256) => {
                Err(ActionError::Integrity {
                    expected: expected.to_string(),
                    actual: self.sha256.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Read an archive from disk and fingerprint it.
///
/// The digest depends only on file bytes, not on metadata.
pub fn read_archive(path: &Path) -> Result<ArchiveInfo, ActionError> {
    let bytes = fs::read(path).map_err(|e| {
        ActionError::acquisition(format!("failed to read archive {}: {e}", path.display()))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    Ok(ArchiveInfo {
        path: path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        sha256: hex::encode(hasher.finalize()),
    })
}

/// Unpack `archive` into `dest` using the platform's archiver.
pub fn extract(archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<(), ActionError> {
    fs::create_dir_all(dest)?;

    let mut cmd = match kind {
        ArchiveKind::TarGz => {
            let mut c = Command::new("tar");
            c.arg("-xzf").arg(archive).arg("-C").arg(dest);
            c
        }
        // bsdtar ships with Windows and reads zip archives.
        ArchiveKind::Zip if cfg!(windows) => {
            let mut c = Command::new("tar");
            c.arg("-xf").arg(archive).arg("-C").arg(dest);
            c
        }
        ArchiveKind::Zip => {
            let mut c = Command::new("unzip");
            c.arg("-o").arg("-q").arg(archive).arg("-d").arg(dest);
            c
        }
    };

    let program = cmd.get_program().to_string_lossy().into_owned();
    let output = cmd
        .output()
        .map_err(|e| ActionError::acquisition(format!("cannot run {program}: {e}")))?;

    if !output.status.success() {
        return Err(ActionError::acquisition(format!(
            "{program} failed to extract {} ({}): {}",
            archive.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// Locate `binary_name` at the top of `dir` or up to two levels below it.
pub fn find_binary(dir: &Path, binary_name: &str) -> Option<PathBuf> {
    find_within(dir, binary_name, 2)
}

fn find_within(dir: &Path, binary_name: &str, depth: usize) -> Option<PathBuf> {
    let direct = dir.join(binary_name);
    if direct.is_file() {
        return Some(direct);
    }
    if depth == 0 {
        return None;
    }
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();
    subdirs
        .iter()
        .find_map(|sub| find_within(sub, binary_name, depth - 1))
}

/// Mark a file as executable for its owner, group and others.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<(), ActionError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<(), ActionError> {
    Ok(())
}
