use crate::TOOL_NAME;
use crate::config::Repository;
use crate::error::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Osx,
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// A platform the tool publishes release assets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub os: Os,
    pub arch: Arch,
}

impl Target {
    /// The platform this binary was compiled for.
    pub fn current() -> Result<Self, ActionError> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Accepts both Rust (`macos`, `x86_64`) and runner (`darwin`, `x64`)
    /// spellings. Anything else is unsupported rather than guessed.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self, ActionError> {
        let unsupported = || ActionError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };

        let os_kind = match os.to_ascii_lowercase().as_str() {
            "linux" => Os::Linux,
            "macos" | "darwin" | "osx" => Os::Osx,
            "windows" | "win32" | "win" => Os::Win,
            _ => return Err(unsupported()),
        };
        let arch_kind = match arch.to_ascii_lowercase().as_str() {
            "x86_64" | "x64" | "amd64" => Arch::X64,
            "aarch64" | "arm64" => Arch::Arm64,
            _ => return Err(unsupported()),
        };

        Ok(Self {
            os: os_kind,
            arch: arch_kind,
        })
    }

    pub fn os_label(&self) -> &'static str {
        match self.os {
            Os::Linux => "linux",
            Os::Osx => "osx",
            Os::Win => "win",
        }
    }

    pub fn arch_label(&self) -> &'static str {
        match self.arch {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }

    pub fn archive_kind(&self) -> ArchiveKind {
        match self.os {
            Os::Win => ArchiveKind::Zip,
            Os::Linux | Os::Osx => ArchiveKind::TarGz,
        }
    }

    /// e.g. `modularguard-linux-x64.tar.gz`
    pub fn asset_name(&self) -> String {
        format!(
            "{TOOL_NAME}-{}-{}.{}",
            self.os_label(),
            self.arch_label(),
            self.archive_kind().extension()
        )
    }

    pub fn binary_name(&self) -> String {
        match self.os {
            Os::Win => format!("{TOOL_NAME}.exe"),
            Os::Linux | Os::Osx => TOOL_NAME.to_string(),
        }
    }
}

/// Release download URL for a concrete (already resolved) version.
pub fn download_url(repository: &Repository, version: &str, target: &Target) -> String {
    format!(
        "https://github.com/{repository}/releases/download/v{version}/{}",
        target.asset_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> Repository {
        Repository::parse("modularguard/ModularGuard").unwrap()
    }

    #[test]
    fn linux_x64_uses_tarball() {
        let t = Target::from_parts("linux", "x86_64").unwrap();
        assert_eq!(
            download_url(&repo(), "1.2.3", &t),
            "https://github.com/modularguard/ModularGuard/releases/download/v1.2.3/modularguard-linux-x64.tar.gz"
        );
        assert_eq!(t.binary_name(), "modularguard");
    }

    #[test]
    fn windows_uses_zip_and_exe() {
        let t = Target::from_parts("windows", "x86_64").unwrap();
        assert_eq!(t.asset_name(), "modularguard-win-x64.zip");
        assert_eq!(t.binary_name(), "modularguard.exe");
    }

    #[test]
    fn mac_arm_is_osx_arm64() {
        let t = Target::from_parts("macos", "aarch64").unwrap();
        assert_eq!(t.asset_name(), "modularguard-osx-arm64.tar.gz");
        assert_eq!(Target::from_parts("darwin", "arm64").unwrap(), t);
    }

    #[test]
    fn unsupported_combinations_fail() {
        assert!(matches!(
            Target::from_parts("freebsd", "x86_64"),
            Err(ActionError::UnsupportedPlatform { .. })
        ));
        assert!(Target::from_parts("linux", "riscv64").is_err());
        assert!(Target::from_parts("linux", "x86").is_err());
    }
}
