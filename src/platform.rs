//! Host platform detection and install-root defaults.
use std::fmt;
use std::path::PathBuf;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux and other Unix-like systems without a dedicated layout.
    Linux,
    /// macOS, where the node ships as an application bundle.
    MacOs,
    /// Windows.
    Windows,
}

impl fmt::Display for Os {
    /// Renders the value published as `HOST_OS` to setup scripts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "Linux"),
            Self::MacOs => write!(f, "MacOS"),
            Self::Windows => write!(f, "Windows"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with explicit values (for testing).
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Default root of the node installation (holds `etc/` and `share/`).
    #[must_use]
    pub fn default_install_root(&self) -> PathBuf {
        match self.os {
            Os::Linux => PathBuf::from("/opt/cellframe-node"),
            Os::MacOs => PathBuf::from("/Applications/CellframeNode.app/Contents/Resources"),
            Os::Windows => windows::common_documents()
                .map_or_else(|| PathBuf::from("C:\\Users\\Public\\Documents"), PathBuf::from)
                .join("cellframe-node"),
        }
    }

    /// Directory containing the node executable.
    #[must_use]
    pub fn node_binary_dir(&self) -> PathBuf {
        match self.os {
            Os::Linux => PathBuf::from("/opt/cellframe-node/bin"),
            Os::MacOs => PathBuf::from("/Applications/CellframeNode.app/Contents/MacOS"),
            Os::Windows => windows::node_install_path()
                .map_or_else(|| PathBuf::from("C:\\Program Files\\cellframe-node"), PathBuf::from),
        }
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            // Default to Linux for other Unix-like systems
            Os::Linux
        }
    }
}

/// Host name of this machine, or `"unknown"` when it cannot be determined.
#[must_use]
pub fn hostname() -> String {
    whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(windows)]
mod windows {
    use winreg::RegKey;
    use winreg::enums::HKEY_LOCAL_MACHINE;

    fn read_hklm(subkey: &str, value: &str) -> Option<String> {
        RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey(subkey)
            .and_then(|key| key.get_value::<String, _>(value))
            .ok()
            .filter(|v| !v.is_empty())
    }

    pub(super) fn common_documents() -> Option<String> {
        read_hklm(
            "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Shell Folders",
            "Common Documents",
        )
    }

    pub(super) fn node_install_path() -> Option<String> {
        read_hklm("SOFTWARE\\cellframe-node", "Path")
    }
}

#[cfg(not(windows))]
mod windows {
    pub(super) const fn common_documents() -> Option<String> {
        None
    }

    pub(super) const fn node_install_path() -> Option<String> {
        None
    }
}
