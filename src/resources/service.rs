//! Node service control through the platform service manager.
//!
//! Linux uses systemd, macOS launchd, Windows a scheduled task plus
//! `taskkill`. Every call goes through an [`Executor`].
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::platform::Os;

const SYSTEMD_UNIT: &str = "cellframe-node";
const LAUNCHD_LABEL: &str = "com.demlabs.cellframe-node";
const LAUNCHD_PLIST: &str = "/Library/LaunchDaemons/com.demlabs.cellframe-node.plist";
const WINDOWS_TASK: &str = "CellframeNode";
const WINDOWS_IMAGE: &str = "cellframe-node.exe";

/// Service operations available to scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    /// Start the node on boot.
    Enable,
    /// Do not start the node on boot.
    Disable,
    /// Start the node now.
    Start,
    /// Stop the node now.
    Stop,
    /// Stop then start the node.
    Restart,
    /// Report enabled/running without changing anything.
    Status,
}

impl ServiceAction {
    /// Parse a script token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "enable" => Some(Self::Enable),
            "disable" => Some(Self::Disable),
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "restart" => Some(Self::Restart),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Status => "status",
        };
        f.write_str(s)
    }
}

/// Observed service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    /// Registered to start on boot.
    pub enabled: bool,
    /// A node process is running.
    pub running: bool,
}

/// One external command line.
type Invocation = (&'static str, Vec<String>);

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| (*a).to_string()).collect()
}

/// Drives the platform service manager for the node.
#[derive(Debug, Clone)]
pub struct ServiceManager {
    os: Os,
    node_binary_dir: PathBuf,
}

impl ServiceManager {
    /// Create a manager for `os`; `node_binary_dir` is used when registering
    /// the Windows task.
    #[must_use]
    pub fn new(os: Os, node_binary_dir: &Path) -> Self {
        Self {
            os,
            node_binary_dir: node_binary_dir.to_path_buf(),
        }
    }

    /// Program that must be on `PATH` for this platform.
    #[must_use]
    pub const fn tool(&self) -> &'static str {
        match self.os {
            Os::Linux => "systemctl",
            Os::MacOs => "launchctl",
            Os::Windows => "schtasks",
        }
    }

    /// Query whether the service is enabled and running.
    ///
    /// # Errors
    ///
    /// Returns an error if a query program cannot be spawned.
    pub fn status(&self, exec: &dyn Executor) -> Result<ServiceStatus> {
        match self.os {
            Os::Linux => {
                let enabled = exec.run_unchecked("systemctl", &["is-enabled", SYSTEMD_UNIT])?;
                let active = exec.run_unchecked("systemctl", &["is-active", SYSTEMD_UNIT])?;
                Ok(ServiceStatus {
                    enabled: enabled.success,
                    running: active.success,
                })
            }
            Os::MacOs => {
                let listed = exec.run_unchecked("launchctl", &["list", LAUNCHD_LABEL])?;
                Ok(ServiceStatus {
                    enabled: listed.success,
                    running: listed.success && listed.stdout.contains("\"PID\""),
                })
            }
            Os::Windows => {
                let task = exec.run_unchecked("schtasks", &["/Query", "/TN", WINDOWS_TASK])?;
                let filter = format!("IMAGENAME eq {WINDOWS_IMAGE}");
                let procs = exec.run_unchecked("tasklist", &["/FI", filter.as_str(), "/NH"])?;
                Ok(ServiceStatus {
                    enabled: task.success,
                    running: procs.stdout.contains(WINDOWS_IMAGE),
                })
            }
        }
    }

    /// Command lines that perform `action`, in order.
    #[must_use]
    pub fn invocations(&self, action: ServiceAction) -> Vec<Invocation> {
        match (self.os, action) {
            (_, ServiceAction::Status) => Vec::new(),
            (Os::Linux, action) => {
                let verb = action.to_string();
                vec![("systemctl", owned(&[verb.as_str(), SYSTEMD_UNIT]))]
            }
            (Os::MacOs, ServiceAction::Enable) => {
                vec![("launchctl", owned(&["load", "-w", LAUNCHD_PLIST]))]
            }
            (Os::MacOs, ServiceAction::Disable) => {
                vec![("launchctl", owned(&["unload", "-w", LAUNCHD_PLIST]))]
            }
            (Os::MacOs, ServiceAction::Start) => vec![("launchctl", owned(&["start", LAUNCHD_LABEL]))],
            (Os::MacOs, ServiceAction::Stop) => vec![("launchctl", owned(&["stop", LAUNCHD_LABEL]))],
            (Os::MacOs, ServiceAction::Restart) => {
                let target = format!("system/{LAUNCHD_LABEL}");
                vec![("launchctl", owned(&["kickstart", "-k", target.as_str()]))]
            }
            (Os::Windows, ServiceAction::Enable) => {
                let binary = self.node_binary_dir.join(WINDOWS_IMAGE).display().to_string();
                vec![(
                    "schtasks",
                    owned(&[
                        "/Create", "/F", "/RL", "HIGHEST", "/SC", "ONSTART", "/RU", "SYSTEM",
                        "/TN", WINDOWS_TASK, "/TR", binary.as_str(),
                    ]),
                )]
            }
            (Os::Windows, ServiceAction::Disable) => {
                vec![("schtasks", owned(&["/Delete", "/F", "/TN", WINDOWS_TASK]))]
            }
            (Os::Windows, ServiceAction::Start) => {
                vec![("schtasks", owned(&["/Run", "/TN", WINDOWS_TASK]))]
            }
            (Os::Windows, ServiceAction::Stop) => {
                vec![("taskkill", owned(&["/F", "/IM", WINDOWS_IMAGE]))]
            }
            (Os::Windows, ServiceAction::Restart) => {
                let mut steps = self.invocations(ServiceAction::Stop);
                steps.extend(self.invocations(ServiceAction::Start));
                steps
            }
        }
    }

    /// Perform `action` unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if any step exits non-zero.
    pub fn run(&self, action: ServiceAction, exec: &dyn Executor) -> Result<()> {
        for (program, args) in self.invocations(action) {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            exec.run(program, &args)?;
        }
        Ok(())
    }
}

/// Desired service state for one idempotent action (enable, disable, start,
/// stop).
#[derive(Debug)]
pub struct ServiceUnit<'a> {
    manager: &'a ServiceManager,
    action: ServiceAction,
    exec: &'a dyn Executor,
}

impl<'a> ServiceUnit<'a> {
    /// Describe the state reached by `action`.
    #[must_use]
    pub const fn new(manager: &'a ServiceManager, action: ServiceAction, exec: &'a dyn Executor) -> Self {
        Self {
            manager,
            action,
            exec,
        }
    }
}

impl Resource for ServiceUnit<'_> {
    fn description(&self) -> String {
        format!("service {}", self.action)
    }

    fn current_state(&self) -> Result<ResourceState> {
        let status = self.manager.status(self.exec)?;
        Ok(match self.action {
            ServiceAction::Enable if status.enabled => ResourceState::Correct,
            ServiceAction::Start if status.running => ResourceState::Correct,
            ServiceAction::Enable | ServiceAction::Start => ResourceState::Missing,
            ServiceAction::Disable if status.enabled => ResourceState::Incorrect {
                current: "enabled".to_string(),
            },
            ServiceAction::Stop if status.running => ResourceState::Incorrect {
                current: "running".to_string(),
            },
            ServiceAction::Disable | ServiceAction::Stop => ResourceState::Correct,
            ServiceAction::Restart | ServiceAction::Status => ResourceState::Invalid {
                reason: format!("{} is not a state", self.action),
            },
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.manager.run(self.action, self.exec)?;
        Ok(ResourceChange::Applied)
    }
}
