//! Detecting administrative rights and relaunching with them

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::exit;

#[derive(Debug, thiserror::Error)]
/// Errors that can occur while relaunching with elevated privileges
pub enum ElevateError {
    /// The path of the running program could not be determined
    #[error("Error getting executable path: {0}")]
    ExecutableUnknown(#[source] std::io::Error),
    /// The escalation tool could not be started
    #[error("Failed to elevate privileges: {0}")]
    Spawn(#[source] std::io::Error),
    /// The escalation ran but did not succeed
    #[error("Failed to elevate privileges: {0}")]
    Unsuccessful(ExitStatus),
}

impl ElevateError {
    /// The status the original process exits with
    pub fn exit_code(&self) -> u8 {
        match self {
            ElevateError::ExecutableUnknown(_) => exit::FAILURE,
            ElevateError::Spawn(_) | ElevateError::Unsuccessful(_) => exit::ELEVATION_FAILED,
        }
    }
}

/// Ways of checking for and acquiring administrative rights
pub trait PrivilegeProbe {
    /// Does the current process already have administrative rights?
    fn is_elevated(&self) -> bool;

    /// Run this program again with administrative rights and the given
    /// arguments, waiting for it to finish.
    fn elevate(&self, args: &[String]) -> Result<(), ElevateError>;
}

/// The path of the running program
fn current_exe() -> Result<PathBuf, ElevateError> {
    std::env::current_exe().map_err(ElevateError::ExecutableUnknown)
}

/// Run a command attached to this process's standard streams and wait for it
pub fn run_attached(cmd: &mut Command) -> std::io::Result<ExitStatus> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
}

/// Run an escalation command, mapping anything but success to an error
fn run_escalation(cmd: &mut Command) -> Result<(), ElevateError> {
    log::debug!("running {:?}", cmd);
    let status = run_attached(cmd).map_err(ElevateError::Spawn)?;
    if status.success() {
        Ok(())
    } else {
        Err(ElevateError::Unsuccessful(status))
    }
}

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub use self::windows::RunAs;

        /// The privilege probe for this platform
        pub fn platform_probe() -> RunAs {
            RunAs
        }
    } else {
        mod unix;
        pub use self::unix::Sudo;

        /// The privilege probe for this platform
        pub fn platform_probe() -> Sudo {
            Sudo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let e = ElevateError::ExecutableUnknown(std::io::Error::other("gone"));
        assert_eq!(e.exit_code(), exit::FAILURE);
        let e = ElevateError::Spawn(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(e.exit_code(), exit::ELEVATION_FAILED);
        assert_eq!(e.exit_code(), 61);
    }

    #[cfg(unix)]
    #[test]
    fn unsuccessful_escalation_is_an_error() {
        let mut cmd = Command::new("false");
        let err = run_escalation(&mut cmd).unwrap_err();
        assert!(matches!(err, ElevateError::Unsuccessful(_)));
        assert_eq!(err.exit_code(), exit::ELEVATION_FAILED);
    }

    #[cfg(unix)]
    #[test]
    fn missing_tool_is_a_spawn_error() {
        let mut cmd = Command::new("/nonexistent/escalate");
        let err = run_escalation(&mut cmd).unwrap_err();
        assert!(matches!(err, ElevateError::Spawn(_)));
    }

    #[cfg(unix)]
    #[test]
    fn attached_command_reports_status() {
        let status = run_attached(&mut Command::new("true")).unwrap();
        assert!(status.success());
    }
}
