//! Privileges on unix like systems, escalated with sudo

use std::path::Path;
use std::process::Command;

use super::{current_exe, run_escalation, ElevateError, PrivilegeProbe};

/// Root check by effective user id, escalation through `sudo`
pub struct Sudo;

impl Sudo {
    /// Build the sudo invocation that reruns `exe` with `args`
    fn command(exe: &Path, args: &[String]) -> Command {
        let mut cmd = Command::new("sudo");
        cmd.arg(exe).args(args);
        cmd
    }

    /// The composed command line, shown before running it
    fn describe(cmd: &Command) -> String {
        let line: Vec<String> = std::iter::once(cmd.get_program())
            .chain(cmd.get_args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        format!("Elevating privileges: {}", line.join(" "))
    }
}

impl PrivilegeProbe for Sudo {
    fn is_elevated(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }

    fn elevate(&self, args: &[String]) -> Result<(), ElevateError> {
        let exe = current_exe()?;
        let mut cmd = Self::command(&exe, args);
        println!("{}", Self::describe(&cmd));
        run_escalation(&mut cmd)
    }
}
