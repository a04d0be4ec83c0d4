//! Privileges on windows, escalated through a UAC prompt

use std::path::Path;
use std::process::Command;

use super::{current_exe, run_escalation, ElevateError, PrivilegeProbe};

/// Quote a value for a single quoted powershell string
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Admin check through the service control manager, escalation through `Start-Process -Verb RunAs`
pub struct RunAs;

impl RunAs {
    /// The powershell script that reruns `exe` with `args` elevated and waits for it
    fn script(exe: &Path, args: &[String]) -> String {
        let mut script = format!("Start-Process {}", ps_quote(&exe.display().to_string()));
        if !args.is_empty() {
            let list: Vec<String> = args.iter().map(|a| ps_quote(a)).collect();
            script.push_str(&format!(" -ArgumentList {}", list.join(",")));
        }
        script.push_str(" -Verb RunAs -Wait");
        script
    }
}

impl PrivilegeProbe for RunAs {
    fn is_elevated(&self) -> bool {
        // full access to the service control manager is only granted to administrators
        service::ServiceController::open(service::winapi::um::winsvc::SC_MANAGER_ALL_ACCESS)
            .is_ok()
    }

    fn elevate(&self, args: &[String]) -> Result<(), ElevateError> {
        let exe = current_exe()?;
        let mut cmd = Command::new("powershell");
        cmd.arg("-NoProfile")
            .arg("-Command")
            .arg(Self::script(&exe, args));
        run_escalation(&mut cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_quotes_arguments() {
        let args = vec!["-name".to_string(), "bob's service".to_string()];
        let script = RunAs::script(Path::new(r"C:\Tools\installer.exe"), &args);
        assert_eq!(
            script,
            r"Start-Process 'C:\Tools\installer.exe' -ArgumentList '-name','bob''s service' -Verb RunAs -Wait"
        );
    }

    #[test]
    fn script_without_arguments() {
        let script = RunAs::script(Path::new(r"C:\Tools\installer.exe"), &[]);
        assert_eq!(script, r"Start-Process 'C:\Tools\installer.exe' -Verb RunAs -Wait");
    }
}
