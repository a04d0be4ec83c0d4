//! Command line flags

use std::ffi::OsString;

use clap::{CommandFactory, Parser};

/// Printed by `-help`
pub const ABOUT: &str = "Utility program that helps creating or removing a system service for launching a program at startup.

For installation, all flags except -uninstall are required.
For uninstallation, only -name and -uninstall flags are required.";

/// Flags that consume the following argument as their value
const VALUE_FLAGS: [&str; 4] = ["name", "description", "exec", "user"];

#[derive(Debug, Default, Parser)]
#[command(
    name = "service-installer",
    version,
    about = "Creates or removes a system service for launching a program at startup",
    disable_help_flag = true
)]
pub struct Args {
    /// Name of the service to launch at startup
    #[arg(long, default_value = "", hide_default_value = true, allow_hyphen_values = true)]
    pub name: String,

    /// Small description of what the service does
    #[arg(long, default_value = "", hide_default_value = true, allow_hyphen_values = true)]
    pub description: String,

    /// Absolute path of the program to execute at startup
    #[arg(
        long = "exec",
        value_name = "PATH",
        default_value = "",
        hide_default_value = true,
        allow_hyphen_values = true
    )]
    pub exec: String,

    /// Id of the user to launch the service
    #[arg(long, default_value = "", hide_default_value = true, allow_hyphen_values = true)]
    pub user: String,

    /// Uninstall the service
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub uninstall: bool,

    /// Prints program usage
    #[arg(long)]
    pub help: bool,
}

impl Args {
    /// Parse the process arguments, accepting `-flag` as well as `--flag`.
    /// Exits with status 2 on malformed input.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize(std::env::args_os()))
    }
}

/// Rewrite single dash long flags (`-name`, `-name=x`) into the double dash form
pub fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut expecting_value = false;
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough || expecting_value {
            expecting_value = false;
            out.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let flag = if let Some(rest) = text.strip_prefix("--") {
            rest
        } else if let Some(rest) = text.strip_prefix('-').filter(|rest| rest.len() > 1) {
            rest
        } else {
            out.push(arg);
            continue;
        };
        expecting_value = !flag.contains('=') && VALUE_FLAGS.contains(&flag);
        out.push(OsString::from(format!("--{}", flag)));
    }
    out
}

/// Print the flag summary to stderr
pub fn print_usage() {
    eprintln!("{}", Args::command().render_help());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(normalize(args.iter().copied())).unwrap()
    }

    #[test]
    fn single_dash_flags() {
        let args = parse(&[
            "service-installer",
            "-name",
            "backup",
            "-description=Nightly backups",
            "-exec",
            "/usr/local/bin/backup",
            "-user",
            "root",
        ]);
        assert_eq!(args.name, "backup");
        assert_eq!(args.description, "Nightly backups");
        assert_eq!(args.exec, "/usr/local/bin/backup");
        assert_eq!(args.user, "root");
        assert!(!args.uninstall);
        assert!(!args.help);
    }

    #[test]
    fn double_dash_flags() {
        let args = parse(&["service-installer", "--name", "backup", "--uninstall"]);
        assert_eq!(args.name, "backup");
        assert!(args.uninstall);
        assert!(args.description.is_empty());
    }

    #[test]
    fn values_starting_with_dash_are_kept() {
        let args = parse(&["service-installer", "-description", "-quiet-", "-help"]);
        assert_eq!(args.description, "-quiet-");
        assert!(args.help);
    }

    #[test]
    fn uninstall_takes_an_optional_boolean() {
        let args = parse(&["service-installer", "-name", "backup", "-uninstall=true"]);
        assert!(args.uninstall);
        let args = parse(&["service-installer", "-name", "backup", "-uninstall=false"]);
        assert!(!args.uninstall);
        let args = parse(&["service-installer", "-uninstall", "-name", "backup"]);
        assert!(args.uninstall);
        assert_eq!(args.name, "backup");
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let err = Args::try_parse_from(normalize(["service-installer", "-bogus"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn program_name_untouched() {
        let out = normalize(["-weird-name", "-user", "root"]);
        assert_eq!(out, vec!["-weird-name", "--user", "root"]);
    }
}
