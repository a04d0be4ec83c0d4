//! Contains code for registering a service with the operating system

use std::path::PathBuf;

pub use log;

/// The various levels of log, increasing in severity
pub enum LogLevel {
    /// Trace
    Trace,
    /// Debug
    Debug,
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

impl LogLevel {
    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            crate::LogLevel::Debug => log::LevelFilter::Debug,
            crate::LogLevel::Info => log::LevelFilter::Info,
            crate::LogLevel::Warning => log::LevelFilter::Warn,
            crate::LogLevel::Error => log::LevelFilter::Error,
            crate::LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Initialize a console logger. `RUST_LOG` overrides the given level.
pub fn init_console_log(level: LogLevel) -> Result<(), log::SetLoggerError> {
    simple_logger::SimpleLogger::new()
        .with_level(level.level_filter())
        .env()
        .init()
}

#[derive(Debug, thiserror::Error)]
/// Errors that can occur when talking to the service manager of the system
pub enum Error {
    /// There is no supported service manager on this system
    #[error("no service system detected")]
    NoServiceSystemDetected,
    /// The service is not registered with the system
    #[error("the service is not installed")]
    NotInstalled,
    /// A service with the same name is already registered
    #[error("the service is already installed")]
    AlreadyInstalled,
    /// A service manager command does not exist or is not callable
    #[error("unable to run {0}: {1}")]
    CommandUnavailable(&'static str, #[source] std::io::Error),
    /// A service manager command returned an error
    #[error("{command} failed: {message}")]
    CommandFailed {
        /// The command line that failed
        command: String,
        /// What the command reported
        message: String,
    },
    /// Unable to create, write or remove the service definition file
    #[error("service file error: {0}")]
    FileIo(#[from] std::io::Error),
    /// An operating system specific error code
    #[error("operating system error code {0}")]
    Os(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// The run state of an installed service
pub enum Status {
    /// The service is running
    Running,
    /// The service is installed but not running
    Stopped,
    /// The service manager reported something else
    Unknown,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// The configuration for constructing a Service.
pub struct ServiceConfig {
    /// The short name of the service, as known by the operating system
    pub name: String,
    /// The display name of the service for the user.
    pub display: String,
    /// The description of the service as presented to the user
    pub description: String,
    /// The path to the service binary
    pub binary: PathBuf,
    /// The username that the service should run as
    pub username: Option<String>,
    /// The arguments for the service
    pub arguments: Vec<String>,
}

impl ServiceConfig {
    /// Build a new service config with reasonable defaults.
    /// # Arguments
    /// * name - The name of the service, also used as the display name
    /// * description - The description of the service
    /// * binary - The path to the binary that runs the service
    /// * username - The username the service runs as
    pub fn new(
        name: String,
        description: String,
        binary: PathBuf,
        username: Option<String>,
    ) -> Self {
        Self {
            display: name.clone(),
            name,
            description,
            binary,
            username,
            arguments: Vec::new(),
        }
    }

    /// The command line that starts the service, binary first.
    /// The binary is quoted when it contains whitespace.
    pub fn command_line(&self) -> String {
        let binary = self.binary.display().to_string();
        let binary = if binary.chars().any(char::is_whitespace) {
            format!("\"{}\"", binary)
        } else {
            binary
        };
        if self.arguments.is_empty() {
            binary
        } else {
            format!("{} {}", binary, self.arguments.join(" "))
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub use winapi;
        pub use self::windows::*;
    } else if #[cfg(target_os = "macos")] {
        mod macos;
        pub use self::macos::*;
    } else if #[cfg(target_os = "linux")] {
        mod linux;
        pub use self::linux::*;
    } else {
        mod unsupported;
        pub use self::unsupported::*;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_defaults_to_name() {
        let config = ServiceConfig::new(
            "backup".into(),
            "Nightly backups".into(),
            PathBuf::from("/usr/local/bin/backup"),
            Some("root".into()),
        );
        assert_eq!(config.display, "backup");
        assert!(config.arguments.is_empty());
    }

    #[test]
    fn command_line_appends_arguments() {
        let mut config = ServiceConfig::new(
            "backup".into(),
            "Nightly backups".into(),
            PathBuf::from("/usr/local/bin/backup"),
            None,
        );
        assert_eq!(config.command_line(), "/usr/local/bin/backup");
        config.arguments = vec!["--quiet".into(), "--once".into()];
        assert_eq!(config.command_line(), "/usr/local/bin/backup --quiet --once");
    }

    #[test]
    fn command_line_quotes_binary_with_spaces() {
        let mut config = ServiceConfig::new(
            "backup".into(),
            "Nightly backups".into(),
            PathBuf::from(r"C:\Program Files\Backup\backup.exe"),
            None,
        );
        assert_eq!(
            config.command_line(),
            r#""C:\Program Files\Backup\backup.exe""#
        );
        config.arguments = vec!["--once".into()];
        assert_eq!(
            config.command_line(),
            r#""C:\Program Files\Backup\backup.exe" --once"#
        );
    }
}
