//! The validated configuration for one run of the installer

use std::path::PathBuf;

use crate::cli::Args;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
/// Reasons the command line cannot be acted on
pub enum UsageError {
    /// Install mode needs every descriptor flag
    #[error("missing required flags: {}", .0.join(", "))]
    MissingFlags(Vec<&'static str>),
    /// Uninstall mode needs the service name
    #[error("service name required for uninstallation")]
    MissingName,
    /// The program to launch must be given as an absolute path
    #[error("executable path must be absolute: {}", .0.display())]
    RelativeExecutable(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What the run should do to the service
pub enum Action {
    /// Register the service
    Install,
    /// Remove the service
    Uninstall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Describes the service to register or remove
pub struct ServiceDescriptor {
    /// The identifier of the service for the operating system
    pub name: String,
    /// The name shown to users, same as the name
    pub display_name: String,
    /// What the service does
    pub description: String,
    /// The program the service runs
    pub executable: PathBuf,
    /// The account the service runs as
    pub user: String,
}

impl ServiceDescriptor {
    /// A descriptor carrying only the name, enough to find and remove a service
    pub fn named(name: String) -> Self {
        Self {
            display_name: name.clone(),
            name,
            description: String::new(),
            executable: PathBuf::new(),
            user: String::new(),
        }
    }

    /// Convert into the configuration understood by the service backend
    pub fn service_config(&self) -> service::ServiceConfig {
        let mut config = service::ServiceConfig::new(
            self.name.clone(),
            self.description.clone(),
            self.executable.clone(),
            Some(self.user.clone()).filter(|u| !u.is_empty()),
        );
        config.display = self.display_name.clone();
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable settings built once from the command line
pub struct InstallerConfig {
    /// Install or uninstall
    pub action: Action,
    /// The service being acted on
    pub descriptor: ServiceDescriptor,
}

impl TryFrom<Args> for InstallerConfig {
    type Error = UsageError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.uninstall {
            if args.name.is_empty() {
                return Err(UsageError::MissingName);
            }
            return Ok(Self {
                action: Action::Uninstall,
                descriptor: ServiceDescriptor::named(args.name),
            });
        }

        let missing: Vec<&'static str> = [
            ("-name", &args.name),
            ("-description", &args.description),
            ("-exec", &args.exec),
            ("-user", &args.user),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(flag, _)| flag)
        .collect();
        if !missing.is_empty() {
            return Err(UsageError::MissingFlags(missing));
        }

        let executable = PathBuf::from(args.exec);
        if !executable.is_absolute() {
            return Err(UsageError::RelativeExecutable(executable));
        }

        Ok(Self {
            action: Action::Install,
            descriptor: ServiceDescriptor {
                display_name: args.name.clone(),
                name: args.name,
                description: args.description,
                executable,
                user: args.user,
            },
        })
    }
}
