//! Installs or removes the service once the process is elevated

use crate::config::{Action, InstallerConfig, ServiceDescriptor};
use crate::exit;
use crate::privilege::ElevateError;

/// Operations the installer needs from a registered service
pub trait ServiceControl {
    /// The name of the mechanism managing the service
    fn platform(&self) -> String;
    /// The run state, or [service::Error::NotInstalled]
    fn status(&self) -> Result<service::Status, service::Error>;
    /// Register the service
    fn install(&self) -> Result<(), service::Error>;
    /// Remove the service
    fn uninstall(&self) -> Result<(), service::Error>;
}

/// Finds the service manager for a descriptor
pub trait ServiceConnector {
    type Service: ServiceControl;

    /// Fails with [service::Error::NoServiceSystemDetected] when the system has no service manager
    fn connect(&self, descriptor: &ServiceDescriptor) -> Result<Self::Service, service::Error>;
}

impl ServiceControl for service::Service {
    fn platform(&self) -> String {
        service::Service::platform(self).to_string()
    }

    fn status(&self) -> Result<service::Status, service::Error> {
        service::Service::status(self)
    }

    fn install(&self) -> Result<(), service::Error> {
        service::Service::install(self)
    }

    fn uninstall(&self) -> Result<(), service::Error> {
        service::Service::uninstall(self)
    }
}

/// Connects to the service manager of the running system
pub struct SystemConnector;

impl ServiceConnector for SystemConnector {
    type Service = service::Service;

    fn connect(&self, descriptor: &ServiceDescriptor) -> Result<Self::Service, service::Error> {
        service::Service::new(descriptor.service_config())
    }
}

#[derive(Debug)]
/// How a run of the installer ended
pub enum Outcome {
    /// The service was registered with the named mechanism
    Installed(String),
    /// The service was removed
    Uninstalled,
    /// Nothing to install
    AlreadyInstalled,
    /// Nothing to uninstall
    NotInstalled,
    /// An elevated copy of the program did the work
    Relaunched,
    /// The system has no service manager
    NoServiceSystem,
    /// Connecting to the service manager failed
    ConnectFailed(service::Error),
    /// Registering the service failed
    InstallFailed(service::Error),
    /// Removing the service failed
    UninstallFailed(service::Error),
    /// Relaunching with elevated privileges failed
    ElevationFailed(ElevateError),
}

impl Outcome {
    /// The status the process exits with
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Installed(_)
            | Outcome::Uninstalled
            | Outcome::AlreadyInstalled
            | Outcome::NotInstalled
            | Outcome::Relaunched => exit::SUCCESS,
            Outcome::NoServiceSystem => exit::NO_SERVICE_SYSTEM,
            Outcome::ConnectFailed(_) | Outcome::InstallFailed(_) | Outcome::UninstallFailed(_) => {
                exit::FAILURE
            }
            Outcome::ElevationFailed(e) => e.exit_code(),
        }
    }

    /// Tell the user how the run ended
    pub fn report(&self) {
        match self {
            Outcome::Installed(platform) => {
                println!("service installed and managed by: {}", platform)
            }
            Outcome::Uninstalled => println!("service uninstalled successfully"),
            Outcome::AlreadyInstalled => println!("service already installed"),
            Outcome::NotInstalled => println!("service is not installed"),
            Outcome::Relaunched => {}
            Outcome::NoServiceSystem => eprintln!("no service manager available"),
            Outcome::ConnectFailed(e) => eprintln!("Failed to reach the service manager: {}", e),
            Outcome::InstallFailed(e) => eprintln!("Failed to install service: {}", e),
            Outcome::UninstallFailed(e) => eprintln!("Failed to uninstall service: {}", e),
            Outcome::ElevationFailed(e) => eprintln!("{}", e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where the orchestration currently stands
enum State {
    Uninstall,
    CheckInstalledForInstall,
    Install,
    AlreadyInstalled,
    NotInstalled,
}

/// Anything but an explicit not installed answer counts as installed
fn is_installed<S: ServiceControl>(service: &S) -> bool {
    match service.status() {
        Err(service::Error::NotInstalled) => false,
        Err(e) => {
            log::debug!("status query failed, assuming installed: {}", e);
            true
        }
        Ok(status) => {
            log::debug!("service status: {:?}", status);
            true
        }
    }
}

/// Install or uninstall the configured service
pub fn orchestrate<C: ServiceConnector>(config: InstallerConfig, connector: &C) -> Outcome {
    let service = match connector.connect(&config.descriptor) {
        Ok(s) => s,
        Err(service::Error::NoServiceSystemDetected) => return Outcome::NoServiceSystem,
        Err(e) => return Outcome::ConnectFailed(e),
    };

    let mut state = match config.action {
        Action::Uninstall => State::Uninstall,
        Action::Install => State::CheckInstalledForInstall,
    };
    loop {
        log::debug!("{}: {:?}", config.descriptor.name, state);
        state = match state {
            State::Uninstall => {
                if !is_installed(&service) {
                    State::NotInstalled
                } else {
                    return match service.uninstall() {
                        Ok(()) => Outcome::Uninstalled,
                        Err(e) => Outcome::UninstallFailed(e),
                    };
                }
            }
            State::CheckInstalledForInstall => {
                if is_installed(&service) {
                    State::AlreadyInstalled
                } else {
                    State::Install
                }
            }
            State::Install => {
                return match service.install() {
                    Ok(()) => Outcome::Installed(service.platform()),
                    Err(e) => Outcome::InstallFailed(e),
                };
            }
            State::AlreadyInstalled => return Outcome::AlreadyInstalled,
            State::NotInstalled => return Outcome::NotInstalled,
        }
    }
}
