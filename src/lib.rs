//! Creates or removes a system service that launches a program at startup

pub mod app;
pub mod cli;
pub mod config;
pub mod exit;
pub mod orchestrator;
pub mod privilege;

pub use app::run;
pub use config::{Action, InstallerConfig, ServiceDescriptor, UsageError};
pub use orchestrator::{Outcome, ServiceConnector, ServiceControl, SystemConnector};
pub use privilege::{platform_probe, ElevateError, PrivilegeProbe};
