//! Fallback for targets without a supported service manager

use crate::{Error, ServiceConfig, Status};

/// Represents a service on the system
pub struct Service {
    _config: ServiceConfig,
}

impl Service {
    /// Always fails, there is nothing to register the service with
    pub fn new(_config: ServiceConfig) -> Result<Self, Error> {
        Err(Error::NoServiceSystemDetected)
    }

    /// The name of the mechanism managing the service
    pub fn platform(&self) -> &'static str {
        "unsupported"
    }

    /// Query the state of the service
    pub fn status(&self) -> Result<Status, Error> {
        Err(Error::NoServiceSystemDetected)
    }

    /// Register the service
    pub fn install(&self) -> Result<(), Error> {
        Err(Error::NoServiceSystemDetected)
    }

    /// Remove the service
    pub fn uninstall(&self) -> Result<(), Error> {
        Err(Error::NoServiceSystemDetected)
    }
}
