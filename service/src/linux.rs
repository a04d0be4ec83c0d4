//! Linux specific code for managing a service through systemd

use std::path::{Path, PathBuf};

use crate::{Error, ServiceConfig, Status};

/// Present on every system booted with systemd
const SYSTEMD_RUNTIME_DIR: &str = "/run/systemd/system";

/// Represents a service on the system
pub struct Service {
    /// How the service is registered
    config: ServiceConfig,
    /// Where unit files live
    unit_dir: PathBuf,
}

impl Service {
    /// Construct a new self, failing when systemd is not the init system
    pub fn new(config: ServiceConfig) -> Result<Self, Error> {
        if !Path::new(SYSTEMD_RUNTIME_DIR).exists() {
            return Err(Error::NoServiceSystemDetected);
        }
        Ok(Self::with_unit_dir(config, Self::systemd_path()))
    }

    fn with_unit_dir(config: ServiceConfig, unit_dir: PathBuf) -> Self {
        Self { config, unit_dir }
    }

    /// The systemd path for linux
    pub fn systemd_path() -> PathBuf {
        PathBuf::from("/etc/systemd/system")
    }

    /// The name of the mechanism managing the service
    pub fn platform(&self) -> &'static str {
        "linux-systemd"
    }

    fn unit_path(&self) -> PathBuf {
        self.unit_dir.join(format!("{}.service", self.config.name))
    }

    /// Does the service already exist?
    pub fn exists(&self) -> bool {
        self.unit_path().exists()
    }

    /// Query the state of the service
    pub fn status(&self) -> Result<Status, Error> {
        if !self.exists() {
            return Err(Error::NotInstalled);
        }
        // is-active exits non-zero for inactive units, so only stdout matters
        let o = std::process::Command::new("systemctl")
            .arg("is-active")
            .arg(&self.config.name)
            .output()
            .map_err(|e| Error::CommandUnavailable("systemctl", e))?;
        let state = String::from_utf8_lossy(&o.stdout);
        log::debug!("systemctl is-active {}: {}", self.config.name, state.trim());
        Ok(match state.trim() {
            "active" | "reloading" => Status::Running,
            "inactive" | "failed" => Status::Stopped,
            _ => Status::Unknown,
        })
    }

    /// Run a systemctl subcommand, failing on a non-zero exit
    fn systemctl(&self, args: &[&str]) -> Result<(), Error> {
        let o = std::process::Command::new("systemctl")
            .args(args)
            .output()
            .map_err(|e| Error::CommandUnavailable("systemctl", e))?;
        if !o.status.success() {
            Err(Error::CommandFailed {
                command: format!("systemctl {}", args.join(" ")),
                message: String::from_utf8_lossy(&o.stderr).trim().to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Reload system services
    fn reload(&self) -> Result<(), Error> {
        self.systemctl(&["daemon-reload"])
    }

    /// Construct the systemd file with the specified config
    fn build_systemd_file(config: &ServiceConfig) -> String {
        let mut con = String::new();
        con.push_str("[Unit]\n");
        con.push_str(&format!("Description={}\n", config.description));
        con.push_str(&format!(
            "ConditionFileIsExecutable={}\n",
            config.binary.display()
        ));
        con.push_str("\n[Service]\n");
        con.push_str(&format!("ExecStart={}\n", config.command_line()));
        if let Some(user) = &config.username {
            con.push_str(&format!("User={}\n", user));
        }
        con.push_str("Restart=always\n");
        con.push_str("RestartSec=120\n");
        con.push_str("\n[Install]\nWantedBy=multi-user.target\n");
        con
    }

    /// Write the unit file and enable the service
    pub fn install(&self) -> Result<(), Error> {
        let pb = self.unit_path();
        if pb.exists() {
            return Err(Error::AlreadyInstalled);
        }
        let con = Self::build_systemd_file(&self.config);
        log::info!("Saving service file as {}", pb.display());
        std::fs::write(&pb, con)?;
        let enabled = self
            .systemctl(&["enable", &format!("{}.service", self.config.name)])
            .and_then(|()| self.reload());
        if let Err(e) = enabled {
            log::warn!("Removing {} after failed install", pb.display());
            let _ = std::fs::remove_file(&pb);
            return Err(e);
        }
        Ok(())
    }

    /// Disable the service and delete its unit file
    pub fn uninstall(&self) -> Result<(), Error> {
        self.systemctl(&["disable", &format!("{}.service", self.config.name)])?;
        let pb = self.unit_path();
        log::info!("Deleting {}", pb.display());
        std::fs::remove_file(pb)?;
        self.reload()
    }
}
