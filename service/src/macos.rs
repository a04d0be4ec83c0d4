//! macOS specific code for managing a service through launchd

use std::path::PathBuf;

use crate::{Error, ServiceConfig, Status};

/// Escape a value for use inside a plist string element
fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Represents a service on the system
pub struct Service {
    /// How the service is registered
    config: ServiceConfig,
}

impl Service {
    /// Construct a new self. launchd is always present on macOS.
    pub fn new(config: ServiceConfig) -> Result<Self, Error> {
        Ok(Self { config })
    }

    /// The launchd path for system daemons
    pub fn launchd_path() -> PathBuf {
        PathBuf::from("/Library/LaunchDaemons")
    }

    /// The name of the mechanism managing the service
    pub fn platform(&self) -> &'static str {
        "darwin-launchd"
    }

    fn plist_path(&self) -> PathBuf {
        Self::launchd_path().join(format!("{}.plist", self.config.name))
    }

    /// Does the service already exist?
    pub fn exists(&self) -> bool {
        self.plist_path().exists()
    }

    /// Query the state of the service
    pub fn status(&self) -> Result<Status, Error> {
        if !self.exists() {
            return Err(Error::NotInstalled);
        }
        let o = std::process::Command::new("launchctl")
            .arg("list")
            .arg(&self.config.name)
            .output()
            .map_err(|e| Error::CommandUnavailable("launchctl", e))?;
        if !o.status.success() {
            return Ok(Status::Unknown);
        }
        let listing = String::from_utf8_lossy(&o.stdout);
        if listing.contains("\"PID\"") {
            Ok(Status::Running)
        } else {
            Ok(Status::Stopped)
        }
    }

    /// Construct the launchd property list with the specified config
    fn build_plist(config: &ServiceConfig) -> String {
        let mut con = String::new();
        con.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        con.push_str("<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n");
        con.push_str("<plist version=\"1.0\">\n<dict>\n");
        con.push_str(&format!(
            "  <key>Label</key>\n  <string>{}</string>\n",
            xml_escape(&config.name)
        ));
        con.push_str("  <key>ProgramArguments</key>\n  <array>\n");
        con.push_str(&format!(
            "    <string>{}</string>\n",
            xml_escape(&config.binary.display().to_string())
        ));
        for arg in &config.arguments {
            con.push_str(&format!("    <string>{}</string>\n", xml_escape(arg)));
        }
        con.push_str("  </array>\n");
        if let Some(user) = &config.username {
            con.push_str(&format!(
                "  <key>UserName</key>\n  <string>{}</string>\n",
                xml_escape(user)
            ));
        }
        con.push_str("  <key>RunAtLoad</key>\n  <true/>\n");
        con.push_str("  <key>KeepAlive</key>\n  <true/>\n");
        con.push_str("</dict>\n</plist>\n");
        con
    }

    /// Write the property list for the service
    pub fn install(&self) -> Result<(), Error> {
        let pb = self.plist_path();
        if pb.exists() {
            return Err(Error::AlreadyInstalled);
        }
        log::info!("Saving service file as {}", pb.display());
        std::fs::write(pb, Self::build_plist(&self.config))?;
        Ok(())
    }

    /// Unload the service and delete its property list
    pub fn uninstall(&self) -> Result<(), Error> {
        let pb = self.plist_path();
        // unloading a daemon that was never loaded fails, which is fine here
        match std::process::Command::new("launchctl")
            .arg("unload")
            .arg(&pb)
            .output()
        {
            Ok(o) if !o.status.success() => log::debug!(
                "launchctl unload {}: {}",
                pb.display(),
                String::from_utf8_lossy(&o.stderr).trim()
            ),
            Ok(_) => {}
            Err(e) => return Err(Error::CommandUnavailable("launchctl", e)),
        }
        log::info!("Deleting {}", pb.display());
        std::fs::remove_file(pb)?;
        Ok(())
    }
}
