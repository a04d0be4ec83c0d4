//! Process exit statuses

/// The requested change was made, or there was nothing to do
pub const SUCCESS: u8 = 0;
/// Installing or uninstalling the service failed
pub const FAILURE: u8 = 1;
/// The command line was invalid or incomplete
pub const USAGE: u8 = 2;
/// No service manager is available on this system
pub const NO_SERVICE_SYSTEM: u8 = 60;
/// Relaunching with elevated privileges was canceled or failed
pub const ELEVATION_FAILED: u8 = 61;
