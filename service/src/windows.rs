//! The windows specific code for service registration

use std::os::windows::ffi::OsStrExt;

use winapi::shared::minwindef::DWORD;
use winapi::shared::winerror::ERROR_SERVICE_DOES_NOT_EXIST;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::winsvc::CloseServiceHandle;
use winapi::um::winsvc::OpenSCManagerW;
use winapi::um::winsvc::OpenServiceW;
use winapi::um::winsvc::QueryServiceStatus;
use winapi::um::winsvc::SC_HANDLE;

use crate::{Error, ServiceConfig, Status};

/// Converts a utf8 string into a utf-16 string for windows
pub fn get_utf16(value: &str) -> Vec<u16> {
    std::ffi::OsStr::new(value)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Pointer to an optional utf-16 string, null when absent. The buffer must outlive the pointer.
fn optional_ptr(value: &Option<Vec<u16>>) -> winapi::um::winnt::LPCWSTR {
    match value {
        Some(s) => s.as_ptr(),
        None => std::ptr::null(),
    }
}

/// Represents a service control handle
pub struct ServiceHandle {
    /// The actual handle
    handle: SC_HANDLE,
}

impl ServiceHandle {
    /// Retrieve the handle, use ServiceController::open_service to get a ServiceHandle
    pub fn get_handle(&self) -> SC_HANDLE {
        self.handle
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { CloseServiceHandle(self.handle) };
        }
    }
}

/// Represents a service controller manager
pub struct ServiceController {
    /// The actual handle
    handle: SC_HANDLE,
}

impl Drop for ServiceController {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { CloseServiceHandle(self.handle) };
        }
    }
}

impl ServiceController {
    /// Retrieve the handle
    pub fn get_handle(&self) -> SC_HANDLE {
        self.handle
    }

    /// Request access to the service controller manager using the specified access level. [winapi::um::winsvc::SC_MANAGER_ALL_ACCESS](winapi::um::winsvc::SC_MANAGER_ALL_ACCESS) enumerates all possibilites for access levels.
    pub fn open(access: DWORD) -> Result<Self, DWORD> {
        let handle = unsafe { OpenSCManagerW(std::ptr::null_mut(), std::ptr::null_mut(), access) };
        if handle.is_null() {
            Err(unsafe { GetLastError() })
        } else {
            Ok(Self { handle })
        }
    }

    /// Request access to the specified service, with the specified access permissions.
    pub fn open_service(&self, name: &str, access: DWORD) -> Result<ServiceHandle, DWORD> {
        let handle = unsafe { OpenServiceW(self.handle, get_utf16(name).as_ptr(), access) };
        if handle.is_null() {
            Err(unsafe { GetLastError() })
        } else {
            Ok(ServiceHandle { handle })
        }
    }
}

/// Represents a service on the system
pub struct Service {
    /// How the service is registered
    config: ServiceConfig,
}

impl Service {
    /// Construct a new self. The service control manager is always present on windows.
    pub fn new(config: ServiceConfig) -> Result<Self, Error> {
        Ok(Self { config })
    }

    /// The name of the mechanism managing the service
    pub fn platform(&self) -> &'static str {
        "windows-service"
    }

    /// Query the state of the service
    pub fn status(&self) -> Result<Status, Error> {
        let service_manager =
            ServiceController::open(winapi::um::winsvc::SC_MANAGER_CONNECT).map_err(Error::Os)?;
        let service = service_manager
            .open_service(&self.config.name, winapi::um::winsvc::SERVICE_QUERY_STATUS)
            .map_err(|e| {
                if e == ERROR_SERVICE_DOES_NOT_EXIST {
                    Error::NotInstalled
                } else {
                    Error::Os(e)
                }
            })?;
        let mut service_status: winapi::um::winsvc::SERVICE_STATUS =
            winapi::um::winsvc::SERVICE_STATUS {
                dwServiceType: winapi::um::winnt::SERVICE_WIN32_OWN_PROCESS,
                dwCurrentState: winapi::um::winsvc::SERVICE_STOPPED,
                dwControlsAccepted: 0,
                dwWin32ExitCode: 0,
                dwServiceSpecificExitCode: 0,
                dwCheckPoint: 0,
                dwWaitHint: 0,
            };
        if unsafe { QueryServiceStatus(service.get_handle(), &mut service_status) } == 0 {
            return Err(Error::Os(unsafe { GetLastError() }));
        }
        log::debug!(
            "service {} is in state {}",
            self.config.name,
            service_status.dwCurrentState
        );
        Ok(match service_status.dwCurrentState {
            winapi::um::winsvc::SERVICE_RUNNING => Status::Running,
            winapi::um::winsvc::SERVICE_STOPPED => Status::Stopped,
            _ => Status::Unknown,
        })
    }

    /// Delete the service
    pub fn uninstall(&self) -> Result<(), Error> {
        let service_manager =
            ServiceController::open(winapi::um::winsvc::SC_MANAGER_CONNECT).map_err(Error::Os)?;
        let service = service_manager
            .open_service(&self.config.name, winapi::um::winnt::DELETE)
            .map_err(|e| {
                if e == ERROR_SERVICE_DOES_NOT_EXIST {
                    Error::NotInstalled
                } else {
                    Error::Os(e)
                }
            })?;
        if unsafe { winapi::um::winsvc::DeleteService(service.get_handle()) } == 0 {
            return Err(Error::Os(unsafe { GetLastError() }));
        }
        log::info!("Deleted service {}", self.config.name);
        Ok(())
    }

    /// Create the service
    pub fn install(&self) -> Result<(), Error> {
        let service_manager =
            ServiceController::open(winapi::um::winsvc::SC_MANAGER_ALL_ACCESS).map_err(Error::Os)?;
        let name = get_utf16(&self.config.name);
        let display = get_utf16(&self.config.display);
        let command_line = get_utf16(&self.config.command_line());
        let username = self.config.username.as_deref().map(get_utf16);
        let service = unsafe {
            winapi::um::winsvc::CreateServiceW(
                service_manager.get_handle(),
                name.as_ptr(),
                display.as_ptr(),
                winapi::um::winsvc::SERVICE_ALL_ACCESS,
                winapi::um::winnt::SERVICE_WIN32_OWN_PROCESS,
                winapi::um::winnt::SERVICE_AUTO_START,
                winapi::um::winnt::SERVICE_ERROR_NORMAL,
                command_line.as_ptr(),
                std::ptr::null(),
                std::ptr::null_mut(),
                std::ptr::null(),
                optional_ptr(&username),
                std::ptr::null(),
            )
        };
        if service.is_null() {
            let e = unsafe { GetLastError() };
            return Err(if e == winapi::shared::winerror::ERROR_SERVICE_EXISTS {
                Error::AlreadyInstalled
            } else {
                Error::Os(e)
            });
        }
        let service = ServiceHandle { handle: service };
        let mut description = get_utf16(&self.config.description);

        let mut sd = winapi::um::winsvc::SERVICE_DESCRIPTIONW {
            lpDescription: description.as_mut_ptr(),
        };

        let p_sd = &mut sd as *mut _ as *mut winapi::ctypes::c_void;
        if unsafe {
            winapi::um::winsvc::ChangeServiceConfig2W(
                service.get_handle(),
                winapi::um::winsvc::SERVICE_CONFIG_DESCRIPTION,
                p_sd,
            )
        } == 0
        {
            log::warn!(
                "Unable to set the description of {}: error {}",
                self.config.name,
                unsafe { GetLastError() }
            );
        }
        log::info!("Created service {}", self.config.name);
        Ok(())
    }
}
