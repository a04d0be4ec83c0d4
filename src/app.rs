//! One run of the installer: elevate if needed, then act on the service

use crate::config::InstallerConfig;
use crate::orchestrator::{orchestrate, Outcome, ServiceConnector};
use crate::privilege::PrivilegeProbe;

/// Relaunch elevated when the process lacks administrative rights, otherwise
/// install or uninstall the service. `args` are the original arguments,
/// without the program name, forwarded to the elevated copy.
pub fn run<P, C>(config: InstallerConfig, probe: &P, connector: &C, args: &[String]) -> Outcome
where
    P: PrivilegeProbe,
    C: ServiceConnector,
{
    if !probe.is_elevated() {
        log::info!("not elevated, relaunching");
        return match probe.elevate(args) {
            Ok(()) => Outcome::Relaunched,
            Err(e) => Outcome::ElevationFailed(e),
        };
    }
    orchestrate(config, connector)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::orchestrator::tests::{install_config, uninstall_config, Fake, FakeConnector};
    use crate::privilege::ElevateError;

    struct FakeProbe {
        elevated: bool,
        elevation_works: bool,
        elevations: Cell<usize>,
        forwarded: RefCell<Vec<String>>,
    }

    impl FakeProbe {
        fn new(elevated: bool, elevation_works: bool) -> Self {
            Self {
                elevated,
                elevation_works,
                elevations: Cell::new(0),
                forwarded: RefCell::new(Vec::new()),
            }
        }
    }

    impl PrivilegeProbe for FakeProbe {
        fn is_elevated(&self) -> bool {
            self.elevated
        }

        fn elevate(&self, args: &[String]) -> Result<(), ElevateError> {
            self.elevations.set(self.elevations.get() + 1);
            *self.forwarded.borrow_mut() = args.to_vec();
            if self.elevation_works {
                Ok(())
            } else {
                Err(ElevateError::Spawn(std::io::Error::from(
                    std::io::ErrorKind::PermissionDenied,
                )))
            }
        }
    }

    fn args() -> Vec<String> {
        ["-name", "backup", "-uninstall"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn unelevated_run_relaunches_once() {
        let probe = FakeProbe::new(false, true);
        let connector = FakeConnector::new(Fake::NotInstalled);
        let outcome = run(uninstall_config(), &probe, &connector, &args());
        assert!(matches!(outcome, Outcome::Relaunched));
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(probe.elevations.get(), 1);
        assert_eq!(*probe.forwarded.borrow(), args());
        assert_eq!(connector.calls.connects.get(), 0);
    }

    #[test]
    fn failed_elevation_exits_sixty_one() {
        let probe = FakeProbe::new(false, false);
        let connector = FakeConnector::new(Fake::NotInstalled);
        let outcome = run(install_config(), &probe, &connector, &args());
        assert!(matches!(outcome, Outcome::ElevationFailed(_)));
        assert_eq!(outcome.exit_code(), 61);
        assert_eq!(connector.calls.connects.get(), 0);
    }

    #[test]
    fn elevated_run_goes_straight_to_the_service() {
        let probe = FakeProbe::new(true, true);
        let connector = FakeConnector::new(Fake::NotInstalled);
        let outcome = run(install_config(), &probe, &connector, &args());
        assert!(matches!(outcome, Outcome::Installed(_)));
        assert_eq!(probe.elevations.get(), 0);
        assert_eq!(connector.calls.installs.get(), 1);
    }

    #[test]
    fn no_service_system_wins_over_flags() {
        let probe = FakeProbe::new(true, true);
        let connector = FakeConnector::new(Fake::NoServiceSystem);
        let outcome = run(uninstall_config(), &probe, &connector, &args());
        assert_eq!(outcome.exit_code(), 60);
    }
}
