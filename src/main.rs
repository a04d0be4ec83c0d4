use std::process::ExitCode;

use service_installer::cli::{self, Args};
use service_installer::{exit, InstallerConfig, SystemConnector};

fn main() -> ExitCode {
    if let Err(e) = service::init_console_log(service::LogLevel::Warning) {
        eprintln!("Unable to start logging: {}", e);
    }

    let args = Args::parse_normalized();
    if args.help {
        println!("{}", cli::ABOUT);
    }

    let config = match InstallerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            cli::print_usage();
            return ExitCode::from(exit::USAGE);
        }
    };

    let forwarded: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let outcome = service_installer::run(
        config,
        &service_installer::platform_probe(),
        &SystemConnector,
        &forwarded,
    );
    outcome.report();
    ExitCode::from(outcome.exit_code())
}
