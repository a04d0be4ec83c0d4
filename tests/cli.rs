use std::process::{Command, Output};

fn installer(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_service-installer"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run service-installer")
}

#[test]
fn install_without_flags_is_a_usage_error() {
    let out = installer(&[]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("missing required flags"));
    assert!(stderr.contains("--exec <PATH>"));
}

#[test]
fn each_install_flag_is_required() {
    let full = [
        ("-name", "backup"),
        ("-description", "Nightly backups"),
        ("-exec", "/usr/local/bin/backup"),
        ("-user", "root"),
    ];
    for skip in 0..full.len() {
        let mut args = Vec::new();
        for (i, (flag, value)) in full.iter().enumerate() {
            if i != skip {
                args.push(*flag);
                args.push(*value);
            }
        }
        let out = installer(&args);
        assert_eq!(out.status.code(), Some(2), "without {}", full[skip].0);
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(!stdout.contains("Elevating privileges"));
    }
}

#[test]
fn uninstall_without_name_is_a_usage_error() {
    let out = installer(&["-uninstall"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("service name required for uninstallation"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let out = installer(&["-name", "backup", "-uninstall", "-force"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn help_prints_description_then_validates() {
    let out = installer(&["-help"]);
    assert_eq!(out.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("For uninstallation, only -name and -uninstall flags are required."));
}
