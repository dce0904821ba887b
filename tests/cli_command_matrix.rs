use assert_cmd::Command;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = Command::cargo_bin("compa").expect("compa binary");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);

    for command in [
        "status", "stage", "staged", "unstage", "audit", "results", "stats", "report", "theme",
    ] {
        run_help(&home, &[command]);
    }
}
