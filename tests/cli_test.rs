//! Drives the binary through stdin the way a user at the terminal would.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_script(script: &str) -> (String, String) {
    let bin = env!("CARGO_BIN_EXE_kitchen_pool");
    let mut child = Command::new(bin)
        .env("KITCHEN_PROCESSING_MS", "20")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start binary");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(script.as_bytes())
        .expect("write script");

    let output = child.wait_with_output().expect("binary output");
    assert!(
        output.status.success(),
        "binary exited with non-zero status: {:?}",
        output.status
    );
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn orders_are_served_vip_first() {
    let (stdout, _) = run_script("bot+\norder\norder\nvip\nwait 500\nstatus\nquit\n");

    assert!(stdout.contains("added bot 0"));
    assert!(stdout.contains("added order #3 (VIP)"));
    let completed = stdout
        .lines()
        .find(|line| line.starts_with("completed="))
        .expect("completed line missing");
    assert_eq!(completed.trim(), "completed=[1,3,2]");
    assert!(stdout.lines().any(|line| line.trim() == "bot 0: idle"));
}

#[test]
fn removing_from_empty_pool_reports_error_and_continues() {
    let (stdout, stderr) = run_script("bot-\norder\nstatus\njson\n");

    assert!(stderr.contains("error: cannot remove a bot from an empty pool"));
    let pending = stdout
        .lines()
        .find(|line| line.starts_with("pending="))
        .expect("pending line missing");
    assert_eq!(pending.trim(), "pending=[1]");
    assert!(stdout.contains("\"pending\":[{\"id\":1,\"vip\":false}]"));
}

#[test]
fn unknown_command_is_reported() {
    let (_, stderr) = run_script("dance\nquit\n");
    assert!(stderr.contains("unknown command: dance"));
}
