// Drives the compiled binary through a PTY.
// Requires a TTY; expectrl allocates a pseudo terminal.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_starts_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("keysprint");
    let cmd = format!("{} -p hi -d 15 --mute", bin.display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("hi")?;
    std::thread::sleep(Duration::from_millis(200));

    // ESC quits from the typing screen
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}

#[test]
fn leaderboard_flag_prints_without_tty() {
    let dir = tempfile::tempdir().unwrap();
    let out = assert_cmd::Command::cargo_bin("keysprint")
        .unwrap()
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .args(["--leaderboard", "-d", "60"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("leaderboard (60s)"));
    assert!(stdout.contains("no results yet"));
}
