// ABOUTME: Integration tests for the kinopy CLI binary.
// ABOUTME: Tests page toggling from a file, the greeting prompt, and offline builds from the cache.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Showings</title></head>
<body>
<div class="cinema-root the-brattle"><ul><li><a href="/a"><i>Dune</i></a></li></ul></div>
<div class="cinema-root regent-theatre"><ul><li><a href="/b"><i>Alien</i></a></li></ul></div>
</body>
</html>"#;

fn kinopy_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kinopy").unwrap();
    cmd.env_remove("KINOPY_LOG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn toggle_group_writes_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let page = temp_dir.path().join("cal.html");
    fs::write(&page, PAGE).unwrap();

    kinopy_cmd()
        .arg("toggle")
        .arg(&page)
        .arg("--group")
        .arg("the-brattle")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"class="cinema-root the-brattle hidden""#,
        ))
        .stdout(predicate::str::contains(r#"class="cinema-root regent-theatre""#));
}

#[test]
fn toggle_title_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let page = temp_dir.path().join("cal.html");
    let out = temp_dir.path().join("filtered.html");
    fs::write(&page, PAGE).unwrap();

    kinopy_cmd()
        .arg("toggle")
        .arg(&page)
        .arg("--title")
        .arg("Alien")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains(r#"<li class="hidden"><a href="/b"><i>Alien</i></a></li>"#));
    assert!(html.contains(r#"<li><a href="/a"><i>Dune</i></a></li>"#));
}

#[test]
fn toggle_missing_page_fails() {
    let temp_dir = TempDir::new().unwrap();

    kinopy_cmd()
        .arg("toggle")
        .arg(temp_dir.path().join("nope.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn hi_prints_greeting_and_waits_for_enter() {
    kinopy_cmd()
        .arg("hi")
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hi!\n"));
}

#[test]
fn offline_build_without_cache_writes_empty_calendar() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("kinopy.toml");
    fs::write(
        &config,
        format!(
            "[kinopy]\ncache_dir = {:?}\n",
            temp_dir.path().join("cache").display().to_string()
        ),
    )
    .unwrap();
    let out = temp_dir.path().join("cal.html");

    kinopy_cmd()
        .current_dir(temp_dir.path())
        .arg("build")
        .arg("--offline")
        .arg("--start")
        .arg("2024-03-04")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("<h3>Mar 4 - Mar 10</h3>"));
    assert!(temp_dir.path().join("cal.js").exists());
    assert!(temp_dir.path().join("cal.css").exists());
}

#[test]
fn days_flag_sets_calendar_columns() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("kinopy.toml");
    fs::write(&config, "[kinopy]\ncache_dir = \"cache\"\n").unwrap();
    let out = temp_dir.path().join("cal.html");

    kinopy_cmd()
        .current_dir(temp_dir.path())
        .arg("build")
        .arg("--offline")
        .arg("--start")
        .arg("2024-02-27")
        .arg("--days")
        .arg("3")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("<h3>Feb 27 - Feb 29</h3>"));
    assert_eq!(html.matches("<td class=").count(), 3);
}
