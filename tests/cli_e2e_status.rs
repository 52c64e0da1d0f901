//! End-to-end tests for the `status` and `diff` commands.
//!
//! Each test installs a clone of a local remote and then changes the working
//! copy: `added.txt` is staged, `modified-fs.txt` is modified without
//! staging, and `added-fs.txt` is left untracked.

mod common;
use common::prelude::*;

use std::fs;

fn fixture_with_changes() -> TestFixture {
    let fixture = TestFixture::new()
        .with_remote("remote")
        .with_manifest(
            r#"
- other: {local-name: ../ros}
- git: {local-name: clone, uri: ../remote}
"#,
        );
    fixture.command().arg("install").assert().success();

    let clone = fixture.ws_path("clone");
    fs::write(clone.join("added.txt"), "staged\n").unwrap();
    git(&clone, &["add", "added.txt"]);
    fs::write(clone.join("modified-fs.txt"), "changed\n").unwrap();
    fs::write(clone.join("added-fs.txt"), "untracked\n").unwrap();
    fixture
}

/// Test that status lists changes relative to the workspace root
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_lists_changes() {
    let fixture = fixture_with_changes();

    fixture
        .command()
        .arg("status")
        .assert()
        .success()
        .stdout("A       clone/added.txt\n M      clone/modified-fs.txt\n");
}

/// Test that untracked files are only listed on request
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_untracked() {
    let fixture = fixture_with_changes();

    fixture
        .command()
        .args(["status", "--untracked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("??      clone/added-fs.txt\n"))
        .stdout(predicate::str::contains("A       clone/added.txt\n"));
}

/// Test that a clean workspace has an empty status
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_clean_workspace() {
    let fixture = TestFixture::new()
        .with_remote("remote")
        .with_manifest(manifests::CLONE);
    fixture.command().arg("install").assert().success();

    fixture.command().arg("status").assert().success().stdout("");
}

/// Test that a missing clone contributes nothing
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_before_install() {
    let fixture = TestFixture::new()
        .with_remote("remote")
        .with_manifest(manifests::CLONE);

    fixture.command().arg("status").assert().success().stdout("");
}

/// Test that diff shows staged and unstaged changes with workspace paths
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_diff_shows_changes() {
    let fixture = fixture_with_changes();

    fixture
        .command()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("--- clone/modified-fs.txt"))
        .stdout(predicate::str::contains("+++ clone/modified-fs.txt"))
        .stdout(predicate::str::contains("-original"))
        .stdout(predicate::str::contains("+changed"))
        .stdout(predicate::str::contains("+++ clone/added.txt"))
        .stdout(predicate::str::contains("added-fs.txt").not());
}

/// Test that diff concatenates several checkouts in manifest order
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_diff_keeps_manifest_order() {
    let fixture = TestFixture::new()
        .with_remote("remote")
        .with_manifest(manifests::TWO_CLONES);
    fixture.command().arg("install").assert().success();

    fs::write(fixture.ws_path("second/README.md"), "second\n").unwrap();
    fs::write(fixture.ws_path("clone/README.md"), "first\n").unwrap();

    let output = fixture.command().arg("diff").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let first = stdout.find("+++ clone/README.md").unwrap();
    let second = stdout.find("+++ second/README.md").unwrap();
    assert!(first < second);
}
