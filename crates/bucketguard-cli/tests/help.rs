use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a Command for the bucketguard binary.
#[allow(deprecated)]
fn bucketguard_cmd() -> Command {
    Command::cargo_bin("bucketguard").unwrap()
}

#[test]
fn help_works() {
    bucketguard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("explain"));
}

#[test]
fn audit_help_lists_overrides() {
    bucketguard_cmd()
        .args(["audit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--inventory"))
        .stdout(predicate::str::contains("--notification-target"))
        .stdout(predicate::str::contains("--record-store"));
}

#[test]
fn audit_requires_inventory() {
    bucketguard_cmd()
        .arg("audit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--inventory"));
}

#[test]
fn explain_known_code() {
    bucketguard_cmd()
        .args(["explain", "acl_all_users"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"));
}

#[test]
fn explain_unknown_identifier_fails() {
    bucketguard_cmd()
        .args(["explain", "no_such_code"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exposure.acl"));
}
