use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn walkthrough_logs_and_renders() {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Inserted document with id: unique-id-1",
        ))
        .stdout(predicate::str::contains(
            "Deleted document with id: unique-id-3",
        ))
        .stdout(predicate::str::contains("Not found: unique-id-3"))
        .stdout(predicate::str::contains(
            "db.all_docs() returned the following:",
        ))
        .stdout(predicate::str::contains("Query Result"))
        .stdout(predicate::str::contains("My first todo item"));
}

#[test]
fn no_display_reports_missing_surface() {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.arg("--no-display")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Display surface \"api-response\" not found",
        ))
        .stdout(predicate::str::contains("Query Result").not());
}

#[test]
fn field_query_with_key_filter() {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.args(["--by", "completed", "--key", "true", "--include-docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Query Result"))
        .stdout(predicate::str::contains("unique-id-2"))
        .stdout(predicate::str::contains("unique-id-4"));
}

#[test]
fn prefix_and_limit_narrow_the_title_index() {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.args(["--by", "title", "--prefix", "My", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My first todo item"))
        // Field-index rows are the only `"value": null` lines; limit 1 keeps one.
        .stdout(predicate::function(|out: &str| {
            out.matches("\"value\": null").count() == 1
        }));
}
