use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;
use predicates::str::contains;

fn script(home: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("snapbooks_cli")
        .unwrap()
        .env("SNAPBOOKS_CLI_SCRIPT", "1")
        .env("SNAPBOOKS_HOME", home.path())
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_records_and_reports() {
    let home = TempDir::new().unwrap();
    let input = "\
session add client=Ana date=2025-05-05 price=150 photographer=Mara
session status 1 delivered
print add client=Ana charged=50 cost=20 date=2025-05-05
metrics 2025-05-07
exit
";
    script(&home, input)
        .success()
        .stdout(contains("Created new books `studio`"))
        .stdout(contains("Session #1 added."))
        .stdout(contains("Print #1 charged."))
        .stdout(contains("Metrics as of 2025-05-07"))
        .stdout(contains("$200.00"));

    let books = home.child("books").child("studio.json");
    books.assert(predicate::path::exists());
    books.assert(predicate::str::contains("\"Ana\""));
    home.child("config")
        .child("config.json")
        .assert(predicate::str::contains("\"last_opened_books\": \"studio\""));
}

#[test]
fn errors_are_reported_without_stopping_the_script() {
    let home = TempDir::new().unwrap();
    let input = "\
sesion list
debt add amount=10
debt add person=Rosa amount=40 reason=\"camera rental\" date=2025-05-02
debt list
";
    script(&home, input)
        .success()
        .stdout(contains("Did you mean `session`?"))
        .stdout(contains("missing required field `person=`"))
        .stdout(contains("usage: debt add"))
        .stdout(contains("camera rental"));
}

#[test]
fn books_survive_between_runs() {
    let home = TempDir::new().unwrap();
    script(&home, "worker add name=Mara pay=session rate=25\nbooks open north\n").success();
    script(&home, "worker list\n")
        .success()
        .stdout(contains("Opened books `north`"))
        .stdout(contains("No workers recorded yet."));
    script(&home, "books open studio\nworker list\n")
        .success()
        .stdout(contains("Mara"))
        .stdout(contains("Per session"));
}

#[test]
fn version_lists_build_details() {
    let home = TempDir::new().unwrap();
    script(&home, "version\n")
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")))
        .stdout(contains("Schema"));
}
