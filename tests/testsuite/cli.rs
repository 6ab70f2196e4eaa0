#[test]
fn version() {
    snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
        .arg("--version")
        .assert()
        .success()
        .stdout_eq("git-restack 0.1.0\n");
}

#[test]
fn missing_subcommand_is_usage_error() {
    snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
        .assert()
        .code(64);
}

#[test]
fn edit_requires_file() {
    snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
        .arg("edit")
        .assert()
        .code(64);
}

#[test]
fn no_push_conflicts_with_remote() {
    snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
        .args(["edit", "--no-push", "--remote", "origin", "git-rebase-todo"])
        .assert()
        .code(64);
}
