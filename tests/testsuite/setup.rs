// Not correctly overriding on Windows
#![cfg(target_os = "linux")]

use snapbox::prelude::*;

#[test]
fn print_edit_script() {
    snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
        .args(["setup", "--print-edit-script"])
        .assert()
        .success()
        .stdout_eq(git_restack::setup::EDIT_SCRIPT.raw())
        .stderr_eq("");
}

#[test]
fn install_into_home() {
    let root = snapbox::dir::DirRoot::mutable_temp().unwrap();
    let root_path = root.path().unwrap();

    let home_root = root_path.join("home");
    std::fs::create_dir_all(&home_root).unwrap();

    snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
        .arg("setup")
        .current_dir(root_path)
        .env("HOME", &home_root)
        .env("XDG_CONFIG_HOME", home_root.join(".config"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .assert()
        .success()
        .stderr_eq(
            "\
Registered: sequence.editor=[..]/home/.restack/edit.sh
git-restack has been set up successfully.
",
        );

    let script = home_root.join(".restack/edit.sh");
    assert_eq!(
        std::fs::read_to_string(&script).unwrap(),
        git_restack::setup::EDIT_SCRIPT
    );
    {
        use std::os::unix::fs::PermissionsExt as _;
        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    let config = git2::Config::open(&home_root.join(".gitconfig")).unwrap();
    assert_eq!(
        config.get_string("sequence.editor").unwrap(),
        script.to_str().unwrap()
    );

    root.close().unwrap();
}

#[test]
fn install_keeps_existing_config() {
    let root = snapbox::dir::DirRoot::mutable_temp().unwrap();
    let root_path = root.path().unwrap();

    let home_root = root_path.join("home");
    std::fs::create_dir_all(&home_root).unwrap();
    std::fs::write(
        home_root.join(".gitconfig"),
        "
[user]
  name = Someone
[sequence]
  editor = vim
",
    )
    .unwrap();

    snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
        .arg("setup")
        .current_dir(root_path)
        .env("HOME", &home_root)
        .env("XDG_CONFIG_HOME", home_root.join(".config"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .assert()
        .success();

    let config = git2::Config::open(&home_root.join(".gitconfig")).unwrap();
    assert_eq!(config.get_string("user.name").unwrap(), "Someone");
    assert_eq!(
        config.get_string("sequence.editor").unwrap(),
        home_root.join(".restack/edit.sh").to_str().unwrap()
    );

    root.close().unwrap();
}
