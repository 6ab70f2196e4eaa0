// Not correctly overriding on Windows
#![cfg(target_os = "linux")]

struct Fixture {
    root: snapbox::dir::DirRoot,
    home: std::path::PathBuf,
    repo: std::path::PathBuf,
    todo: std::path::PathBuf,
    /// Abbreviated ids of the `one`, `two`, `three` commits
    ids: [String; 3],
}

/// A repo with `main` rebasing onto its root, `feature/1` and `feature/2` stacked below it.
fn fixture() -> Fixture {
    let root = snapbox::dir::DirRoot::mutable_temp().unwrap();
    let root_path = root.path().unwrap().to_owned();

    let home = root_path.join("home");
    std::fs::create_dir_all(&home).unwrap();

    let repo_path = root_path.join("repo");
    let repo = git2::Repository::init(&repo_path).unwrap();
    let sig = git2::Signature::now("Test", "test@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let mut parents = Vec::new();
    let mut oids = Vec::new();
    for message in ["one", "two", "three"] {
        let parent_refs: Vec<_> = parents.iter().collect();
        let oid = repo
            .commit(
                Some("refs/heads/main"),
                &sig,
                &sig,
                message,
                &tree,
                &parent_refs,
            )
            .unwrap();
        parents = vec![repo.find_commit(oid).unwrap()];
        oids.push(oid);
    }
    repo.set_head("refs/heads/main").unwrap();
    repo.branch("feature/1", &repo.find_commit(oids[0]).unwrap(), false)
        .unwrap();
    repo.branch("feature/2", &repo.find_commit(oids[1]).unwrap(), false)
        .unwrap();

    let rebase_dir = repo.path().join("rebase-merge");
    std::fs::create_dir_all(&rebase_dir).unwrap();
    std::fs::write(rebase_dir.join("head-name"), "refs/heads/main\n").unwrap();

    let ids: Vec<String> = oids.iter().map(|oid| short_id(&repo_path, *oid)).collect();
    let todo = rebase_dir.join("git-rebase-todo");
    std::fs::write(
        &todo,
        format!(
            "pick {} one\npick {} two\npick {} three\n\n# Rebase instructions\n",
            ids[0], ids[1], ids[2]
        ),
    )
    .unwrap();

    Fixture {
        root,
        home,
        repo: repo_path,
        todo,
        ids: ids.try_into().unwrap(),
    }
}

fn short_id(repo: &std::path::Path, oid: git2::Oid) -> String {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--short"])
        .arg(oid.to_string())
        .current_dir(repo)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_owned()
}

impl Fixture {
    fn command(&self) -> snapbox::cmd::Command {
        snapbox::cmd::Command::new(snapbox::cmd::cargo_bin!("git-restack"))
            .current_dir(&self.repo)
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env_remove("GIT_EDITOR")
    }

    fn todo(&self) -> String {
        std::fs::read_to_string(&self.todo).unwrap()
    }

    fn close(self) {
        self.root.close().unwrap();
    }
}

#[test]
fn restack_with_push_section() {
    let fixture = fixture();
    let [one, two, three] = &fixture.ids;

    fixture
        .command()
        .args(["edit", "--editor", "true"])
        .arg(&fixture.todo)
        .assert()
        .success()
        .stdout_eq("");

    assert_eq!(
        fixture.todo(),
        format!(
            "\
pick {one} one
exec git branch -f feature/1

pick {two} two
exec git branch -f feature/2

pick {three} three

# Uncomment this section to push the changes.
# exec git push -f origin feature/1
# exec git push -f origin feature/2

# Rebase instructions
"
        )
    );

    fixture.close();
}

#[test]
fn no_push() {
    let fixture = fixture();
    let [one, two, three] = &fixture.ids;

    fixture
        .command()
        .args(["edit", "--editor", "true", "--no-push"])
        .arg(&fixture.todo)
        .assert()
        .success();

    assert_eq!(
        fixture.todo(),
        format!(
            "\
pick {one} one
exec git branch -f feature/1

pick {two} two
exec git branch -f feature/2

pick {three} three

# Rebase instructions
"
        )
    );

    fixture.close();
}

#[test]
fn push_remote_from_config() {
    let fixture = fixture();

    let repo = git2::Repository::open(&fixture.repo).unwrap();
    repo.config()
        .unwrap()
        .set_str("restack.pushRemote", "upstream")
        .unwrap();

    fixture
        .command()
        .args(["edit", "--editor", "true"])
        .arg(&fixture.todo)
        .assert()
        .success();

    let todo = fixture.todo();
    assert!(
        todo.contains("# exec git push -f upstream feature/1\n"),
        "{todo}"
    );
    assert!(!todo.contains("origin"), "{todo}");

    fixture.close();
}

#[test]
fn empty_remote_disables_push() {
    let fixture = fixture();

    fixture
        .command()
        .args(["edit", "--editor", "true", "--remote", ""])
        .arg(&fixture.todo)
        .assert()
        .success();

    let todo = fixture.todo();
    assert!(todo.contains("exec git branch -f feature/1\n"), "{todo}");
    assert!(!todo.contains("git push"), "{todo}");

    fixture.close();
}

#[test]
fn editor_from_environment() {
    let fixture = fixture();

    fixture
        .command()
        .arg("edit")
        .arg(&fixture.todo)
        .env("GIT_EDITOR", "printf 'drop x\\n' >")
        .assert()
        .success();

    assert_eq!(fixture.todo(), "drop x\n");

    fixture.close();
}

#[test]
fn failed_editor_keeps_instructions() {
    let fixture = fixture();
    let original = fixture.todo();

    fixture
        .command()
        .args(["edit", "--editor", "false"])
        .arg(&fixture.todo)
        .assert()
        .code(1);

    assert_eq!(fixture.todo(), original);

    fixture.close();
}
