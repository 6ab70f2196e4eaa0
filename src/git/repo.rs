use crate::git::{describe, run_with_timeout};

/// Git's rebase state directories, in the order `wt-status.c` checks them.
static REBASE_STATE_DIRS: &[&str] = &["rebase-apply", "rebase-merge"];

static HEADS_PREFIX: &str = "refs/heads/";

pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

pub trait Repo {
    /// Local branches with the abbreviated id of the commit they point at.
    ///
    /// The abbreviation must match the one git uses in `git-rebase-todo`.
    fn local_branches(&self) -> Result<Vec<Branch>, git2::Error>;

    /// Branch currently being rebased, if a rebase is in progress.
    fn rebase_head_name(&self) -> Result<Option<String>, git2::Error>;
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Branch {
    pub name: String,
    /// Abbreviated commit id, as it appears in the instruction list
    pub commit_id: String,
}

impl Branch {
    pub fn new(name: impl Into<String>, commit_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_id: commit_id.into(),
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name.as_str())
    }
}

pub struct GitRepo {
    repo: git2::Repository,
    timeout: std::time::Duration,
}

impl GitRepo {
    pub fn new(repo: git2::Repository) -> Self {
        Self {
            repo,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn set_timeout(&mut self, timeout: std::time::Duration) {
        self.timeout = timeout;
    }

    /// Path to the `.git` directory
    pub fn git_dir(&self) -> &std::path::Path {
        self.repo.path()
    }

    fn cwd(&self) -> &std::path::Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    pub fn local_branches(&self) -> Result<Vec<Branch>, git2::Error> {
        log::trace!("Loading local branches");
        let mut cmd = std::process::Command::new("git");
        cmd.args(["show-ref", "--heads", "--abbrev"])
            .current_dir(self.cwd());
        let output = run_with_timeout(&mut cmd, self.timeout).map_err(|err| {
            git2::Error::new(
                git2::ErrorCode::GenericError,
                git2::ErrorClass::Os,
                err.to_string(),
            )
        })?;

        // `show-ref` reports "nothing matched" with status 1 and no output
        if !output.status.success() && !(output.status.code() == Some(1) && output.stdout.is_empty())
        {
            return Err(git2::Error::new(
                git2::ErrorCode::GenericError,
                git2::ErrorClass::Reference,
                format!(
                    "`{}` failed with {}: {}",
                    describe(&cmd),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim_end()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_show_ref(&stdout))
    }

    pub fn rebase_head_name(&self) -> Result<Option<String>, git2::Error> {
        read_rebase_head_name(self.git_dir())
    }
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("repo", &self.repo.path())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Repo for GitRepo {
    fn local_branches(&self) -> Result<Vec<Branch>, git2::Error> {
        self.local_branches()
    }

    fn rebase_head_name(&self) -> Result<Option<String>, git2::Error> {
        self.rebase_head_name()
    }
}

/// Parse `git show-ref --heads --abbrev` output, skipping anything that isn't a local branch.
pub fn parse_show_ref(output: &str) -> Vec<Branch> {
    output
        .lines()
        .filter_map(|line| {
            let (commit_id, refname) = line.split_once(' ')?;
            let Some(name) = refname.strip_prefix(HEADS_PREFIX) else {
                log::debug!("Ignoring non-branch ref {refname}");
                return None;
            };
            Some(Branch::new(name, commit_id))
        })
        .collect()
}

/// Read the name of the branch being rebased from git's rebase state.
///
/// Mirrors how `git status` finds it: `head-name` under either state directory.
pub fn read_rebase_head_name(git_dir: &std::path::Path) -> Result<Option<String>, git2::Error> {
    for state_dir in REBASE_STATE_DIRS {
        let head_file = git_dir.join(state_dir).join("head-name");
        let name = match std::fs::read_to_string(&head_file) {
            Ok(name) => name,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(git2::Error::new(
                    git2::ErrorCode::GenericError,
                    git2::ErrorClass::Os,
                    format!("failed to read rebase state from {}: {err}", head_file.display()),
                ));
            }
        };

        let name = name.trim();
        let name = name.strip_prefix(HEADS_PREFIX).unwrap_or(name);
        log::debug!("Rebasing `{name}` (from {})", head_file.display());
        // A detached rebase records "detached HEAD"
        if name.is_empty() || name == "detached HEAD" {
            return Ok(None);
        }
        return Ok(Some(name.to_owned()));
    }

    log::debug!("No rebase in progress in {}", git_dir.display());
    Ok(None)
}

#[derive(Clone, Default, Debug)]
pub struct InMemoryRepo {
    branches: Vec<Branch>,
    rebase_head: Option<String>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn mark_branch(&mut self, branch: Branch) {
        self.branches.push(branch);
    }

    pub fn set_rebase_head(&mut self, name: Option<&str>) {
        self.rebase_head = name.map(ToOwned::to_owned);
    }
}

impl Repo for InMemoryRepo {
    fn local_branches(&self) -> Result<Vec<Branch>, git2::Error> {
        Ok(self.branches.clone())
    }

    fn rebase_head_name(&self) -> Result<Option<String>, git2::Error> {
        Ok(self.rebase_head.clone())
    }
}
