//! Run the user's editor on a restacked copy of the instruction list.

use std::io::{BufRead as _, Write as _};
use std::path::{Path, PathBuf};

/// Name git gives the instruction list; some editors key syntax highlighting off of it
static TODO_FILE_NAME: &str = "git-rebase-todo";

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to list branches: {0}")]
    Inventory(#[from] git2::Error),
    #[error("failed to write {}: {source}", path.display())]
    Rewrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run editor `{editor}`: {source}")]
    Spawn {
        editor: String,
        #[source]
        source: std::io::Error,
    },
    #[error("editor `{editor}` failed: {status}")]
    Editor {
        editor: String,
        status: std::process::ExitStatus,
    },
    #[error(transparent)]
    Install(#[from] crate::fs::ReplaceError),
    #[error(
        "failed to remove {}: {source}{}",
        path.display(),
        after.as_deref().map(|err| format!(" (after: {err})")).unwrap_or_default()
    )]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        /// Failure that came before the cleanup was attempted
        after: Option<Box<EditError>>,
    },
}

/// Outcome of a successful edit
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct EditSummary {
    /// Branches that received an update directive
    pub updated: Vec<String>,
}

pub struct EditSession<'r> {
    repo: &'r dyn crate::git::Repo,
    editor: String,
    remote: Option<String>,
}

impl<'r> EditSession<'r> {
    pub fn new(repo: &'r dyn crate::git::Repo, editor: impl Into<String>) -> Self {
        Self {
            repo,
            editor: editor.into(),
            remote: None,
        }
    }

    /// Remote to generate the push section for; `None` skips it
    pub fn remote(mut self, remote: Option<&str>) -> Self {
        self.remote = remote.map(ToOwned::to_owned);
        self
    }

    /// Restack `path`, let the user edit it, and install the result back at `path`.
    ///
    /// `path` is left untouched on any failure before the install.
    pub fn run(&self, path: &Path) -> Result<EditSummary, EditError> {
        let rebase_head = self.repo.rebase_head_name()?;
        let branches = crate::git::Branches::from_repo(self.repo)?;
        let options = crate::restack::RestackOptions::new()
            .rebase_head(rebase_head.as_deref())
            .remote(self.remote.as_deref());

        let src = std::fs::File::open(path).map_err(|source| EditError::Read {
            path: path.to_owned(),
            source,
        })?;

        let temp = tempfile::Builder::new()
            .prefix("git-restack.")
            .tempdir()
            .map_err(|source| EditError::Rewrite {
                path: std::env::temp_dir(),
                source,
            })?;
        let temp_path = temp.path().to_owned();
        log::trace!("Staging edits in {}", temp_path.display());

        let result = self.edit_in(&temp_path, path, src, &branches, &options);

        match (result, temp.close()) {
            (result, Ok(())) => result,
            (Ok(_), Err(source)) => Err(EditError::Cleanup {
                path: temp_path,
                source,
                after: None,
            }),
            (Err(err), Err(source)) => Err(EditError::Cleanup {
                path: temp_path,
                source,
                after: Some(Box::new(err)),
            }),
        }
    }

    fn edit_in(
        &self,
        temp_path: &Path,
        path: &Path,
        src: std::fs::File,
        branches: &crate::git::Branches,
        options: &crate::restack::RestackOptions,
    ) -> Result<EditSummary, EditError> {
        let todo_path = temp_path.join(TODO_FILE_NAME);
        let updated = write_restacked(path, src, &todo_path, branches, options)?;
        log::debug!(
            "Wrote {} with {} branch updates",
            todo_path.display(),
            updated.len()
        );

        self.run_editor(&todo_path)?;

        crate::fs::replace(&todo_path, path)?;
        log::trace!("Installed {}", path.display());

        Ok(EditSummary { updated })
    }

    fn run_editor(&self, path: &Path) -> Result<(), EditError> {
        log::trace!("Running `{}` on {}", self.editor, path.display());
        // `$1` keeps the path out of the shell's parsing while the editor string keeps its own
        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("{} \"$1\"", self.editor))
            .arg("git-restack")
            .arg(path)
            .status()
            .map_err(|source| EditError::Spawn {
                editor: self.editor.clone(),
                source,
            })?;
        if !status.success() {
            return Err(EditError::Editor {
                editor: self.editor.clone(),
                status,
            });
        }
        Ok(())
    }
}

fn write_restacked(
    src_path: &Path,
    src: std::fs::File,
    dst_path: &Path,
    branches: &crate::git::Branches,
    options: &crate::restack::RestackOptions,
) -> Result<Vec<String>, EditError> {
    let rewrite_err = |source: std::io::Error| EditError::Rewrite {
        path: dst_path.to_owned(),
        source,
    };

    let dst = std::fs::File::create(dst_path).map_err(rewrite_err)?;
    let mut restacker =
        crate::restack::Restacker::new(std::io::BufWriter::new(dst), branches, options);
    for line in std::io::BufReader::new(src).lines() {
        let line = line.map_err(|source| EditError::Read {
            path: src_path.to_owned(),
            source,
        })?;
        restacker.push_line(&line).map_err(rewrite_err)?;
    }
    let updated = restacker.updated_branches().to_vec();
    let mut dst = restacker.finish().map_err(rewrite_err)?;
    dst.flush().map_err(rewrite_err)?;
    Ok(updated)
}
