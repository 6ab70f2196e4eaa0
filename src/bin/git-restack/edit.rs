use proc_exit::prelude::*;

#[derive(clap::Args)]
pub(crate) struct EditArgs {
    /// Editor to open the instructions in (default: git's editor)
    #[arg(short, long, value_name = "EDITOR")]
    editor: Option<String>,

    /// Remote to suggest pushing updated branches to, empty for none (default: `restack.pushRemote`)
    #[arg(long, value_name = "NAME")]
    remote: Option<String>,

    /// Don't suggest pushing updated branches
    #[arg(long, conflicts_with = "remote")]
    no_push: bool,

    /// Rebase instruction list, usually `.git/rebase-merge/git-rebase-todo`
    #[arg(value_name = "FILE")]
    file: std::path::PathBuf,
}

impl EditArgs {
    pub(crate) fn exec(&self) -> proc_exit::ExitResult {
        log::trace!("Initializing");
        let cwd = std::env::current_dir().with_code(proc_exit::sysexits::USAGE_ERR)?;
        let repo = git2::Repository::discover(&cwd).with_code(proc_exit::sysexits::USAGE_ERR)?;

        let repo_config = git_restack::config::RepoConfig::from_all(&repo)
            .with_code(proc_exit::sysexits::CONFIG_ERR)?
            .update(self.to_config());
        log::debug!(
            "Editing with `{}`, pushing to {:?}",
            repo_config.editor(),
            repo_config.push_remote()
        );

        let mut repo = git_restack::git::GitRepo::new(repo);
        repo.set_timeout(repo_config.git_timeout());

        let summary = git_restack::edit::EditSession::new(&repo, repo_config.editor())
            .remote(repo_config.push_remote())
            .run(&self.file)
            .with_code(proc_exit::Code::FAILURE)?;
        log::debug!("Updated branches: {}", summary.updated.join(", "));

        Ok(())
    }

    fn to_config(&self) -> git_restack::config::RepoConfig {
        let push_section = if self.no_push {
            Some(false)
        } else if self.remote.is_some() {
            Some(true)
        } else {
            None
        };
        git_restack::config::RepoConfig {
            push_remote: self.remote.clone(),
            push_section,
            git_timeout: None,
            editor: self.editor.clone().filter(|e| !e.trim().is_empty()),
        }
    }
}
