#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct RepoConfig {
    pub push_remote: Option<String>,
    pub push_section: Option<bool>,
    pub git_timeout: Option<std::time::Duration>,
    pub editor: Option<String>,
}

static PUSH_REMOTE_FIELD: &str = "restack.pushRemote";
static PUSH_SECTION_FIELD: &str = "restack.pushSection";
static GIT_TIMEOUT_FIELD: &str = "restack.gitTimeout";
static EDITOR_FIELD: &str = "core.editor";
static PUSH_DEFAULT_FIELD: &str = "remote.pushDefault";

static DEFAULT_PUSH_REMOTE: &str = "origin";
static DEFAULT_EDITOR: &str = "vi";

impl RepoConfig {
    /// Layer every source, lowest precedence first.
    ///
    /// The editor follows git: `GIT_EDITOR`, `core.editor`, `VISUAL`, `EDITOR`, then `vi`.
    pub fn from_all(repo: &git2::Repository) -> eyre::Result<Self> {
        let config = Self::from_defaults();
        let config = config.update(Self::from_env_fallback(env_var));
        let config = config.update(Self::from_repo(repo)?);
        let config = config.update(Self::from_env_override(env_var));
        Ok(config)
    }

    /// The repository's git config, which includes the global and system files
    pub fn from_repo(repo: &git2::Repository) -> eyre::Result<Self> {
        log::trace!("Loading config for {}", repo.path().display());
        let mut config = repo.config()?;
        let config = config.snapshot()?;
        Ok(Self::from_gitconfig(&config))
    }

    pub fn from_defaults() -> Self {
        Self {
            push_remote: Some(DEFAULT_PUSH_REMOTE.to_owned()),
            push_section: Some(true),
            git_timeout: Some(crate::git::DEFAULT_TIMEOUT),
            editor: Some(DEFAULT_EDITOR.to_owned()),
        }
    }

    pub fn from_gitconfig(config: &git2::Config) -> Self {
        let push_remote = config
            .get_string(PUSH_REMOTE_FIELD)
            .ok()
            .or_else(|| {
                config
                    .get_string(PUSH_DEFAULT_FIELD)
                    .ok()
                    .filter(|r| !r.is_empty())
            });

        let push_section = config.get_bool(PUSH_SECTION_FIELD).ok();

        let git_timeout = config.get_i64(GIT_TIMEOUT_FIELD).ok().and_then(|secs| {
            if 0 < secs {
                Some(std::time::Duration::from_secs(secs.unsigned_abs()))
            } else {
                log::debug!("Ignoring non-positive {GIT_TIMEOUT_FIELD}={secs}");
                None
            }
        });

        let editor = config
            .get_string(EDITOR_FIELD)
            .ok()
            .filter(|e| !e.trim().is_empty());

        Self {
            push_remote,
            push_section,
            git_timeout,
            editor,
        }
    }

    fn from_env_override(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            editor: var("GIT_EDITOR").filter(|e| !e.trim().is_empty()),
            ..Default::default()
        }
    }

    fn from_env_fallback(var: impl Fn(&str) -> Option<String>) -> Self {
        let editor = ["VISUAL", "EDITOR"]
            .into_iter()
            .filter_map(var)
            .find(|e| !e.trim().is_empty());
        Self {
            editor,
            ..Default::default()
        }
    }

    pub fn update(mut self, other: Self) -> Self {
        self.push_remote = other.push_remote.or(self.push_remote);
        self.push_section = other.push_section.or(self.push_section);
        self.git_timeout = other.git_timeout.or(self.git_timeout);
        self.editor = other.editor.or(self.editor);
        self
    }

    /// Remote for the push section, `None` when the section is disabled
    ///
    /// An explicitly empty remote disables it too.
    pub fn push_remote(&self) -> Option<&str> {
        if !self.push_section() {
            return None;
        }
        match self.push_remote.as_deref() {
            Some("") => None,
            Some(remote) => Some(remote),
            None => Some(DEFAULT_PUSH_REMOTE),
        }
    }

    pub fn push_section(&self) -> bool {
        self.push_section.unwrap_or(true)
    }

    pub fn git_timeout(&self) -> std::time::Duration {
        self.git_timeout.unwrap_or(crate::git::DEFAULT_TIMEOUT)
    }

    pub fn editor(&self) -> &str {
        self.editor.as_deref().unwrap_or(DEFAULT_EDITOR)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
