//! Installing `git-restack` as git's sequence editor.

use std::path::{Path, PathBuf};

pub static SEQUENCE_EDITOR_FIELD: &str = "sequence.editor";

static SCRIPT_DIR: &str = ".restack";
static SCRIPT_NAME: &str = "edit.sh";

/// Wrapper git runs as `sequence.editor`.
///
/// Falls back to the plain editor when `git-restack` is missing so a rebase is never blocked.
pub static EDIT_SCRIPT: &str = r#"#!/bin/sh -e

editor=$(git var GIT_EDITOR)
restack=$(command -v git-restack || echo "")

# ~/.cargo/bin is not on $PATH but git-restack is installed there.
if [ -z "$restack" ]; then
	cargo_bin="${CARGO_HOME:-$HOME/.cargo}/bin/git-restack"
	if [ -x "$cargo_bin" ]; then
		restack="$cargo_bin"
	fi
fi

if [ -n "$restack" ]; then
	"$restack" edit --editor="$editor" "$@"
else
	echo "WARNING:" >&2
	echo "  Could not find git-restack. Falling back to $editor." >&2
	echo "  To install git-restack, run \`cargo install git-restack\`" >&2
	echo "" >&2

	eval "$editor \"\$@\""
fi
"#;

/// Where `setup` puts the edit script: `~/.restack/edit.sh`
pub fn default_script_path() -> eyre::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| eyre::eyre!("could not find home directory"))?;
    Ok(home.join(SCRIPT_DIR).join(SCRIPT_NAME))
}

/// Write [`EDIT_SCRIPT`] to `path` as an executable.
pub fn write_edit_script(path: &Path) -> eyre::Result<()> {
    use eyre::WrapErr as _;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, EDIT_SCRIPT)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .wrap_err_with(|| format!("failed to make {} executable", path.display()))?;
    }
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Point `sequence.editor` in `config` at the script at `path`.
pub fn register(config: &mut git2::Config, path: &Path) -> eyre::Result<()> {
    let value = sequence_editor_value(path)?;
    config.set_str(SEQUENCE_EDITOR_FIELD, &value)?;
    log::debug!("Set {SEQUENCE_EDITOR_FIELD}={value}");
    Ok(())
}

/// `path`, quoted for git to pass to the shell
pub fn sequence_editor_value(path: &Path) -> eyre::Result<String> {
    let path = path
        .to_str()
        .ok_or_else(|| eyre::eyre!("{} is not valid UTF-8", path.display()))?;
    let quoted = shlex::try_quote(path)?;
    Ok(quoted.into_owned())
}

/// The user's global git config, created on first write if missing
pub fn open_global_config() -> eyre::Result<git2::Config> {
    match git2::Config::open_default().and_then(|mut c| c.open_global()) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::debug!("No global git config ({err}), creating one");
            let home =
                dirs::home_dir().ok_or_else(|| eyre::eyre!("could not find home directory"))?;
            Ok(git2::Config::open(&home.join(".gitconfig"))?)
        }
    }
}

/// Install the edit script at `path` and register it globally.
pub fn install(path: &Path) -> eyre::Result<()> {
    write_edit_script(path)?;
    let mut config = open_global_config()?;
    register(&mut config, path)?;
    Ok(())
}
