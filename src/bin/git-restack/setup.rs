use std::io::Write;

use proc_exit::prelude::*;

#[derive(clap::Args)]
pub(crate) struct SetupArgs {
    /// Print the edit script instead of installing it
    #[arg(long)]
    print_edit_script: bool,
}

impl SetupArgs {
    pub(crate) fn exec(&self, colored_stderr: bool) -> proc_exit::ExitResult {
        if self.print_edit_script {
            anstream::stdout()
                .write_all(git_restack::setup::EDIT_SCRIPT.as_bytes())
                .to_sysexits()?;
            return Ok(());
        }

        let path =
            git_restack::setup::default_script_path().with_code(proc_exit::sysexits::CONFIG_ERR)?;
        git_restack::setup::install(&path).with_code(proc_exit::Code::FAILURE)?;

        let palette = if colored_stderr {
            crate::ops::Palette::colored()
        } else {
            crate::ops::Palette::plain()
        };
        let _ = writeln!(
            anstream::stderr(),
            "{}: {}={}",
            palette.good("Registered"),
            git_restack::setup::SEQUENCE_EDITOR_FIELD,
            palette.highlight(path.display())
        );
        let _ = writeln!(
            anstream::stderr(),
            "git-restack has been set up successfully."
        );

        Ok(())
    }
}
