#[derive(clap::Parser)]
#[command(about, author, version)]
#[command(
        dont_collapse_args_in_usage = true,
        subcommand_required = true,
        arg_required_else_help = true,
    )]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) subcommand: Subcommand,

    #[command(flatten)]
    pub(crate) color: colorchoice_clap::Color,

    #[command(flatten)]
    pub(crate) verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
}

#[derive(clap::Subcommand)]
pub(crate) enum Subcommand {
    /// Install git-restack as git's `sequence.editor`
    Setup(crate::setup::SetupArgs),
    /// Restack a rebase instruction list and open it in an editor
    Edit(crate::edit::EditArgs),
}
