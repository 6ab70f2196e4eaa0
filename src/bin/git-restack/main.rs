use proc_exit::prelude::*;

mod args;
mod edit;
mod logger;
mod ops;
mod setup;

fn main() {
    human_panic::setup_panic!();
    let result = run();
    proc_exit::exit(result);
}

fn run() -> proc_exit::ExitResult {
    // clap's `get_matches` uses Failure rather than Usage, so bypass it for `try_parse`.
    let args = match <args::Args as clap::Parser>::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return Err(proc_exit::sysexits::USAGE_ERR.as_exit());
        }
        Err(e) => {
            e.print().to_sysexits()?;
            return Ok(());
        }
    };

    args.color.write_global();
    let colored_stderr = !matches!(
        anstream::AutoStream::choice(&std::io::stderr()),
        anstream::ColorChoice::Never
    );
    logger::init_logging(&args.verbose, colored_stderr);

    match &args.subcommand {
        args::Subcommand::Setup(sub_args) => sub_args.exec(colored_stderr),
        args::Subcommand::Edit(sub_args) => sub_args.exec(),
    }
}
