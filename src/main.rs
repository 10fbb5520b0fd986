mod app;

use app::cli::Cli;
use app::error::ConcatError;
use clap::Parser;
use env_logger::Env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            let code = err.downcast_ref::<ConcatError>().map_or(1, ConcatError::exit_code);
            ExitCode::from(code)
        }
    }
}
