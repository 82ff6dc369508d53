#![deny(unsafe_code)]
#![deny(clippy::all, clippy::perf, clippy::suspicious)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

use mimic::cli::{Cli, dispatch};
use mimic::error::Result;
use std::process::ExitCode;

fn main() -> ExitCode {
    run_with_args(std::env::args().skip(1))
}

fn run_with_args<I, S>(args: I) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            dispatch::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn try_main<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let cli = Cli::parse_from(args)?;
    dispatch::run(cli)
}
