use colored::Colorize;
use sitecheck::{command_argument_builder, handle_audit, init_logging};
use sitecheck_core::print_banner;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = command_argument_builder().get_matches();

    // Show banner unless --quiet flag is set
    if !matches.get_flag("quiet") {
        print_banner();
    }

    init_logging(matches.get_flag("verbose"));

    match handle_audit(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
