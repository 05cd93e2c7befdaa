use clap::{arg, value_parser};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitecheck")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitecheck")
        .about(
            "Finds a site's sitemaps through robots.txt or common paths, expands them and \
            records the HTTP status of every listed URL.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!([DOMAIN])
                .required(false)
                .help("The domain to audit, e.g. example.com (prompted for when omitted)"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Log scanner activity at debug level (RUST_LOG overrides)")
                .required(false),
        )
        .arg(arg!(--"no-progress" "Print progress lines instead of a progress bar").required(false))
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to write the report (default: url_status_codes.<format>)"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: xlsx, csv, json")
                .value_parser(["xlsx", "csv", "json"])
                .default_value("xlsx"),
        )
        .arg(
            arg!(--"user-agent" <USER_AGENT>)
                .required(false)
                .help("User-Agent header sent with every request (default: a mobile Chrome string)"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Timeout for robots.txt, fallback probes and sitemap downloads")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(--"status-timeout" <SECONDS>)
                .required(false)
                .help("Timeout for each URL status check")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("2"),
        )
        .arg(
            arg!(--"max-depth" <DEPTH>)
                .required(false)
                .help("How deeply sitemap indexes may nest before a branch is abandoned")
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"pause-ms" <MILLISECONDS>)
                .required(false)
                .help("Delay between consecutive status checks")
                .value_parser(value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            arg!(-c --"concurrency" <NUM>)
                .required(false)
                .help("Status checks allowed in flight at once. Output order is unaffected.")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
}
