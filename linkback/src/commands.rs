use crate::CLAP_STYLING;
use clap::{ArgAction, arg};
use linkback_core::DEFAULT_CONNECTIVITY_URL;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkback")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkback")
        .about("Finds the pages linked from a page that link back to it")
        .styles(CLAP_STYLING)
        .arg(
            arg!([URL])
                .required(false)
                .help("The page to find backlinks for. Asked for on stdin when omitted"),
        )
        .arg(
            arg!([WORKERS])
                .required(false)
                .help("Number of concurrent workers. Asked for on stdin when omitted"),
        )
        .arg(
            arg!(-t --"timeout" <SECS>)
                .required(false)
                .help("Per-request timeout in seconds [default: 10]")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(-e --"encoding" <ENCODING>)
                .required(false)
                .help("How page bodies are decoded")
                .value_parser(["utf-8", "utf-8-lossy", "latin-1", "ascii"])
                .default_value("utf-8"),
        )
        .arg(
            arg!(-d --"domain" <HOST>)
                .required(false)
                .help("Only probe pages on this host or its subdomains")
                .conflicts_with("wiki"),
        )
        .arg(
            arg!(--"path-prefix" <PREFIX>)
                .required(false)
                .help("Only probe pages whose path starts with this prefix")
                .requires("domain"),
        )
        .arg(
            arg!(--"exclude-query" "Skip pages whose URL has a query string").required(false),
        )
        .arg(
            arg!(-w --"wiki" "Only probe /wiki/ pages on wikipedia.org, without query strings")
                .required(false),
        )
        .arg(
            arg!(-m --"max-runtime" <SECS>)
                .required(false)
                .help("Stop after this many seconds and report what was found so far")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(--"skip-connectivity-check" "Do not check for an internet connection first")
                .required(false),
        )
        .arg(
            arg!(--"connectivity-url" <URL>)
                .required(false)
                .help("A known-good URL used for the connectivity check")
                .default_value(DEFAULT_CONNECTIVITY_URL),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Write the report to a file instead of stdout"),
        )
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress and non-essential output")
                .required(false),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .action(ArgAction::Count),
        )
}
