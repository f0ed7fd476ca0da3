use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use linkback::handlers::{
    build_policy, log_level, parse_encoding, resolve_seed_url, resolve_worker_count, write_report,
};
use linkback_core::{
    MatchCallback, ReportFormat, SearchOptions, connected_to_internet, execute_search,
    generate_report, host_default_worker_count, print_banner,
};
use linkback_scanner::fetch::DEFAULT_TIMEOUT_SECS;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod commands;

const EXIT_RUN_FAILED: u8 = 1;
const EXIT_BAD_INPUT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();
    let quiet = matches.get_flag("quiet");

    tracing_subscriber::fmt()
        .with_max_level(log_level(matches.get_count("verbose"), quiet))
        .with_writer(io::stderr)
        .init();

    if !quiet {
        print_banner();
    }

    handle_search(&matches).await
}

async fn handle_search(args: &ArgMatches) -> ExitCode {
    let quiet = args.get_flag("quiet");
    let timeout = Duration::from_secs(
        args.get_one::<u64>("timeout")
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    );

    if !args.get_flag("skip-connectivity-check") {
        let probe_url = args
            .get_one::<String>("connectivity-url")
            .map(String::as_str)
            .unwrap_or(linkback_core::DEFAULT_CONNECTIVITY_URL);

        if !connected_to_internet(probe_url, timeout).await {
            eprintln!(
                "{} You are not connected to the internet, internet is required to run linkback.",
                "✗".red().bold()
            );
            eprintln!("  Please connect to the internet and try again.");
            return ExitCode::from(EXIT_BAD_INPUT);
        }
        if !quiet {
            eprintln!("{} You are connected to the internet.", "✓".green().bold());
        }
    }

    let encoding = match parse_encoding(
        args.get_one::<String>("encoding")
            .map(String::as_str)
            .unwrap_or("utf-8"),
    ) {
        Ok(encoding) => encoding,
        Err(e) => return bad_input(e),
    };

    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args.get_one::<String>("output").cloned();

    let policy = build_policy(
        args.get_flag("wiki"),
        args.get_one::<String>("domain").map(String::as_str),
        args.get_one::<String>("path-prefix").map(String::as_str),
        args.get_flag("exclude-query"),
    );

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut reader = stdin.lock();
    let mut prompt_out = io::stderr();

    let seed_url = match resolve_seed_url(
        args.get_one::<String>("URL").cloned(),
        &mut reader,
        &mut prompt_out,
        timeout,
    )
    .await
    {
        Ok(url) => url,
        Err(e) => return bad_input(e),
    };

    let default_workers = host_default_worker_count();
    let worker_arg = args.get_one::<String>("WORKERS").map(String::as_str);
    let workers = if worker_arg.is_none() && !interactive {
        default_workers
    } else {
        match resolve_worker_count(worker_arg, default_workers, &mut reader, &mut prompt_out) {
            Ok(workers) => workers,
            Err(e) => return bad_input(e),
        }
    };
    drop(reader);

    info!("Searching {} with {} workers ({})", seed_url, workers, encoding);

    let mut options = SearchOptions::new(seed_url.clone(), workers);
    options.timeout = timeout;
    options.encoding = encoding;
    options.policy = policy;
    options.max_runtime = args
        .get_one::<u64>("max-runtime")
        .map(|secs| Duration::from_secs(*secs));
    options.show_progress_bars = !quiet && io::stderr().is_terminal();

    // JSON on stdout must stay a single document.
    let stream_matches = format == ReportFormat::Text || output.is_some();
    let match_callback: Option<MatchCallback> = if stream_matches {
        Some(Arc::new(|url: String| {
            let mut stdout = io::stdout().lock();
            let _ = writeln!(stdout, "{}", url);
            let _ = stdout.flush();
        }))
    } else {
        None
    };

    if !quiet {
        eprintln!(
            "Those are the pages linked from {} that link back to it:\n",
            seed_url.bright_white()
        );
    }

    let summary = match execute_search(options, match_callback).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return ExitCode::from(EXIT_RUN_FAILED);
        }
    };

    if let Some(path) = output {
        let report = match generate_report(&summary, format) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{} Failed to generate report: {}", "✗".red().bold(), e);
                return ExitCode::from(EXIT_RUN_FAILED);
            }
        };
        match write_report(&report, &path) {
            Ok(written) => {
                if !quiet {
                    eprintln!(
                        "{} Report written to {}",
                        "✓".green().bold(),
                        written.display().to_string().bright_white()
                    );
                }
            }
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                return ExitCode::from(EXIT_RUN_FAILED);
            }
        }
    } else if format == ReportFormat::Json {
        match generate_report(&summary, format) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                eprintln!("{} Failed to generate report: {}", "✗".red().bold(), e);
                return ExitCode::from(EXIT_RUN_FAILED);
            }
        }
    }

    if !quiet {
        let status = if summary.timed_out {
            "⚠".yellow().bold()
        } else {
            "✓".green().bold()
        };
        eprintln!(
            "\n{} {} backlinks among {} candidates ({} probed, {} failed) in {:.2}s{}",
            status,
            summary.matches.len().to_string().bright_white().bold(),
            summary.candidates,
            summary.probed,
            summary.failed,
            summary.elapsed_ms as f64 / 1000.0,
            if summary.timed_out {
                ", stopped at the maximum runtime"
            } else {
                ""
            }
        );
    }

    ExitCode::SUCCESS
}

fn bad_input(e: anyhow::Error) -> ExitCode {
    eprintln!("{} {:#}", "✗".red().bold(), e);
    ExitCode::from(EXIT_BAD_INPUT)
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
