use anyhow::{Context, bail};
use linkback_core::url_is_active;
use linkback_scanner::{DomainRestriction, PagePolicy, TextEncoding, is_web_page};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Write `message` and read one trimmed line. `None` on end of input.
pub fn prompt_line<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(writer, "{}", message)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Parse a worker count; only a literal positive integer is accepted.
pub fn parse_worker_count(input: &str) -> Result<usize, String> {
    let input = input.trim();
    let not_an_int = || format!("{} is not a literal int, please enter a literal int", input);

    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(not_an_int());
    }

    let workers: usize = input.parse().map_err(|_| not_an_int())?;
    if workers == 0 {
        return Err(format!("{} is not positive", workers));
    }
    Ok(workers)
}

/// What to ask for after `entered` was rejected.
fn retry_prompt(entered: &str) -> &'static str {
    let entered = entered.trim();
    if !entered.is_empty() && entered.chars().all(|c| c.is_ascii_digit()) {
        "Please enter a positive integer:\n"
    } else {
        "Please enter a literal int:\n"
    }
}

/// Worker count from the command line, or asked for until a valid one is entered.
///
/// An empty answer to the first prompt takes `default`.
pub fn resolve_worker_count<R: BufRead, W: Write>(
    arg: Option<&str>,
    default: usize,
    reader: &mut R,
    writer: &mut W,
) -> anyhow::Result<usize> {
    let mut entered = match arg {
        Some(arg) => arg.to_string(),
        None => {
            let message = format!(
                "Enter the number of workers.\n\
                 The number of workers must be a literal positive int.\n\
                 The default value for your computer is: {}\n",
                default
            );
            match prompt_line(reader, writer, &message)? {
                Some(line) if line.is_empty() => return Ok(default),
                Some(line) => line,
                None => bail!("No worker count given"),
            }
        }
    };

    loop {
        match parse_worker_count(&entered) {
            Ok(workers) => return Ok(workers),
            Err(message) => {
                writeln!(writer, "{}", message)?;
                entered = match prompt_line(reader, writer, retry_prompt(&entered))? {
                    Some(line) => line,
                    None => bail!("No valid worker count given"),
                };
            }
        }
    }
}

/// Everything wrong with `url` as a seed, or `None` when it can be used.
pub async fn seed_url_problems(url: &str, timeout: Duration) -> Option<String> {
    let mut problems = String::new();

    if !is_web_page(url) {
        problems.push_str(
            "The URL must be a working URL to an active web page.\n\
             It must start with either http:// or https://\n\
             and not have a file extension (except .html).\n",
        );
    }

    if !url_is_active(url, timeout).await {
        problems.push_str(&format!(
            "The page at {} is not active or does not exist.\n",
            url
        ));
    }

    if problems.is_empty() {
        None
    } else {
        Some(problems)
    }
}

/// The seed URL from the command line (first attempt only) or stdin, asked
/// for again until it points at an active web page.
pub async fn resolve_seed_url<R: BufRead, W: Write>(
    initial: Option<String>,
    reader: &mut R,
    writer: &mut W,
    timeout: Duration,
) -> anyhow::Result<String> {
    let mut candidate = initial;

    loop {
        let url = match candidate.take() {
            Some(url) => url,
            None => match prompt_line(reader, writer, "Enter your URL:\n")? {
                Some(url) => url,
                None => bail!("No usable URL given"),
            },
        };

        match seed_url_problems(&url, timeout).await {
            None => return Ok(url),
            Some(problems) => writeln!(writer, "{}", problems)?,
        }
    }
}

/// Translate the page filtering flags into a policy.
pub fn build_policy(
    wiki: bool,
    domain: Option<&str>,
    path_prefix: Option<&str>,
    exclude_query: bool,
) -> PagePolicy {
    if wiki {
        return PagePolicy::wiki();
    }

    let mut policy = PagePolicy::permissive().with_exclude_query(exclude_query);
    if let Some(domain) = domain {
        let mut restriction = DomainRestriction::new(domain);
        if let Some(prefix) = path_prefix {
            restriction = restriction.with_path_prefix(prefix);
        }
        policy = policy.with_domain(restriction);
    }
    policy
}

pub fn parse_encoding(label: &str) -> anyhow::Result<TextEncoding> {
    label
        .parse::<TextEncoding>()
        .with_context(|| format!("Invalid --encoding value '{}'", label))
}

/// Write the report to `path` (with `~` expanded), returning where it went.
pub fn write_report(report: &str, path: &str) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(path);
    let path = PathBuf::from(expanded.as_ref());

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(&path, report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(path)
}

pub fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}
