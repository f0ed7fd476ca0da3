pub mod connectivity;
pub mod report;
pub mod search;
pub mod workers;

use colored::Colorize;

pub use connectivity::{DEFAULT_CONNECTIVITY_URL, connected_to_internet, url_is_active};
pub use report::{ReportFormat, generate_report};
pub use search::{MatchCallback, SearchOptions, SearchSummary, execute_search};
pub use workers::{default_worker_count, host_default_worker_count};

pub fn print_banner() {
    let banner = r#"
  _ _       _    _                _
 | (_)_ __ | | _| |__   __ _  ___| | __
 | | | '_ \| |/ / '_ \ / _` |/ __| |/ /
 | | | | | |   <| |_) | (_| | (__|   <
 |_|_|_| |_|_|\_\_.__/ \__,_|\___|_|\_\
"#;
    eprintln!("{}", banner.bright_cyan());
    eprintln!(
        "  {} {}\n",
        "who links back?".dimmed(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
