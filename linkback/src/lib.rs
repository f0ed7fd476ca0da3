pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_policy, parse_encoding, parse_worker_count, resolve_seed_url, resolve_worker_count,
    write_report,
};

// Re-export search functionality from linkback-core
pub use linkback_core::search::{
    MatchCallback, SearchOptions, SearchSummary, execute_search, extract_url_path,
};
