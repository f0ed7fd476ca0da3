use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use linkback_scanner::fetch::DEFAULT_TIMEOUT_SECS;
use linkback_scanner::{BacklinkFinder, PagePolicy, ProbeResult, ScanError, TextEncoding};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

/// Options for configuring a backlink search
pub struct SearchOptions {
    pub seed_url: String,
    pub workers: usize,
    pub timeout: Duration,
    pub encoding: TextEncoding,
    pub policy: PagePolicy,
    /// Stop consuming matches after this long; whatever arrived so far is kept.
    pub max_runtime: Option<Duration>,
    pub show_progress_bars: bool,
}

impl SearchOptions {
    pub fn new(seed_url: impl Into<String>, workers: usize) -> Self {
        Self {
            seed_url: seed_url.into(),
            workers,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            encoding: TextEncoding::default(),
            policy: PagePolicy::default(),
            max_runtime: None,
            show_progress_bars: false,
        }
    }
}

/// Callback for each backlink as soon as it is found
pub type MatchCallback = Arc<dyn Fn(String) + Send + Sync>;

/// What a finished (or deadline-stopped) search produced.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    pub seed_url: String,
    pub workers: usize,
    pub encoding: String,
    pub policy: PagePolicy,
    pub candidates: usize,
    pub probed: usize,
    pub failed: usize,
    /// In the order they were found.
    pub matches: Vec<String>,
    pub elapsed_ms: u64,
    pub timed_out: bool,
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run a backlink search to completion, reporting each match through `match_callback`.
///
/// Fails only when the run itself fails (bad seed, seed unreachable, or the
/// deadline passing before the seed page arrived).
pub async fn execute_search(
    options: SearchOptions,
    match_callback: Option<MatchCallback>,
) -> Result<SearchSummary, String> {
    let SearchOptions {
        seed_url,
        workers,
        timeout,
        encoding,
        policy,
        max_runtime,
        show_progress_bars,
    } = options;

    let started = Instant::now();
    let deadline = max_runtime.map(|d| tokio::time::Instant::now() + d);

    let progress_bar = if show_progress_bars {
        let pb = spinner();
        pb.set_message(format!("Fetching {}", seed_url));
        Some(Arc::new(pb))
    } else {
        None
    };

    let probed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let mut finder = BacklinkFinder::new()
        .with_timeout(timeout)
        .with_encoding(encoding)
        .with_policy(policy.clone());

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let probed_clone = probed.clone();
        finder = finder.with_progress_callback(Arc::new(move |worker_id: usize, url: String| {
            pb_clone.set_message(format!(
                "Probing... {} done | worker {}: {}",
                probed_clone.load(Ordering::Relaxed),
                worker_id,
                extract_url_path(&url)
            ));
        }));
    }

    let probed_clone = probed.clone();
    let failed_clone = failed.clone();
    finder = finder.with_result_callback(Arc::new(move |_url: String, result: ProbeResult| {
        probed_clone.fetch_add(1, Ordering::Relaxed);
        if matches!(result, ProbeResult::Failed(_)) {
            failed_clone.fetch_add(1, Ordering::Relaxed);
        }
    }));

    let started_stream = match deadline {
        Some(deadline) => {
            tokio::time::timeout_at(deadline, finder.find_backlinks(&seed_url, workers))
                .await
                .unwrap_or_else(|_| Err(ScanError::Timeout(seed_url.clone())))
        }
        None => finder.find_backlinks(&seed_url, workers).await,
    };

    let mut stream = match started_stream {
        Ok(stream) => stream,
        Err(e) => {
            if let Some(ref pb) = progress_bar {
                pb.finish_and_clear();
            }
            return Err(format!("Failed to search {}: {}", seed_url, e));
        }
    };

    let candidates = stream.candidate_count();
    info!("Probing {} candidates of {}", candidates, seed_url);

    let mut matches = Vec::new();
    let mut timed_out = false;

    loop {
        let next = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(item) => item,
                Err(_) => {
                    timed_out = true;
                    break;
                }
            },
            None => stream.next().await,
        };

        let Some(url) = next else {
            break;
        };

        if let Some(ref callback) = match_callback {
            match progress_bar {
                Some(ref pb) => pb.suspend(|| callback(url.clone())),
                None => callback(url.clone()),
            }
        }
        matches.push(url);
    }

    // Stops the workers from starting anything new after a deadline.
    drop(stream);

    let probed = probed.load(Ordering::Relaxed);
    let failed = failed.load(Ordering::Relaxed);

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Search complete! {}/{} candidates probed, {} backlinks",
            probed,
            candidates,
            matches.len()
        ));
    }

    Ok(SearchSummary {
        seed_url,
        workers,
        encoding: encoding.to_string(),
        policy,
        candidates,
        probed,
        failed,
        matches,
        elapsed_ms: started.elapsed().as_millis() as u64,
        timed_out,
    })
}
