use crate::classify::{PageClassifier, PagePolicy};
use crate::error::{Result, ScanError};
use crate::extract::extract_hrefs;
use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, PageFetcher, TextEncoding};
use crate::normalize::normalize_all;
use crate::probe::Prober;
use crate::result::ProbeResult;
use crate::target::SeedTarget;
use futures::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

/// Called with `(worker_id, candidate)` right before a worker probes a candidate.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
/// Called with every probe outcome, matches and failures alike.
pub type ResultCallback = Arc<dyn Fn(String, ProbeResult) + Send + Sync>;

/// Matching URLs in completion order.
///
/// The stream ends once every candidate has been probed. Dropping it stops
/// workers from picking up further candidates.
pub struct BacklinkStream {
    inner: ReceiverStream<String>,
    candidate_count: usize,
}

impl BacklinkStream {
    /// Number of distinct candidates handed to the worker pool.
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }
}

impl Stream for BacklinkStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

pub struct BacklinkFinder {
    timeout: Duration,
    user_agent: String,
    encoding: TextEncoding,
    policy: PagePolicy,
    progress_callback: Option<ProgressCallback>,
    result_callback: Option<ResultCallback>,
}

impl BacklinkFinder {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            encoding: TextEncoding::default(),
            policy: PagePolicy::default(),
            progress_callback: None,
            result_callback: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_policy(mut self, policy: PagePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    /// Fetch `seed_url`, then probe its outbound pages with `workers` concurrent workers.
    ///
    /// Only run-level failures are returned as errors: a bad seed URL, a zero
    /// worker count, or a seed page that cannot be fetched and decoded. Failing
    /// candidates just never show up in the stream.
    pub async fn find_backlinks(&self, seed_url: &str, workers: usize) -> Result<BacklinkStream> {
        if workers == 0 {
            return Err(ScanError::InvalidWorkerCount(workers));
        }

        let target = Arc::new(SeedTarget::parse(seed_url)?);
        let fetcher =
            PageFetcher::new(self.timeout, &self.user_agent)?.with_encoding(self.encoding);

        info!("Fetching seed page {} ({} workers)", target.url(), workers);
        let markup = fetcher.fetch_text(target.url()).await?;

        let candidates = collect_candidates(&markup, &target, &self.policy);
        info!(
            "Found {} candidate pages on {}",
            candidates.len(),
            target.url()
        );

        Ok(self.dispatch(Prober::new(fetcher, target), candidates, workers))
    }

    fn dispatch(&self, prober: Prober, candidates: Vec<String>, workers: usize) -> BacklinkStream {
        let candidate_count = candidates.len();
        let queue = Arc::new(Mutex::new(VecDeque::from(candidates)));
        let (tx, rx) = mpsc::channel(workers);

        // No candidates means no workers; dropping `tx` ends the stream at once.
        let pool_size = workers.min(candidate_count);

        for worker_id in 0..pool_size {
            let queue = queue.clone();
            let tx = tx.clone();
            let prober = prober.clone();
            let progress_cb = self.progress_callback.clone();
            let result_cb = self.result_callback.clone();

            tokio::spawn(async move {
                debug!("Worker {} started", worker_id);

                loop {
                    if tx.is_closed() {
                        debug!("Worker {}: consumer dropped the stream", worker_id);
                        break;
                    }

                    let next = {
                        let mut queue = queue.lock().await;
                        queue.pop_front()
                    };
                    let Some(candidate) = next else {
                        break;
                    };

                    if let Some(ref callback) = progress_cb {
                        callback(worker_id, candidate.clone());
                    }

                    let result = prober.probe(&candidate).await;

                    if let Some(ref callback) = result_cb {
                        callback(candidate.clone(), result.clone());
                    }

                    if let Some(url) = result.into_match()
                        && tx.send(url).await.is_err()
                    {
                        break;
                    }
                }

                debug!("Worker {} finished", worker_id);
            });
        }

        BacklinkStream {
            inner: ReceiverStream::new(rx),
            candidate_count,
        }
    }
}

impl Default for BacklinkFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract, normalize and classify the outbound links of the seed page.
pub fn collect_candidates(markup: &str, target: &SeedTarget, policy: &PagePolicy) -> Vec<String> {
    let classifier = PageClassifier::new(target.url(), policy.clone());

    normalize_all(extract_hrefs(markup), target.origin())
        .into_iter()
        .filter(|url| {
            let keep = classifier.is_page_like(url);
            if !keep {
                debug!("Not a candidate: {}", url);
            }
            keep
        })
        .collect()
}

/// Find backlinks of `seed_url` with the default finder configuration.
pub async fn find_backlinks(seed_url: &str, workers: usize) -> Result<BacklinkStream> {
    BacklinkFinder::new().find_backlinks(seed_url, workers).await
}
