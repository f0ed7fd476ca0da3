use crate::fetch::PageFetcher;
use crate::result::ProbeResult;
use crate::target::SeedTarget;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tests candidates for a link back to one seed.
#[derive(Debug, Clone)]
pub struct Prober {
    fetcher: PageFetcher,
    target: Arc<SeedTarget>,
}

impl Prober {
    pub fn new(fetcher: PageFetcher, target: Arc<SeedTarget>) -> Self {
        Self { fetcher, target }
    }

    pub fn target(&self) -> &SeedTarget {
        &self.target
    }

    pub async fn probe(&self, candidate: &str) -> ProbeResult {
        if self.target.is_self_reference(candidate) {
            debug!("Skipping {}: refers to the seed itself", candidate);
            return ProbeResult::NoMatch;
        }

        match self.fetcher.fetch_text(candidate).await {
            Ok(markup) if self.target.is_referenced_by(&markup) => {
                debug!("{} links back to {}", candidate, self.target.url());
                ProbeResult::Match(candidate.to_string())
            }
            Ok(_) => {
                debug!("{} has no link back", candidate);
                ProbeResult::NoMatch
            }
            Err(e) => {
                warn!("Probe failed for {}: {}", candidate, e);
                ProbeResult::Failed(e.to_string())
            }
        }
    }
}
