use serde::Serialize;

/// Outcome of probing a single candidate page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ProbeResult {
    /// The candidate's markup contains the seed's back-reference marker.
    Match(String),
    NoMatch,
    /// Fetch, status, decode or timeout failure. Never surfaced as a match.
    Failed(String),
}

impl ProbeResult {
    pub fn is_match(&self) -> bool {
        matches!(self, ProbeResult::Match(_))
    }

    pub fn into_match(self) -> Option<String> {
        match self {
            ProbeResult::Match(url) => Some(url),
            _ => None,
        }
    }
}
