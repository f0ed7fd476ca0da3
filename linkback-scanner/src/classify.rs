use crate::target::refers_to_seed;
use serde::Serialize;
use url::Url;

/// Restricts candidates to one host family and, optionally, one path namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRestriction {
    /// Matches the host itself and any subdomain of it.
    pub host_suffix: String,
    pub path_prefix: Option<String>,
}

impl DomainRestriction {
    pub fn new(host_suffix: impl Into<String>) -> Self {
        Self {
            host_suffix: host_suffix.into().to_ascii_lowercase(),
            path_prefix: None,
        }
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    fn allows(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        // hosts from `Url` are already lowercase
        let suffix = self.host_suffix.trim_start_matches('.').to_ascii_lowercase();
        let host_ok = host == suffix || host.ends_with(&format!(".{}", suffix));

        let path_ok = self
            .path_prefix
            .as_deref()
            .map(|prefix| url.path().starts_with(prefix))
            .unwrap_or(true);

        host_ok && path_ok
    }
}

/// Which URLs count as pages worth probing, beyond the fixed scheme/file/self rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PagePolicy {
    pub domain: Option<DomainRestriction>,
    pub exclude_query: bool,
}

impl PagePolicy {
    /// HTTP(S) page, not a file, not the seed.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Wikipedia articles only: `*.wikipedia.org/wiki/...` without query strings.
    pub fn wiki() -> Self {
        Self {
            domain: Some(DomainRestriction::new("wikipedia.org").with_path_prefix("/wiki/")),
            exclude_query: true,
        }
    }

    pub fn with_domain(mut self, restriction: DomainRestriction) -> Self {
        self.domain = Some(restriction);
        self
    }

    pub fn with_exclude_query(mut self, exclude: bool) -> Self {
        self.exclude_query = exclude;
        self
    }

    fn allows(&self, url: &Url) -> bool {
        if self.exclude_query && url.query().is_some() {
            return false;
        }
        self.domain
            .as_ref()
            .map(|restriction| restriction.allows(url))
            .unwrap_or(true)
    }
}

/// True when the URL's last path segment carries a file extension.
///
/// `.html` pages are not files. Trailing slashes are ignored, so
/// `/en/latest/` is judged by `latest`.
pub fn is_file_url(url: &str) -> bool {
    if url.ends_with(".html") {
        return false;
    }

    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };

    let name = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or("");

    if name.ends_with(".html") {
        return false;
    }

    match name.rfind('.') {
        Some(idx) => idx > 0 && idx + 1 < name.len(),
        None => false,
    }
}

/// An absolute http(s) URL with a host that does not point at a file.
pub fn is_web_page(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| !host.is_empty())
                && !is_file_url(url)
        }
        Err(_) => false,
    }
}

/// Decides which normalized candidates of one seed get probed.
#[derive(Debug, Clone)]
pub struct PageClassifier {
    seed_url: String,
    policy: PagePolicy,
}

impl PageClassifier {
    pub fn new(seed_url: impl Into<String>, policy: PagePolicy) -> Self {
        Self {
            seed_url: seed_url.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &PagePolicy {
        &self.policy
    }

    pub fn is_page_like(&self, url: &str) -> bool {
        if !is_web_page(url) || refers_to_seed(&self.seed_url, url) {
            return false;
        }
        Url::parse(url)
            .map(|parsed| self.policy.allows(&parsed))
            .unwrap_or(false)
    }
}
