use crate::error::{Result, ScanError};
use crate::normalize::Origin;
use url::Url;

/// True when `candidate` is the seed itself or either string contains the other.
pub fn is_self_reference(seed_url: &str, candidate: &str) -> bool {
    candidate == seed_url || candidate.contains(seed_url) || seed_url.contains(candidate)
}

/// The URL as `Url` serializes it: percent-encoded, dot segments removed.
pub fn canonical_form(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|parsed| parsed.as_str().to_string())
}

/// `is_self_reference` over the written and canonical forms of both URLs.
pub fn refers_to_seed(seed_url: &str, candidate: &str) -> bool {
    let seeds = [Some(seed_url.to_string()), canonical_form(seed_url)];
    let candidates = [Some(candidate.to_string()), canonical_form(candidate)];

    seeds.iter().flatten().any(|seed| {
        candidates
            .iter()
            .flatten()
            .any(|candidate| is_self_reference(seed, candidate))
    })
}

/// The page whose backlinks are being searched for. Fixed for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTarget {
    url: String,
    canonical_url: String,
    origin: Origin,
    marker: String,
}

impl SeedTarget {
    /// Parse `seed_url` and derive its back-reference marker.
    ///
    /// The marker is the URL path. A bare host (`/`) would match nearly any
    /// page, so for those the marker falls back to `scheme://netloc`.
    pub fn parse(seed_url: &str) -> Result<Self> {
        let parsed = Url::parse(seed_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "{}: only http and https seeds are supported",
                seed_url
            )));
        }

        let origin = Origin::from_url(&parsed)
            .ok_or_else(|| ScanError::InvalidUrl(format!("{}: URL has no host", seed_url)))?;

        let marker = match parsed.path() {
            "" | "/" => format!("{}://{}", origin.scheme, origin.netloc),
            path => path.to_string(),
        };

        Ok(Self {
            url: seed_url.to_string(),
            canonical_url: parsed.as_str().to_string(),
            origin,
            marker,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Text that must appear verbatim in a page for it to count as linking back.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn is_self_reference(&self, candidate: &str) -> bool {
        refers_to_seed(&self.url, candidate)
    }

    pub fn is_referenced_by(&self, markup: &str) -> bool {
        markup.contains(&self.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_path() {
        let seed = SeedTarget::parse("https://en.wikipedia.org/wiki/Israel").unwrap();
        assert_eq!(seed.marker(), "/wiki/Israel");
        assert_eq!(seed.origin(), &Origin::new("https", "en.wikipedia.org"));
        assert_eq!(seed.url(), "https://en.wikipedia.org/wiki/Israel");
    }

    #[test]
    fn test_marker_keeps_percent_encoding() {
        let seed =
            SeedTarget::parse("https://he.wikipedia.org/wiki/%D7%99%D7%A9%D7%A8%D7%90%D7%9C")
                .unwrap();
        assert_eq!(seed.marker(), "/wiki/%D7%99%D7%A9%D7%A8%D7%90%D7%9C");
    }

    #[test]
    fn test_marker_excludes_query_and_fragment() {
        let seed = SeedTarget::parse("https://example.com/docs/page?x=1#top").unwrap();
        assert_eq!(seed.marker(), "/docs/page");
    }

    #[test]
    fn test_bare_host_marker_falls_back_to_origin() {
        let seed = SeedTarget::parse("http://127.0.0.1:9000").unwrap();
        assert_eq!(seed.marker(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_rejects_invalid_seeds() {
        assert!(matches!(
            SeedTarget::parse("not a url"),
            Err(ScanError::InvalidUrl(_))
        ));
        assert!(matches!(
            SeedTarget::parse("ftp://example.com/file"),
            Err(ScanError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_self_reference() {
        let seed = "https://en.wikipedia.org/wiki/Israel";
        assert!(is_self_reference(seed, seed));
        assert!(is_self_reference(seed, "https://en.wikipedia.org/wiki/Israel#History"));
        assert!(is_self_reference(seed, "https://en.wikipedia.org/wiki"));
        assert!(!is_self_reference(seed, "https://en.wikipedia.org/wiki/Egypt"));
    }

    #[test]
    fn test_non_canonical_seed_matches_its_canonical_links() {
        let seed = SeedTarget::parse("http://127.0.0.1:8080/wiki/Café").unwrap();
        assert_eq!(seed.canonical_url(), "http://127.0.0.1:8080/wiki/Caf%C3%A9");
        assert_eq!(seed.marker(), "/wiki/Caf%C3%A9");
        assert!(seed.is_self_reference("http://127.0.0.1:8080/wiki/Caf%C3%A9"));

        let dotted = SeedTarget::parse("https://en.wikipedia.org/wiki/./Israel").unwrap();
        assert_eq!(dotted.canonical_url(), "https://en.wikipedia.org/wiki/Israel");
        assert!(dotted.is_self_reference("https://en.wikipedia.org/wiki/Israel"));
        assert!(dotted.is_self_reference("https://en.wikipedia.org/wiki/../wiki/Israel"));
        assert!(!dotted.is_self_reference("https://en.wikipedia.org/wiki/Egypt"));
    }

    #[test]
    fn test_refers_to_seed_canonicalizes_candidate() {
        assert!(refers_to_seed(
            "https://example.com/docs/page",
            "https://EXAMPLE.com/docs/./page"
        ));
        assert!(!refers_to_seed("https://example.com/docs/page", "not a url"));
    }

    #[test]
    fn test_is_referenced_by() {
        let seed = SeedTarget::parse("https://en.wikipedia.org/wiki/Israel").unwrap();
        assert!(seed.is_referenced_by(r#"<a href="/wiki/Israel">Israel</a>"#));
        assert!(!seed.is_referenced_by(r#"<a href="/wiki/Iron_Age">Iron Age</a>"#));
    }
}
