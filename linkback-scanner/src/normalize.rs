use std::collections::HashSet;
use url::{ParseError, Url};

/// Scheme and network location of the page references are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub scheme: String,
    pub netloc: String,
}

impl Origin {
    pub fn new(scheme: impl Into<String>, netloc: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            netloc: netloc.into(),
        }
    }

    /// `host[:port]` of `url`. Default ports are omitted, as `Url` drops them.
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        let netloc = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Some(Self::new(url.scheme(), netloc))
    }
}

/// Turn a raw href into an absolute URL rooted at `origin`.
///
/// Absolute references come back byte-for-byte. References that fail to parse
/// for any reason other than being relative are also returned untouched; the
/// classifier decides whether they are usable.
pub fn normalize_reference(reference: &str, origin: &Origin) -> String {
    if let Some(rest) = reference.strip_prefix("//") {
        return format!("{}://{}", origin.scheme, rest);
    }

    match Url::parse(reference) {
        Ok(_) => reference.to_string(),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let separator = match reference.chars().next() {
                Some('/') | Some('?') | Some('#') => "",
                _ => "/",
            };
            format!(
                "{}://{}{}{}",
                origin.scheme, origin.netloc, separator, reference
            )
        }
        Err(_) => reference.to_string(),
    }
}

/// References that only point inside the page they appear on.
pub fn is_in_page_reference(reference: &str) -> bool {
    let trimmed = reference.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Normalize each distinct raw reference once, dropping in-page anchors.
///
/// Output holds distinct absolute URLs in first-seen order.
pub fn normalize_all<I, S>(references: I, origin: &Origin) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen_raw = HashSet::new();
    let mut seen_normalized = HashSet::new();
    let mut normalized = Vec::new();

    for reference in references {
        let reference = reference.as_ref();
        if is_in_page_reference(reference) || !seen_raw.insert(reference.to_string()) {
            continue;
        }

        let absolute = normalize_reference(reference, origin);
        if seen_normalized.insert(absolute.clone()) {
            normalized.push(absolute);
        }
    }

    normalized
}
