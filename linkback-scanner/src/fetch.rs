use crate::error::{Result, ScanError};
use reqwest::Client;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "linkback/0.1 (https://github.com/trapdoorsec/linkback)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How response bodies are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid sequences fail the decode.
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD.
    Utf8Lossy,
    /// ISO-8859-1, every byte maps to one char.
    Latin1,
    /// 7-bit ASCII; any byte >= 0x80 fails the decode.
    Ascii,
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Utf8Lossy => Some(String::from_utf8_lossy(bytes).into_owned()),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| b as char).collect()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Lossy => "utf-8-lossy",
            TextEncoding::Latin1 => "iso-8859-1",
            TextEncoding::Ascii => "ascii",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-8-lossy" | "utf8-lossy" => Ok(TextEncoding::Utf8Lossy),
            "iso-8859-1" | "latin-1" | "latin1" => Ok(TextEncoding::Latin1),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            _ => Err(ScanError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Status and raw body of one GET.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

/// Shared HTTP client plus the text decoding used for every page of a run.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    encoding: TextEncoding,
}

impl PageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            encoding: TextEncoding::default(),
        })
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// GET `url`. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::classify_error(url, e))?;

        Ok(FetchedPage {
            url: url.to_string(),
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }

    /// GET `url` and decode the body with the configured encoding.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let page = self.fetch(url).await?;
        self.encoding
            .decode(&page.body)
            .ok_or_else(|| ScanError::Decode {
                url: url.to_string(),
                encoding: self.encoding.to_string(),
            })
    }

    fn classify_error(url: &str, error: reqwest::Error) -> ScanError {
        if error.is_timeout() {
            ScanError::Timeout(url.to_string())
        } else {
            ScanError::HttpError(error)
        }
    }
}
