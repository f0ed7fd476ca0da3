// Reachability checks run before a search

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONNECTIVITY_URL: &str = "https://google.com";

fn check_client(timeout: Duration) -> Option<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .ok()
}

/// True when `known_active_url` answers at all; only transport errors count as offline.
pub async fn connected_to_internet(known_active_url: &str, timeout: Duration) -> bool {
    let Some(client) = check_client(timeout) else {
        return false;
    };

    match client.get(known_active_url).send().await {
        Ok(response) => {
            debug!(
                "Connectivity check {} answered {}",
                known_active_url,
                response.status()
            );
            true
        }
        Err(e) => {
            debug!("Connectivity check {} failed: {}", known_active_url, e);
            false
        }
    }
}

/// True only when `url` can be fetched with a 200 response.
pub async fn url_is_active(url: &str, timeout: Duration) -> bool {
    let Some(client) = check_client(timeout) else {
        return false;
    };

    match client.get(url).send().await {
        Ok(response) => response.status().as_u16() == 200,
        Err(e) => {
            debug!("{} is not reachable: {}", url, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_connected_even_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(connected_to_internet(&server.uri(), TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_not_connected_when_unreachable() {
        assert!(!connected_to_internet("http://127.0.0.1:1/", TIMEOUT).await);
        assert!(!connected_to_internet("not a url", TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_url_is_active_requires_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/created"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        assert!(url_is_active(&format!("{}/ok", server.uri()), TIMEOUT).await);
        assert!(!url_is_active(&format!("{}/created", server.uri()), TIMEOUT).await);
        assert!(!url_is_active(&format!("{}/missing", server.uri()), TIMEOUT).await);
        assert!(!url_is_active("Random text", TIMEOUT).await);
    }
}
