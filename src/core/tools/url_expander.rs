// src/core/tools/url_expander.rs

use crate::config::ConfigError;
use crate::core::reputation::validator::parse_absolute_url;
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::{error, info};

const MAX_REDIRECTS: usize = 10;

/// Follows redirects of shortened links to reveal where they land.
pub struct UrlExpander {
    client: Client,
}

impl UrlExpander {
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(concat!("SentinelRS/", env!("CARGO_PKG_VERSION")))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    /// Returns the final URL after all redirects.
    ///
    /// An error status on the final hop counts as a failure, as does any
    /// transport error or a too-long redirect chain.
    pub async fn expand(&self, short_url: &str) -> Result<String, String> {
        info!(short_url = short_url, "Expanding URL.");

        let url = parse_absolute_url(short_url)
            .ok_or_else(|| "Invalid URL. Verify that the format is correct.".to_string())?;

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(short_url = short_url, error = %e, "URL expansion request failed.");
            format!("Could not reach {}: {}", short_url, e)
        })?;

        let response = response.error_for_status().map_err(|e| {
            error!(short_url = short_url, error = %e, "URL expansion ended on an error status.");
            format!("The link leads to an error page: {}", e)
        })?;

        let expanded = response.url().to_string();
        info!(short_url = short_url, expanded = %expanded, "URL expanded.");
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn expander() -> UrlExpander {
        UrlExpander::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn follows_redirect_chain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/s/abc"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/hop"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hop"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/final/page"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/final/page"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let expanded = expander().expand(&format!("{}/s/abc", server.uri())).await.unwrap();
        assert_eq!(expanded, format!("{}/final/page", server.uri()));
    }

    #[tokio::test]
    async fn link_without_redirect_expands_to_itself() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/plain", server.uri());
        assert_eq!(expander().expand(&url).await.unwrap(), url);
    }

    #[tokio::test]
    async fn dead_end_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(expander().expand(&format!("{}/gone", server.uri())).await.is_err());
    }

    #[tokio::test]
    async fn malformed_input_is_an_error() {
        let err = expander().expand("bit.ly/abc").await.unwrap_err();
        assert!(err.starts_with("Invalid URL"));
    }
}
