// src/core/probe/http.rs

use super::HttpProbe;
use crate::core::error::Result;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;

/// HTTP probe on a shared `reqwest` client.
///
/// Redirects are never followed: a 3xx answer is itself the finding.
pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn status(&self, url: &str) -> std::result::Result<u16, String> {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(url, status, "Probe answered.");
                Ok(status)
            }
            Err(e) => {
                debug!(url, error = %e, "Probe request failed.");
                Err(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn redirect_is_reported_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let probe = ReqwestProbe::new(Duration::from_secs(5), "test").unwrap();
        let status = probe.status(&format!("{}/old", server.uri())).await.unwrap();
        assert_eq!(status, 301);
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let probe = ReqwestProbe::new(Duration::from_secs(1), "test").unwrap();
        // Port 9 (discard) on loopback is closed on any sane test host.
        assert!(probe.status("http://127.0.0.1:9/").await.is_err());
    }
}
