use std::future::Future;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

use crate::settings::Credentials;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Anything that can hand out the markup of an overview page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Overview pages from the sked server, behind HTTP basic auth.
pub struct SkedClient {
    client: reqwest::Client,
    credentials: Credentials,
}

impl SkedClient {
    pub fn new(credentials: Credentials) -> Self {
        SkedClient {
            client: reqwest::Client::new(),
            credentials,
        }
    }
}

impl PageSource for SkedClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching overview page: {}", url);
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.pass))
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().await.map_err(transport)?;
        debug!(url, bytes = body.len(), "Fetched overview page");
        Ok(body)
    }
}
