//! Remote JSON collaborators. Production uses [`HttpJsonSource`]; tests plug
//! in their own [`RemoteSource`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Where the data comes from, for logs.
    fn origin(&self) -> &str;

    async fn fetch_json(&self) -> Result<Value, FetchError>;
}

/// GET a URL and decode the body as JSON. Non-2xx answers are failures.
#[derive(Debug, Clone)]
pub struct HttpJsonSource {
    client: reqwest::Client,
    url: String,
}

impl HttpJsonSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn default_client() -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .user_agent(concat!("tennohub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)
    }
}

#[async_trait]
impl RemoteSource for HttpJsonSource {
    fn origin(&self) -> &str {
        &self.url
    }

    async fn fetch_json(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| FetchError::Decode {
                url: self.url.clone(),
                source,
            })
    }
}
