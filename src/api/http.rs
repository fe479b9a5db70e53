//! Implements the `Source` trait with `reqwest` against the tracker backend.

use crate::api::{Collection, Source};
use crate::error::Res;
use crate::Config;
use anyhow::{bail, Context};
use tracing::trace;
use url::Url;

/// Reads collections with `GET {backend_url}/api/{collection}`.
pub(crate) struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub(crate) fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Unable to build the HTTP client")?;
        Ok(Self {
            client,
            base: config.backend_url().clone(),
        })
    }

    fn url(&self, collection: Collection) -> Res<Url> {
        self.base
            .join(collection.path())
            .with_context(|| format!("Unable to build the URL for {collection}"))
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    async fn get(&self, collection: Collection) -> Res<String> {
        let url = self.url(collection)?;
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("GET {url} failed with status {status}: {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read the response body of GET {url}"))?;
        trace!("GET {url} returned {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_collection_urls() {
        let env = TestEnv::with_backend_url("http://localhost:5000/tracker").await;
        let source = HttpSource::new(&env.config()).unwrap();
        assert_eq!(
            source.url(Collection::Income).unwrap().as_str(),
            "http://localhost:5000/tracker/api/income"
        );
        assert_eq!(
            source.url(Collection::Transaction).unwrap().as_str(),
            "http://localhost:5000/tracker/api/transaction"
        );
    }
}
