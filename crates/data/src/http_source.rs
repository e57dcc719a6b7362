use crate::error::ProviderError;
use crate::provider::PoolSource;
use crate::request::CandidateRequest;
use crate::snapshot::PoolSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use sor_domain::entities::{Currency, Pool};
use tracing::debug;

/// Pool source reading [`PoolSnapshot`] documents from an HTTP endpoint.
///
/// The request is sent as `GET {url}?currencies=a,b,...&block=n`, where each
/// currency is its token address or `native`.
#[derive(Debug, Clone)]
pub struct HttpPoolSource {
    name: String,
    url: String,
    client: Client,
}

impl HttpPoolSource {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_client(name, url, Client::new())
    }

    #[must_use]
    pub fn with_client(name: impl Into<String>, url: impl Into<String>, client: Client) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn query(request: &CandidateRequest) -> Vec<(&'static str, String)> {
        let currencies = request
            .currencies()
            .into_iter()
            .map(currency_param)
            .collect::<Vec<_>>()
            .join(",");
        let mut query = vec![("currencies", currencies)];
        if let Some(block) = request.block {
            query.push(("block", block.0.to_string()));
        }
        query
    }
}

fn currency_param(currency: &Currency) -> String {
    currency.address().unwrap_or("native").to_string()
}

#[async_trait]
impl PoolSource for HttpPoolSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, request: &CandidateRequest) -> Result<Vec<Pool>, ProviderError> {
        let snapshot = self
            .client
            .get(&self.url)
            .query(&Self::query(request))
            .send()
            .await?
            .error_for_status()?
            .json::<PoolSnapshot>()
            .await?;

        let pools = snapshot.decode_pools(&self.name);
        debug!(
            source = %self.name,
            entries = snapshot.pools.len(),
            pools = pools.len(),
            "Decoded HTTP pool snapshot"
        );
        Ok(pools)
    }
}
