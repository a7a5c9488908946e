use std::time::Duration;

use anyhow::Context;
use checkout_types::domain::quote::QuoteId;
use checkout_types::domain::totals::{TotalsInformation, TotalsSnapshot};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct CheckoutClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

/// Thin client for the totals estimate endpoints.
#[derive(Clone)]
pub struct CheckoutClient {
    base: Url,
    client: reqwest::Client,
}

impl CheckoutClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<CheckoutClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(CheckoutClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn health(&self) -> anyhow::Result<HealthResponse> {
        let res = self
            .client
            .get(self.url("health")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn estimate_totals(
        &self,
        cart_id: QuoteId,
        info: &TotalsInformation,
    ) -> anyhow::Result<TotalsSnapshot> {
        tracing::debug!(%cart_id, "requesting totals estimate");
        let res = self
            .client
            .post(self.url(&format!("carts/{cart_id}/totals-information"))?)
            .json(info)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn estimate_guest_totals(
        &self,
        masked_id: &str,
        info: &TotalsInformation,
    ) -> anyhow::Result<TotalsSnapshot> {
        let res = self
            .client
            .post(self.url(&format!("guest-carts/{masked_id}/totals-information"))?)
            .json(info)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

impl CheckoutClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn build(self) -> anyhow::Result<CheckoutClient> {
        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(CheckoutClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}
