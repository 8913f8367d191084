use anyhow::Context;
use async_trait::async_trait;

use super::CheckoutProvider;
use crate::models::CheckoutPayload;

pub struct HttpCheckoutProvider {
    url: String,
    client: reqwest::Client,
}

impl HttpCheckoutProvider {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CheckoutProvider for HttpCheckoutProvider {
    async fn submit(&self, payload: &CheckoutPayload) -> anyhow::Result<()> {
        if self.url.is_empty() {
            tracing::warn!("CHECKOUT_URL not configured, skipping checkout handoff");
            return Ok(());
        }

        self.client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .context("failed to reach checkout service")?
            .error_for_status()
            .context("checkout service returned error")?;

        Ok(())
    }
}
