pub mod http;

use async_trait::async_trait;

use crate::models::CheckoutPayload;

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn submit(&self, payload: &CheckoutPayload) -> anyhow::Result<()>;
}
