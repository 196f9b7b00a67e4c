use async_trait::async_trait;

use crate::{CompletionRequest, CompletionResponse};

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Model used when a request does not name one.
    fn model_name(&self) -> &str;

    /// Send a completion request and wait for the full reply.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<CompletionResponse>;
}
