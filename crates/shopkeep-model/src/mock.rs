// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{CompletionRequest, CompletionResponse, Message, Role, ToolCallRequest, Usage};

/// Deterministic mock provider for offline runs.  Echoes the last user
/// message back as the assistant response.
#[derive(Default)]
pub struct MockProvider;

#[async_trait]
impl crate::ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<CompletionResponse> {
        let reply = req
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .and_then(|m| m.as_text())
            .unwrap_or("[no input]")
            .to_string();

        Ok(CompletionResponse {
            message: Message::assistant(format!("MOCK: {reply}")),
            usage: Usage { input_tokens: 10, output_tokens: 10 },
        })
    }
}

/// A pre-scripted mock provider.  Each call to `complete` pops the next
/// reply from the front of the queue.  This lets tests specify exact
/// replies – including tool calls – without network access.
pub struct ScriptedMockProvider {
    scripts: Arc<Mutex<Vec<Message>>>,
    /// Every `CompletionRequest` seen by this provider, in call order.
    /// Tests inspect it to check what was sent and how many calls were made.
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedMockProvider {
    /// Build a provider from an ordered list of assistant replies.
    pub fn new(scripts: Vec<Message>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience: provider that always returns a single text reply.
    pub fn always_text(reply: impl Into<String>) -> Self {
        Self::new(vec![Message::assistant(reply)])
    }

    /// Convenience: provider that returns a tool call followed by a text reply.
    pub fn tool_then_text(
        tool_id: impl Into<String>,
        tool_name: impl Into<String>,
        args_json: impl Into<String>,
        final_text: impl Into<String>,
    ) -> Self {
        Self::new(vec![
            // Round 1 – model emits a tool call
            Message::assistant_with_tool_calls(
                "",
                vec![ToolCallRequest::new(tool_id, tool_name, args_json)],
            ),
            // Round 2 – model responds after tool result
            Message::assistant(final_text),
        ])
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl crate::ModelProvider for ScriptedMockProvider {
    fn name(&self) -> &str {
        "scripted-mock"
    }
    fn model_name(&self) -> &str {
        "scripted-mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(req);
        let message = {
            let mut scripts = self.scripts.lock().unwrap();
            if scripts.is_empty() {
                // Default fallback when all scripts are consumed
                Message::assistant("[no more scripts]")
            } else {
                scripts.remove(0)
            }
        };
        Ok(CompletionResponse { message, usage: Usage::default() })
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelProvider;

    fn simple_req() -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::user("hi")],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn mock_echoes_last_user_message() {
        let p = MockProvider;
        let resp = p.complete(simple_req()).await.unwrap();
        assert_eq!(resp.message.as_text(), Some("MOCK: hi"));
    }

    #[tokio::test]
    async fn scripted_single_text_reply() {
        let p = ScriptedMockProvider::always_text("hello world");
        let resp = p.complete(simple_req()).await.unwrap();
        assert_eq!(resp.message.as_text(), Some("hello world"));
        assert_eq!(p.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_tool_then_text_two_rounds() {
        let p = ScriptedMockProvider::tool_then_text("call-1", "list_items", "{}", "done");

        let first = p.complete(simple_req()).await.unwrap();
        assert_eq!(first.message.tool_calls()[0].function.name, "list_items");

        let second = p.complete(simple_req()).await.unwrap();
        assert_eq!(second.message.as_text(), Some("done"));
        assert_eq!(p.call_count(), 2);
    }

    #[tokio::test]
    async fn scripted_records_requests() {
        let p = ScriptedMockProvider::always_text("ok");
        let mut req = simple_req();
        req.model = "gpt-test".into();
        p.complete(req).await.unwrap();
        let seen = p.requests.lock().unwrap();
        assert_eq!(seen[0].model, "gpt-test");
    }

    #[tokio::test]
    async fn scripted_fallback_when_scripts_exhausted() {
        let p = ScriptedMockProvider::new(vec![]);
        let resp = p.complete(simple_req()).await.unwrap();
        assert!(resp.message.as_text().unwrap().contains("no more scripts"));
    }
}
