// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! OpenAI chat-completions driver.
//!
//! Speaks the non-streaming `/chat/completions` wire format, so it also works
//! against any OpenAI-compatible server reachable through `base_url`.

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    CompletionRequest, CompletionResponse, Message, MessageContent, Role, ToolCallRequest, Usage,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions driver.
pub struct OpenAiProvider {
    /// Model id used when the request does not name one.
    model: String,
    /// API key (pre-resolved from config or env).
    api_key: Option<String>,
    /// Full chat completions URL, e.g. `https://api.openai.com/v1/chat/completions`.
    chat_url: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        model: String,
        api_key: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Self {
        let base = base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
        Self {
            model,
            api_key,
            chat_url: format!("{base}/chat/completions"),
            max_tokens,
            temperature,
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, req: &CompletionRequest) -> Value {
        let model = if req.model.is_empty() { &self.model } else { &req.model };
        let mut body = json!({
            "model": model,
            "messages": build_openai_messages(&req.messages),
        });
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        if !req.tools.is_empty() {
            let tools: Vec<Value> = req.tools.iter().map(|t| json!({
                "type": "function",
                "function": {
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.parameters,
                }
            })).collect();
            body["tools"] = json!(tools);
        }
        body
    }
}

#[async_trait]
impl crate::ModelProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<CompletionResponse> {
        let body = self.request_body(&req);

        debug!(
            model = %body["model"],
            tool_count = req.tools.len(),
            message_count = req.messages.len(),
            "sending completion request"
        );
        tracing::trace!(request_body = %body, "full completion request");

        let key = self.api_key.as_deref()
            .context("API key not set; provide api_key or api_key_env in config")?;

        let resp = self.client
            .post(&self.chat_url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("openai error {status}: {text}");
        }

        let payload: Value = resp.json().await.context("decoding openai response")?;
        parse_completion(&payload)
    }
}

/// Convert a slice of [`Message`]s into the OpenAI wire-format JSON array.
pub(crate) fn build_openai_messages(messages: &[Message]) -> Vec<Value> {
    messages.iter().map(|m| match &m.content {
        MessageContent::Text(t) => json!({
            "role": m.role.as_str(),
            "content": t,
        }),
        MessageContent::ToolCalls { text, calls } => {
            let calls: Vec<Value> = calls.iter().map(|c| json!({
                "id": c.id,
                "type": "function",
                "function": {
                    "name": c.function.name,
                    "arguments": c.function.arguments,
                }
            })).collect();
            // OpenAI wants `null` rather than "" when only tool calls are present.
            let content = if text.is_empty() { Value::Null } else { json!(text) };
            json!({ "role": "assistant", "content": content, "tool_calls": calls })
        }
        MessageContent::ToolResult { tool_call_id, content } => json!({
            "role": "tool",
            "tool_call_id": tool_call_id,
            "content": content,
        }),
    }).collect()
}

/// Extract the assistant message and usage from a chat-completions response.
pub(crate) fn parse_completion(v: &Value) -> anyhow::Result<CompletionResponse> {
    let message = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .context("response has no choices[0].message")?;

    let text = message["content"].as_str().unwrap_or("").to_string();

    let mut calls = Vec::new();
    if let Some(tool_calls) = message.get("tool_calls").and_then(Value::as_array) {
        for tc in tool_calls {
            let id = tc["id"].as_str().context("tool call without id")?;
            let name = tc["function"]["name"].as_str().context("tool call without function name")?;
            let arguments = tc["function"]["arguments"].as_str().unwrap_or("");
            calls.push(ToolCallRequest::new(id, name, arguments));
        }
    }

    let usage = v.get("usage").filter(|u| !u.is_null()).map(|u| Usage {
        input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        output_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
    }).unwrap_or_default();

    let message = Message::assistant_with_tool_calls(text, calls);
    debug_assert_eq!(message.role, Role::Assistant);
    Ok(CompletionResponse { message, usage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelProvider, ToolSchema};

    fn make_provider() -> OpenAiProvider {
        OpenAiProvider::new(
            "test-model".into(),
            None,
            Some("http://localhost:9999/v1".into()),
            Some(256),
            Some(0.0),
        )
    }

    #[test]
    fn model_name_returns_model() {
        let p = make_provider();
        assert_eq!(p.model_name(), "test-model");
    }

    #[test]
    fn chat_url_appends_path() {
        let p = make_provider();
        assert_eq!(p.chat_url, "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn base_url_trailing_slash_stripped() {
        let p = OpenAiProvider::new("m".into(), None, Some("http://localhost:1234/v1/".into()), None, None);
        assert_eq!(p.chat_url, "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn default_base_url_is_openai() {
        let p = OpenAiProvider::new("m".into(), None, None, None, None);
        assert_eq!(p.chat_url, "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn request_model_overrides_default() {
        let p = make_provider();
        let body = p.request_body(&CompletionRequest {
            model: "gpt-4o".into(),
            messages: vec![Message::user("hi")],
            tools: vec![],
        });
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn empty_tool_list_omits_tools_field() {
        let p = make_provider();
        let body = p.request_body(&CompletionRequest {
            messages: vec![Message::user("hi")],
            ..Default::default()
        });
        assert_eq!(body["model"], "test-model");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn tools_are_wrapped_as_functions() {
        let p = make_provider();
        let body = p.request_body(&CompletionRequest {
            messages: vec![Message::user("hi")],
            tools: vec![ToolSchema {
                name: "list_items".into(),
                description: "List items.".into(),
                parameters: json!({ "type": "object", "properties": {}, "required": [] }),
            }],
            ..Default::default()
        });
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "list_items");
    }

    // ── build_openai_messages ─────────────────────────────────────────────────

    #[test]
    fn tool_call_message_has_null_content_and_calls() {
        let msgs = vec![Message::assistant_with_tool_calls(
            "",
            vec![
                ToolCallRequest::new("c1", "list_items", "{}"),
                ToolCallRequest::new("c2", "find_order", r#"{"username":"ann","item_id":2}"#),
            ],
        )];
        let wire = build_openai_messages(&msgs);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0]["role"], "assistant");
        assert!(wire[0]["content"].is_null());
        assert_eq!(wire[0]["tool_calls"][0]["id"], "c1");
        assert_eq!(wire[0]["tool_calls"][1]["function"]["name"], "find_order");
    }

    #[test]
    fn tool_result_carries_call_id() {
        let wire = build_openai_messages(&[Message::tool_result("c1", "[]")]);
        assert_eq!(wire[0]["role"], "tool");
        assert_eq!(wire[0]["tool_call_id"], "c1");
        assert_eq!(wire[0]["content"], "[]");
    }

    #[test]
    fn text_messages_keep_roles() {
        let wire = build_openai_messages(&[
            Message::system("be brief"),
            Message::user("hello"),
            Message::assistant("hi"),
        ]);
        let roles: Vec<&str> = wire.iter().map(|m| m["role"].as_str().unwrap()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    // ── parse_completion ──────────────────────────────────────────────────────

    #[test]
    fn parse_plain_text_reply() {
        let v = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello!" } }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
        });
        let resp = parse_completion(&v).unwrap();
        assert_eq!(resp.message.as_text(), Some("Hello!"));
        assert!(!resp.message.has_tool_calls());
        assert_eq!(resp.usage, Usage { input_tokens: 12, output_tokens: 3 });
    }

    #[test]
    fn parse_tool_call_reply() {
        let v = json!({
            "choices": [{ "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    { "id": "call_1", "type": "function",
                      "function": { "name": "create_order",
                                    "arguments": "{\"username\":\"ann\",\"item_id\":1,\"quantity\":2}" } }
                ]
            } }]
        });
        let resp = parse_completion(&v).unwrap();
        let calls = resp.message.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].function.name, "create_order");
        assert!(calls[0].function.arguments.contains("\"quantity\":2"));
        assert_eq!(resp.usage, Usage::default());
    }

    #[test]
    fn parse_rejects_missing_choices() {
        assert!(parse_completion(&json!({ "error": "nope" })).is_err());
    }
}
