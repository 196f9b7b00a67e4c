use serde::{Deserialize, Serialize};

// ─── Message types ────────────────────────────────────────────────────────────

/// A single message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self { role: Role::System, content: MessageContent::Text(text.into()) }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, content: MessageContent::Text(text.into()) }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: MessageContent::Text(text.into()) }
    }

    /// An assistant reply that requests tool calls.  `text` may be empty.
    ///
    /// Falls back to a plain text message when `calls` is empty so that a
    /// message with tool calls always carries at least one.
    pub fn assistant_with_tool_calls(text: impl Into<String>, calls: Vec<ToolCallRequest>) -> Self {
        let text = text.into();
        let content = if calls.is_empty() {
            MessageContent::Text(text)
        } else {
            MessageContent::ToolCalls { text, calls }
        };
        Self { role: Role::Assistant, content }
    }

    pub fn tool_result(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::ToolResult {
                tool_call_id: id.into(),
                content: content.into(),
            },
        }
    }

    /// Return the plain text of this message, if it has any.
    ///
    /// Tool results are not text in this sense; use [`MessageContent`]
    /// directly to read them.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(t) => Some(t),
            MessageContent::ToolCalls { text, .. } if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Tool calls requested by this message, in the order the model issued them.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match &self.content {
            MessageContent::ToolCalls { calls, .. } => calls,
            _ => &[],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// The content of a message.
///
/// - `Text` – simple string (most messages)
/// - `ToolCalls` – the assistant requests one or more tool invocations,
///   optionally with accompanying text
/// - `ToolResult` – the result of a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    ToolCalls {
        #[serde(default)]
        text: String,
        calls: Vec<ToolCallRequest>,
    },
    ToolResult {
        tool_call_id: String,
        content: String,
    },
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Opaque identifier chosen by the model; echoed in the tool result.
    pub id: String,
    pub function: FunctionCall,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            function: FunctionCall { name: name.into(), arguments: arguments.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

/// A tool schema provided to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema of the parameters object
    pub parameters: serde_json::Value,
}

/// Request sent to a model provider.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Model identifier.  Empty means "the provider's configured model".
    pub model: String,
    pub messages: Vec<Message>,
    /// Tools the model may call.  Empty means no `tools` field is sent.
    pub tools: Vec<ToolSchema>,
}

/// The model's reply to one [`CompletionRequest`].
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Always an assistant message.
    pub message: Message,
    pub usage: Usage,
}

/// Token usage from one completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
