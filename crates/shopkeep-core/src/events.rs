// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use shopkeep_tools::ToolCall;

/// Events emitted while a turn runs.
/// The REPL subscribes to these to print progress as it happens.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Non-empty text from the model, attributed to the agent that was
    /// active when it was produced
    AssistantText { agent: String, text: String },
    /// A tool call is about to run
    ToolCallStarted { agent: String, call: ToolCall },
    /// A tool call finished; `output` is exactly what the model will see
    ToolCallFinished {
        call_id: String,
        tool_name: String,
        output: String,
    },
    /// The conversation was handed to another agent
    AgentTransferred { from: String, to: String },
    /// The model answered without further tool calls
    TurnComplete,
}
