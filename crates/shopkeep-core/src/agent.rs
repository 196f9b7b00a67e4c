// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

/// A named persona: system prompt, model and the tools it may call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
    /// Model id sent with every request made while this agent is active.
    pub model: String,
    /// Tool names offered to the model, in order.  Includes the agent's
    /// `transfer_to_<name>` tools.
    pub tools: Vec<String>,
}
