// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use shopkeep_store::StoreError;
use thiserror::Error;

/// Failure while executing a tool call.  Every variant aborts the turn.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("could not render tool result: {0}")]
    Render(#[from] serde_json::Error),
}

impl ToolError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Failure while turning a tool signature into a model-facing schema.
/// Raised at registration time, before any conversation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("tool '{tool}': parameter '{param}' has unsupported type '{declared}'")]
    UnsupportedType { tool: String, param: String, declared: String },

    #[error("tool '{tool}': duplicate parameter '{param}'")]
    DuplicateParameter { tool: String, param: String },
}
