// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use shopkeep_tools::{SchemaError, ToolError};
use thiserror::Error;

/// Why a turn stopped before the model produced a final answer.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("model request failed: {0:#}")]
    Model(anyhow::Error),

    #[error("tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("transfer to unknown agent '{0}'")]
    UnknownAgent(String),
}

/// Invalid agent configuration, detected while building the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("agent '{agent}' lists unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },

    #[error("agent '{agent}' transfers to unknown agent '{target}'")]
    UnknownTransferTarget { agent: String, target: String },

    #[error("agent '{0}' is defined more than once")]
    DuplicateAgent(String),

    #[error("start agent '{0}' is not defined")]
    UnknownStartAgent(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
