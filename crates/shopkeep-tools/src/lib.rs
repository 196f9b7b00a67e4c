// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod error;
pub mod ops;
mod registry;
pub mod schema;
mod tool;

pub use error::{SchemaError, ToolError};
pub use registry::ToolRegistry;
pub use schema::{function_to_schema, ParamSpec, ToolSchema, ToolSignature};
pub use tool::{transfer_tool_name, ShopOperation, ToolCall, ToolKind, ToolOutcome};
