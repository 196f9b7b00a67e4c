// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;

use shopkeep_store::Store;
use tracing::debug;

use crate::schema::{function_to_schema, ToolSchema};
use crate::{SchemaError, ShopOperation, ToolCall, ToolError, ToolKind, ToolOutcome};

#[derive(Debug)]
struct RegisteredTool {
    kind: ToolKind,
    schema: ToolSchema,
}

/// Central registry holding every callable tool.
///
/// Schemas are generated once at registration.  Dispatch by name covers all
/// registered tools, regardless of which agent currently holds the
/// conversation.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// A registry holding the four shop operations.
    pub fn with_operations() -> Result<Self, SchemaError> {
        let mut reg = Self::new();
        for op in ShopOperation::ALL {
            reg.register(ToolKind::Operation(op))?;
        }
        Ok(reg)
    }

    /// Register `kind` and return its tool name.  Re-registering a name
    /// replaces the earlier entry.
    pub fn register(&mut self, kind: ToolKind) -> Result<String, SchemaError> {
        let schema = function_to_schema(&kind.signature())?;
        let name = schema.name.clone();
        debug!(tool = %name, "registered tool");
        self.tools.insert(name.clone(), RegisteredTool { kind, schema });
        Ok(name)
    }

    /// Register the `transfer_to_<target>` tool and return its name.
    pub fn register_transfer(&mut self, target: &str) -> Result<String, SchemaError> {
        self.register(ToolKind::Transfer { target: target.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Schemas for `names`, in the given order.  Unknown names are skipped.
    pub fn schemas_for<S: AsRef<str>>(&self, names: &[S]) -> Vec<ToolSchema> {
        names
            .iter()
            .filter_map(|n| self.tools.get(n.as_ref()))
            .map(|t| t.schema.clone())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Dispatch `call` by name.
    pub fn execute(&self, store: &Store, call: &ToolCall) -> Result<ToolOutcome, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

        debug!(tool = %call.name, call_id = %call.id, "executing tool");
        match &tool.kind {
            ToolKind::Operation(op) => op.execute(store, &call.args).map(ToolOutcome::Data),
            ToolKind::Transfer { target } => Ok(ToolOutcome::Transfer(target.clone())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self { Self::new() }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
