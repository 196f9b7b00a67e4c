// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Tool signature → JSON-schema conversion.
//!
//! A tool is described by a [`ToolSignature`]: its name, a documentation
//! string and its parameters with their declared Rust types.  The
//! documentation is split into a summary (everything before an `Args:` line)
//! and per-parameter descriptions taken from `name (type): text` lines inside
//! the `Args:` block.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::SchemaError;

/// A tool schema as handed to the model.  Mirrors the model crate's type but
/// keeps the tools crate independent from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    /// Rust type as written in the signature, e.g. `&str`, `i64`, `Option<bool>`.
    pub declared_type: String,
    /// A parameter with a default value is never required.
    pub has_default: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self { name: name.into(), declared_type: declared_type.into(), has_default: false }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// Everything needed to describe a callable tool to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSignature {
    pub name: String,
    pub doc: String,
    pub params: Vec<ParamSpec>,
}

/// Build the model-facing schema for `sig`.
///
/// The result has the shape
/// `{name, description, parameters: {type: "object", properties, required}}`
/// where `required` lists, in declaration order, every parameter that is
/// neither `Option<_>` nor defaulted.
pub fn function_to_schema(sig: &ToolSignature) -> Result<ToolSchema, SchemaError> {
    let doc = DocSections::parse(&sig.doc);

    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &sig.params {
        let (json_type, optional) = json_type_for(&param.declared_type).ok_or_else(|| {
            SchemaError::UnsupportedType {
                tool: sig.name.clone(),
                param: param.name.clone(),
                declared: param.declared_type.clone(),
            }
        })?;

        if properties.contains_key(&param.name) {
            return Err(SchemaError::DuplicateParameter {
                tool: sig.name.clone(),
                param: param.name.clone(),
            });
        }

        let description = doc.params.get(&param.name).cloned().unwrap_or_default();
        properties.insert(
            param.name.clone(),
            json!({ "type": json_type, "description": description }),
        );

        if !optional && !param.has_default {
            required.push(Value::String(param.name.clone()));
        }
    }

    Ok(ToolSchema {
        name: sig.name.clone(),
        description: doc.summary,
        parameters: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    })
}

/// Map a declared Rust type to its JSON-schema type.  The boolean is `true`
/// when the type is an `Option`, which makes the parameter optional.
fn json_type_for(declared: &str) -> Option<(&'static str, bool)> {
    let declared = declared.trim();
    if let Some(inner) = declared
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return json_type_for(inner).map(|(t, _)| (t, true));
    }

    let json_type = match declared {
        "String" | "&str" | "str" | "&'static str" => "string",
        "int" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
        | "u64" | "u128" | "usize" => "integer",
        "f32" | "f64" | "float" => "number",
        "bool" => "boolean",
        _ => return None,
    };
    Some((json_type, false))
}

/// Summary and `Args:` descriptions extracted from a tool's documentation.
#[derive(Debug, Default)]
struct DocSections {
    summary: String,
    params: HashMap<String, String>,
}

impl DocSections {
    fn parse(doc: &str) -> Self {
        let mut summary_lines = Vec::new();
        let mut params: HashMap<String, String> = HashMap::new();
        let mut in_args = false;
        let mut current: Option<String> = None;

        for line in doc.lines() {
            let trimmed = line.trim();

            if !in_args {
                if trimmed == "Args:" {
                    in_args = true;
                } else {
                    summary_lines.push(trimmed);
                }
                continue;
            }

            if trimmed.is_empty() {
                continue;
            }
            // Another section header (`Returns:`, `Raises:`) closes the block.
            if is_section_header(trimmed) {
                break;
            }

            match parse_param_line(trimmed) {
                Some((name, text)) => {
                    params.insert(name.to_string(), text.to_string());
                    current = Some(name.to_string());
                }
                None => {
                    // Continuation of the previous parameter's description.
                    if let Some(desc) = current.as_ref().and_then(|n| params.get_mut(n)) {
                        if !desc.is_empty() {
                            desc.push(' ');
                        }
                        desc.push_str(trimmed);
                    }
                }
            }
        }

        Self { summary: summary_lines.join("\n").trim().to_string(), params }
    }
}

fn is_section_header(line: &str) -> bool {
    line.ends_with(':') && !line.contains(' ') && !line.contains('(')
}

/// Parse `name (type): text`.  The type annotation is informational only.
fn parse_param_line(line: &str) -> Option<(&str, &str)> {
    let (head, text) = line.split_once(':')?;
    let (name, annotation) = head.split_once('(')?;
    if !annotation.trim_end().ends_with(')') {
        return None;
    }
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, text.trim()))
}
