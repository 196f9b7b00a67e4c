// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::Deserialize;
use serde_json::Value;

use shopkeep_store::Store;

use crate::schema::{ParamSpec, ToolSignature};
use crate::{ops, ToolError};

/// A single tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Opaque identifier returned by the model (forwarded verbatim)
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments
    pub args: Value,
}

impl ToolCall {
    /// Build a call from the model's raw JSON argument string.
    ///
    /// An empty (or all-whitespace) string is read as `{}`; anything that is
    /// not a JSON object fails with [`ToolError::InvalidArguments`].
    pub fn from_raw(
        id: impl Into<String>,
        name: impl Into<String>,
        raw_args: &str,
    ) -> Result<Self, ToolError> {
        let name = name.into();
        let args = if raw_args.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str::<Value>(raw_args).map_err(|e| ToolError::InvalidArguments {
                tool: name.clone(),
                message: e.to_string(),
            })?
        };
        if !args.is_object() {
            return Err(ToolError::InvalidArguments {
                tool: name,
                message: "arguments must be a JSON object".into(),
            });
        }
        Ok(Self { id: id.into(), name, args })
    }
}

/// What a tool produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Text handed back to the model as the tool message content.
    Data(String),
    /// Hand the conversation to the named agent.
    Transfer(String),
}

/// The shop operations, one per model-callable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopOperation {
    ListItems,
    CreateOrder,
    FindOrder,
    CancelOrder,
}

/// How a registered tool name is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Operation(ShopOperation),
    Transfer { target: String },
}

/// Name of the tool that hands the conversation to `agent`.
pub fn transfer_tool_name(agent: &str) -> String {
    format!("transfer_to_{agent}")
}

impl ToolKind {
    pub fn signature(&self) -> ToolSignature {
        match self {
            ToolKind::Operation(op) => op.signature(),
            ToolKind::Transfer { target } => ToolSignature {
                name: transfer_tool_name(target),
                doc: format!(
                    "Hand the conversation over to the {target} agent. Call this when the \
                     user's request is better served by {target}."
                ),
                params: Vec::new(),
            },
        }
    }
}

#[derive(Deserialize)]
struct CreateOrderArgs {
    username: String,
    item_id: i64,
    quantity: i64,
}

#[derive(Deserialize)]
struct FindOrderArgs {
    username: String,
    item_id: i64,
}

#[derive(Deserialize)]
struct CancelOrderArgs {
    order_id: i64,
    quantity: i64,
}

impl ShopOperation {
    pub const ALL: [ShopOperation; 4] = [
        ShopOperation::ListItems,
        ShopOperation::CreateOrder,
        ShopOperation::FindOrder,
        ShopOperation::CancelOrder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShopOperation::ListItems => "list_items",
            ShopOperation::CreateOrder => "create_order",
            ShopOperation::FindOrder => "find_order",
            ShopOperation::CancelOrder => "cancel_order",
        }
    }

    fn doc(self) -> &'static str {
        match self {
            ShopOperation::ListItems => {
                "Return every item available in the shop as a list of objects with \
                 id, name, quantity (units in stock) and price."
            }
            ShopOperation::CreateOrder => {
                "Create a new order and reserve the ordered units from stock.\n\
                 Fails if the item does not exist, the requested quantity exceeds the \
                 available stock, the username is empty or the quantity is not positive.\n\
                 \n\
                 Args:\n    \
                 username (str): Name of the user placing the order\n    \
                 item_id (int): Identifier of the item to order\n    \
                 quantity (int): Number of units to order\n"
            }
            ShopOperation::FindOrder => {
                "Find an order by username and item id. Returns the order with \
                 order_id, username, item_id and quantity, or null when no order matches.\n\
                 \n\
                 Args:\n    \
                 username (str): Name of the user who placed the order\n    \
                 item_id (int): Identifier of the ordered item\n"
            }
            ShopOperation::CancelOrder => {
                "Cancel an order fully or partially and return the units to stock.\n\
                 Returns the number of units left on the order; 0 means the order \
                 was cancelled completely and removed.\n\
                 \n\
                 Args:\n    \
                 order_id (int): Identifier of the order to cancel\n    \
                 quantity (int): Number of units to cancel\n"
            }
        }
    }

    pub fn signature(self) -> ToolSignature {
        let params = match self {
            ShopOperation::ListItems => vec![],
            ShopOperation::CreateOrder => vec![
                ParamSpec::new("username", "&str"),
                ParamSpec::new("item_id", "i64"),
                ParamSpec::new("quantity", "i64"),
            ],
            ShopOperation::FindOrder => vec![
                ParamSpec::new("username", "&str"),
                ParamSpec::new("item_id", "i64"),
            ],
            ShopOperation::CancelOrder => vec![
                ParamSpec::new("order_id", "i64"),
                ParamSpec::new("quantity", "i64"),
            ],
        };
        ToolSignature { name: self.name().to_string(), doc: self.doc().to_string(), params }
    }

    /// Run the operation against `store` and render its result as the text
    /// the model sees: JSON for records, `null` for a missing order and a
    /// bare integer for the units left after a cancellation.
    pub fn execute(self, store: &Store, args: &Value) -> Result<String, ToolError> {
        match self {
            ShopOperation::ListItems => Ok(serde_json::to_string(&ops::list_items(store)?)?),
            ShopOperation::CreateOrder => {
                let a: CreateOrderArgs = self.parse_args(args)?;
                let order = ops::create_order(store, &a.username, a.item_id, a.quantity)?;
                Ok(serde_json::to_string(&order)?)
            }
            ShopOperation::FindOrder => {
                let a: FindOrderArgs = self.parse_args(args)?;
                Ok(serde_json::to_string(&ops::find_order(store, &a.username, a.item_id)?)?)
            }
            ShopOperation::CancelOrder => {
                let a: CancelOrderArgs = self.parse_args(args)?;
                Ok(ops::cancel_order(store, a.order_id, a.quantity)?.to_string())
            }
        }
    }

    fn parse_args<T: for<'de> Deserialize<'de>>(self, args: &Value) -> Result<T, ToolError> {
        T::deserialize(args).map_err(|e| ToolError::InvalidArguments {
            tool: self.name().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn shop() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        store
    }

    #[test]
    fn empty_argument_string_is_empty_object() {
        let call = ToolCall::from_raw("c1", "list_items", "").unwrap();
        assert_eq!(call.args, json!({}));
        let call = ToolCall::from_raw("c1", "list_items", "  ").unwrap();
        assert_eq!(call.args, json!({}));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let err = ToolCall::from_raw("c1", "create_order", "{username:").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref tool, .. } if tool == "create_order"));
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        assert!(ToolCall::from_raw("c1", "list_items", "[1,2]").is_err());
    }

    #[test]
    fn create_order_renders_order_id() {
        let out = ShopOperation::CreateOrder
            .execute(&shop(), &json!({ "username": "ann", "item_id": 2, "quantity": 1 }))
            .unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v, json!({ "order_id": 1, "username": "ann", "item_id": 2, "quantity": 1 }));
    }

    #[test]
    fn find_order_miss_renders_null() {
        let out = ShopOperation::FindOrder
            .execute(&shop(), &json!({ "username": "ann", "item_id": 2 }))
            .unwrap();
        assert_eq!(out, "null");
    }

    #[test]
    fn cancel_order_renders_remaining_units() {
        let store = shop();
        ShopOperation::CreateOrder
            .execute(&store, &json!({ "username": "ann", "item_id": 1, "quantity": 3 }))
            .unwrap();
        let out = ShopOperation::CancelOrder
            .execute(&store, &json!({ "order_id": 1, "quantity": 1 }))
            .unwrap();
        assert_eq!(out, "2");
    }

    #[test]
    fn list_items_renders_json_array() {
        let out = ShopOperation::ListItems.execute(&shop(), &json!({})).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 5);
        assert_eq!(v[0]["name"], "Laptop");
    }

    #[test]
    fn missing_field_is_invalid_arguments() {
        let err = ShopOperation::CancelOrder
            .execute(&shop(), &json!({ "order_id": 1 }))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn transfer_signature_has_no_params() {
        let sig = ToolKind::Transfer { target: "sales".into() }.signature();
        assert_eq!(sig.name, "transfer_to_sales");
        assert!(sig.params.is_empty());
    }
}
