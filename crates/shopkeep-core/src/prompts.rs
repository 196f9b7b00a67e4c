// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use shopkeep_config::AgentDefinition;

const TRIAGE_INSTRUCTIONS: &str = "\
You are the front desk of an online electronics shop.
Greet the customer, work out what they need and hand the conversation to the
right colleague:
- transfer_to_sales for browsing the catalogue and placing new orders
- transfer_to_orders for looking up or cancelling existing orders
Ask a short clarifying question when the request is ambiguous. Do not invent
products, prices or order details.";

const SALES_INSTRUCTIONS: &str = "\
You are a sales assistant for an online electronics shop.
Help the customer choose a product and place an order.
1. Use list_items to see what is in stock, with prices.
2. Confirm the item, the quantity and the customer's username.
3. Call create_order and report the order id back to the customer.
Never promise more units than are in stock. If the customer wants to check
or cancel an existing order, or asks about something else, call
transfer_to_triage.";

const ORDERS_INSTRUCTIONS: &str = "\
You handle existing orders for an online electronics shop.
To find an order ask for the username and the item; use list_items to map an
item name to its id, then call find_order. To cancel, confirm the order id and
how many units to cancel, then call cancel_order. A result of 0 means the order
was removed completely; otherwise tell the customer how many units remain.
If the customer wants to buy something new, or asks about something else,
call transfer_to_triage.";

/// The agent set used when the configuration defines none.
pub fn builtin_agents() -> Vec<AgentDefinition> {
    vec![
        AgentDefinition {
            name: "triage".into(),
            instructions: TRIAGE_INSTRUCTIONS.into(),
            model: None,
            tools: vec![],
            transfers: vec!["sales".into(), "orders".into()],
        },
        AgentDefinition {
            name: "sales".into(),
            instructions: SALES_INSTRUCTIONS.into(),
            model: None,
            tools: vec!["list_items".into(), "create_order".into()],
            transfers: vec!["triage".into()],
        },
        AgentDefinition {
            name: "orders".into(),
            instructions: ORDERS_INSTRUCTIONS.into(),
            model: None,
            tools: vec!["find_order".into(), "cancel_order".into(), "list_items".into()],
            transfers: vec!["triage".into()],
        },
    ]
}
