// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The shop operations exposed to the model.
//!
//! Each function runs in exactly one store transaction, so a validation or
//! database failure at any step leaves items and orders untouched.

use shopkeep_store::{Item, Order, Store};
use tracing::{debug, warn};

use crate::ToolError;

/// Every item in the shop.  An empty inventory is not an error.
pub fn list_items(store: &Store) -> Result<Vec<Item>, ToolError> {
    let items = store.transaction(|tx| tx.items())?;
    if items.is_empty() {
        warn!("inventory is empty; no items available");
    }
    Ok(items)
}

/// Place an order and reserve its stock.
pub fn create_order(
    store: &Store,
    username: &str,
    item_id: i64,
    quantity: i64,
) -> Result<Order, ToolError> {
    if username.trim().is_empty() {
        return Err(ToolError::validation("username must not be empty"));
    }
    if quantity <= 0 {
        return Err(ToolError::validation("quantity must be a positive number"));
    }

    let order = store.transaction(|tx| -> Result<Order, ToolError> {
        let item = tx
            .item(item_id)?
            .ok_or_else(|| ToolError::validation(format!("item {item_id} not found")))?;
        if quantity > item.quantity {
            return Err(ToolError::validation(format!(
                "not enough stock for item {item_id}: available {}, requested {quantity}",
                item.quantity
            )));
        }
        let order = tx.insert_order(username, item_id, quantity)?;
        tx.adjust_item_quantity(item_id, -quantity)?;
        Ok(order)
    })?;

    debug!(order_id = order.id, item_id, quantity, "order created");
    Ok(order)
}

/// The first order (lowest id) placed by `username` for `item_id`.
pub fn find_order(store: &Store, username: &str, item_id: i64) -> Result<Option<Order>, ToolError> {
    Ok(store.transaction(|tx| tx.find_order(username, item_id))?)
}

/// Cancel `quantity` units of an order and return them to stock.
///
/// Returns the units left on the order; `0` means the order was deleted.
pub fn cancel_order(store: &Store, order_id: i64, quantity: i64) -> Result<i64, ToolError> {
    if quantity <= 0 {
        return Err(ToolError::validation("quantity must be a positive number"));
    }

    let remaining = store.transaction(|tx| -> Result<i64, ToolError> {
        let order = tx
            .order(order_id)?
            .ok_or_else(|| ToolError::validation(format!("order {order_id} not found")))?;
        if quantity > order.quantity {
            return Err(ToolError::validation(format!(
                "cannot cancel {quantity} units; order {order_id} holds {}",
                order.quantity
            )));
        }
        if tx.item(order.item_id)?.is_none() {
            return Err(ToolError::validation(format!("item {} not found", order.item_id)));
        }

        tx.adjust_item_quantity(order.item_id, quantity)?;
        let remaining = order.quantity - quantity;
        if remaining > 0 {
            tx.set_order_quantity(order_id, remaining)?;
        } else {
            tx.delete_order(order_id)?;
        }
        Ok(remaining)
    })?;

    debug!(order_id, quantity, remaining, "order cancelled");
    Ok(remaining)
}
