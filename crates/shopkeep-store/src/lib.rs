// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Inventory and order persistence.
//!
//! A [`Store`] owns one SQLite connection.  All reads and writes go through
//! [`Store::transaction`], which hands the closure a [`StoreTx`] with the
//! row-level primitives the shop operations are built from.

mod error;
mod models;
mod store;

pub use error::StoreError;
pub use models::{Item, Order};
pub use store::{Store, StoreTx, SEED_ITEMS};
