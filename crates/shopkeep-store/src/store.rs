// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use shopkeep_config::StoreConfig;
use tracing::{debug, info};

use crate::{Item, Order, StoreError};

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS items (
    id       INTEGER PRIMARY KEY,
    name     TEXT    NOT NULL,
    price    INTEGER NOT NULL CHECK (price >= 0),
    quantity INTEGER NOT NULL CHECK (quantity >= 0)
);

CREATE TABLE IF NOT EXISTS orders (
    id       INTEGER PRIMARY KEY,
    username TEXT    NOT NULL,
    item_id  INTEGER NOT NULL REFERENCES items(id),
    quantity INTEGER NOT NULL CHECK (quantity > 0)
);
";

/// Items inserted into an empty store when seeding is enabled:
/// `(name, quantity, price)`.
pub const SEED_ITEMS: &[(&str, i64, i64)] = &[
    ("Laptop", 5, 10000),
    ("Smartphone", 10, 5000),
    ("Headphones", 25, 1500),
    ("Tablet", 7, 7000),
    ("Smartwatch", 12, 3000),
];

/// SQLite-backed item and order store.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database file at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened store");
        Self::init(conn)
    }

    /// A private, empty store that lives only as long as the value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open the store described by `config`, seeding it when enabled.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = Self::open(&config.path)?;
        if config.seed {
            let added = store.seed_if_empty()?;
            if added > 0 {
                info!(path = %config.path.display(), items = added, "seeded empty store");
            }
        }
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Insert [`SEED_ITEMS`] when the `items` table is empty.
    /// Returns the number of items added.
    pub fn seed_if_empty(&self) -> Result<usize, StoreError> {
        self.transaction(|tx| {
            if tx.count_items()? > 0 {
                return Ok(0);
            }
            for (name, quantity, price) in SEED_ITEMS {
                tx.insert_item(name, *quantity, *price)?;
            }
            Ok(SEED_ITEMS.len())
        })
    }

    /// Run `f` inside one IMMEDIATE transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err` (the guard rolls back on drop), so a failing closure
    /// never leaves partial writes behind.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&StoreTx<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let scoped = StoreTx { tx };
        let value = f(&scoped)?;
        scoped.tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

/// Row-level primitives available inside [`Store::transaction`].
pub struct StoreTx<'c> {
    tx: Transaction<'c>,
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        price: row.get(3)?,
    })
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        username: row.get(1)?,
        item_id: row.get(2)?,
        quantity: row.get(3)?,
    })
}

impl StoreTx<'_> {
    /// All items in ascending id order.
    pub fn items(&self) -> Result<Vec<Item>, StoreError> {
        let mut stmt = self
            .tx
            .prepare("SELECT id, name, quantity, price FROM items ORDER BY id")?;
        let rows = stmt.query_map([], item_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn item(&self, id: i64) -> Result<Option<Item>, StoreError> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, name, quantity, price FROM items WHERE id = ?1",
                params![id],
                item_from_row,
            )
            .optional()?)
    }

    pub fn count_items(&self) -> Result<i64, StoreError> {
        Ok(self.tx.query_row("SELECT COUNT(*) FROM items", [], |r| r.get(0))?)
    }

    pub fn insert_item(&self, name: &str, quantity: i64, price: i64) -> Result<Item, StoreError> {
        self.tx.execute(
            "INSERT INTO items (name, quantity, price) VALUES (?1, ?2, ?3)",
            params![name, quantity, price],
        )?;
        Ok(Item {
            id: self.tx.last_insert_rowid(),
            name: name.to_string(),
            quantity,
            price,
        })
    }

    /// Add `delta` (which may be negative) to an item's stock.
    pub fn adjust_item_quantity(&self, id: i64, delta: i64) -> Result<(), StoreError> {
        self.tx.execute(
            "UPDATE items SET quantity = quantity + ?1 WHERE id = ?2",
            params![delta, id],
        )?;
        Ok(())
    }

    pub fn insert_order(
        &self,
        username: &str,
        item_id: i64,
        quantity: i64,
    ) -> Result<Order, StoreError> {
        self.tx.execute(
            "INSERT INTO orders (username, item_id, quantity) VALUES (?1, ?2, ?3)",
            params![username, item_id, quantity],
        )?;
        Ok(Order {
            id: self.tx.last_insert_rowid(),
            username: username.to_string(),
            item_id,
            quantity,
        })
    }

    pub fn order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, username, item_id, quantity FROM orders WHERE id = ?1",
                params![id],
                order_from_row,
            )
            .optional()?)
    }

    /// The lowest-id order placed by `username` for `item_id`.
    pub fn find_order(&self, username: &str, item_id: i64) -> Result<Option<Order>, StoreError> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, username, item_id, quantity FROM orders
                 WHERE username = ?1 AND item_id = ?2
                 ORDER BY id LIMIT 1",
                params![username, item_id],
                order_from_row,
            )
            .optional()?)
    }

    pub fn set_order_quantity(&self, id: i64, quantity: i64) -> Result<(), StoreError> {
        self.tx.execute(
            "UPDATE orders SET quantity = ?1 WHERE id = ?2",
            params![quantity, id],
        )?;
        Ok(())
    }

    pub fn delete_order(&self, id: i64) -> Result<(), StoreError> {
        self.tx.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        store
    }

    #[test]
    fn seed_populates_empty_store_once() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.seed_if_empty().unwrap(), SEED_ITEMS.len());
        assert_eq!(store.seed_if_empty().unwrap(), 0, "second seed is a no-op");

        let items = store.transaction(|tx| tx.items()).unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0], Item { id: 1, name: "Laptop".into(), quantity: 5, price: 10000 });
        assert_eq!(items[4].name, "Smartwatch");
    }

    #[test]
    fn new_store_is_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.transaction(|tx| tx.items()).unwrap().is_empty());
    }

    #[test]
    fn committed_writes_are_visible_afterwards() {
        let store = seeded();
        let order = store
            .transaction(|tx| {
                let o = tx.insert_order("ann", 2, 3)?;
                tx.adjust_item_quantity(2, -3)?;
                Ok::<_, StoreError>(o)
            })
            .unwrap();

        let (found, item) = store
            .transaction(|tx| Ok::<_, StoreError>((tx.order(order.id)?, tx.item(2)?)))
            .unwrap();
        assert_eq!(found, Some(order));
        assert_eq!(item.unwrap().quantity, 7);
    }

    #[test]
    fn failing_closure_rolls_back_every_write() {
        let store = seeded();
        let result: Result<(), StoreError> = store.transaction(|tx| {
            tx.insert_order("ann", 1, 1)?;
            tx.adjust_item_quantity(1, -1)?;
            Err(StoreError::Poisoned)
        });
        assert!(result.is_err());

        let (item, order) = store
            .transaction(|tx| Ok::<_, StoreError>((tx.item(1)?, tx.find_order("ann", 1)?)))
            .unwrap();
        assert_eq!(item.unwrap().quantity, 5);
        assert!(order.is_none());
    }

    #[test]
    fn negative_stock_is_rejected_by_the_schema() {
        let store = seeded();
        let err = store.transaction(|tx| tx.adjust_item_quantity(1, -6)).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        let item = store.transaction(|tx| tx.item(1)).unwrap().unwrap();
        assert_eq!(item.quantity, 5);
    }

    #[test]
    fn order_for_unknown_item_violates_foreign_key() {
        let store = seeded();
        assert!(store.transaction(|tx| tx.insert_order("ann", 99, 1)).is_err());
    }

    #[test]
    fn find_order_returns_lowest_id_match() {
        let store = seeded();
        store
            .transaction(|tx| {
                tx.insert_order("bob", 3, 1)?;
                tx.insert_order("ann", 3, 2)?;
                tx.insert_order("ann", 3, 4)?;
                Ok::<_, StoreError>(())
            })
            .unwrap();

        let found = store.transaction(|tx| tx.find_order("ann", 3)).unwrap().unwrap();
        assert_eq!(found.id, 2);
        assert_eq!(found.quantity, 2);
        assert!(store.transaction(|tx| tx.find_order("ann", 4)).unwrap().is_none());
    }

    #[test]
    fn set_and_delete_order() {
        let store = seeded();
        let order = store.transaction(|tx| tx.insert_order("ann", 1, 3)).unwrap();
        store.transaction(|tx| tx.set_order_quantity(order.id, 1)).unwrap();
        assert_eq!(store.transaction(|tx| tx.order(order.id)).unwrap().unwrap().quantity, 1);

        store.transaction(|tx| tx.delete_order(order.id)).unwrap();
        assert!(store.transaction(|tx| tx.order(order.id)).unwrap().is_none());
    }

    #[test]
    fn from_config_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig { path: dir.path().join("shop.db"), seed: true };

        {
            let store = Store::from_config(&config).unwrap();
            store.transaction(|tx| tx.adjust_item_quantity(1, -2)).unwrap();
        }

        let reopened = Store::from_config(&config).unwrap();
        let items = reopened.transaction(|tx| tx.items()).unwrap();
        assert_eq!(items.len(), 5, "reopening does not seed twice");
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn from_config_without_seed_stays_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig { path: dir.path().join("empty.db"), seed: false };
        let store = Store::from_config(&config).unwrap();
        assert_eq!(store.transaction(|tx| tx.count_items()).unwrap(), 0);
    }
}
