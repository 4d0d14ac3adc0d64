use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    query, query_as, query_scalar, FromRow, SqlitePool,
};
use shop_common::models::{cart, item};
use tracing::info;

use crate::error::Error;

pub static MIGRATIONS: Migrator = sqlx::migrate!("./migrations");

/// A catalog item as stored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub deleted: bool,
}

impl From<Item> for item::Response {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            deleted: item.deleted,
        }
    }
}

/// A cart entry joined with the current state of its item.
#[derive(Debug, Clone, FromRow)]
struct CartEntry {
    item_id: i64,
    name: String,
    price: f64,
    quantity: i64,
    deleted: bool,
}

/// Filters for item listings. Price bounds are inclusive and `offset`/
/// `limit` apply after filtering, in id order.
#[derive(Debug, Clone)]
pub struct ItemFilter {
    pub offset: i64,
    pub limit: i64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub show_deleted: bool,
}

/// Filters for cart listings. The price and quantity bounds apply to the
/// computed cart totals, so they cannot be pushed into the store query.
#[derive(Debug, Clone)]
pub struct CartFilter {
    pub offset: i64,
    pub limit: i64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
}

impl CartFilter {
    fn matches(&self, cart: &cart::Response) -> bool {
        self.min_price.map_or(true, |min| cart.price >= min)
            && self.max_price.map_or(true, |max| cart.price <= max)
            && self.min_quantity.map_or(true, |min| cart.quantity >= min)
            && self.max_quantity.map_or(true, |max| cart.quantity <= max)
    }
}

#[async_trait]
pub trait Dal: Send + Sync {
    /// Store a new item and return it with its assigned id.
    async fn insert_item(&self, name: &str, price: f64) -> Result<Item, Error>;

    /// Fetch an item regardless of its deletion flag.
    async fn item(&self, id: i64) -> Result<Option<Item>, Error>;

    async fn items(&self, filter: ItemFilter) -> Result<Vec<Item>, Error>;

    /// Overwrite both mutable fields of an item.
    async fn replace_item(&self, id: i64, name: &str, price: f64) -> Result<Item, Error>;

    /// Update the given fields of an item, leaving the others untouched.
    async fn update_item(
        &self,
        id: i64,
        name: Option<&str>,
        price: Option<f64>,
    ) -> Result<Item, Error>;

    /// Flag an item as deleted. Returns whether the flag actually flipped,
    /// which is false for missing and for already-deleted items.
    async fn mark_item_deleted(&self, id: i64) -> Result<bool, Error>;

    /// Store a new empty cart and return its assigned id.
    async fn insert_cart(&self) -> Result<i64, Error>;

    async fn cart_exists(&self, id: i64) -> Result<bool, Error>;

    /// Fetch a cart with its entries and computed totals.
    async fn cart(&self, id: i64) -> Result<Option<cart::Response>, Error>;

    async fn carts(&self, filter: CartFilter) -> Result<Vec<cart::Response>, Error>;

    /// Add one unit of an item to a cart, creating the entry on first add.
    async fn add_item_to_cart(&self, cart_id: i64, item_id: i64) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    /// Open the database at the given URI, creating it and running
    /// migrations when needed.
    pub async fn new(db_uri: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(db_uri)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(options).await?;

        info!(db_uri, "connected to shop state database");

        Self::from_pool(pool).await
    }

    pub async fn new_in_memory() -> Result<Self, Error> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, Error> {
        MIGRATIONS.run(&pool).await?;

        Ok(Self { pool })
    }

    async fn cart_entries(&self, cart_id: i64) -> Result<Vec<CartEntry>, Error> {
        let entries = query_as(
            "SELECT ci.item_id, i.name, i.price, ci.quantity, i.deleted \
             FROM cart_items ci \
             JOIN items i ON i.id = ci.item_id \
             WHERE ci.cart_id = ?1 \
             ORDER BY ci.rowid",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

/// Fold cart entries into the wire form. Entries of deleted items stay
/// listed as unavailable but are skipped by both totals.
fn assemble_cart(id: i64, entries: Vec<CartEntry>) -> cart::Response {
    let mut price = 0.0;
    let mut quantity = 0;

    let items = entries
        .into_iter()
        .map(|entry| {
            if !entry.deleted {
                price += entry.price * entry.quantity as f64;
                quantity += entry.quantity as u32;
            }

            cart::CartItem {
                id: entry.item_id,
                name: entry.name,
                quantity: entry.quantity as u32,
                available: !entry.deleted,
            }
        })
        .collect();

    cart::Response {
        id,
        items,
        price,
        quantity,
    }
}

#[async_trait]
impl Dal for Sqlite {
    async fn insert_item(&self, name: &str, price: f64) -> Result<Item, Error> {
        let item = query_as(
            "INSERT INTO items (name, price) VALUES (?1, ?2) \
             RETURNING id, name, price, deleted",
        )
        .bind(name)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn item(&self, id: i64) -> Result<Option<Item>, Error> {
        let item = query_as("SELECT id, name, price, deleted FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn items(&self, filter: ItemFilter) -> Result<Vec<Item>, Error> {
        let items = query_as(
            "SELECT id, name, price, deleted FROM items \
             WHERE (?1 OR deleted = FALSE) \
             AND (?2 IS NULL OR price >= ?2) \
             AND (?3 IS NULL OR price <= ?3) \
             ORDER BY id \
             LIMIT ?4 OFFSET ?5",
        )
        .bind(filter.show_deleted)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn replace_item(&self, id: i64, name: &str, price: f64) -> Result<Item, Error> {
        let item = query_as(
            "UPDATE items SET name = ?2, price = ?3 WHERE id = ?1 \
             RETURNING id, name, price, deleted",
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update_item(
        &self,
        id: i64,
        name: Option<&str>,
        price: Option<f64>,
    ) -> Result<Item, Error> {
        let item = query_as(
            "UPDATE items SET name = coalesce(?2, name), price = coalesce(?3, price) \
             WHERE id = ?1 \
             RETURNING id, name, price, deleted",
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn mark_item_deleted(&self, id: i64) -> Result<bool, Error> {
        let result = query("UPDATE items SET deleted = TRUE WHERE id = ?1 AND deleted = FALSE")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_cart(&self) -> Result<i64, Error> {
        let id = query_scalar("INSERT INTO carts DEFAULT VALUES RETURNING id")
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn cart_exists(&self, id: i64) -> Result<bool, Error> {
        let exists = query("SELECT id FROM carts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(exists.is_some())
    }

    async fn cart(&self, id: i64) -> Result<Option<cart::Response>, Error> {
        if !self.cart_exists(id).await? {
            return Ok(None);
        }

        let entries = self.cart_entries(id).await?;

        Ok(Some(assemble_cart(id, entries)))
    }

    async fn carts(&self, filter: CartFilter) -> Result<Vec<cart::Response>, Error> {
        let ids: Vec<i64> = query_scalar("SELECT id FROM carts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut carts = Vec::new();

        for id in ids {
            let cart = assemble_cart(id, self.cart_entries(id).await?);

            if filter.matches(&cart) {
                carts.push(cart);
            }
        }

        Ok(carts
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn add_item_to_cart(&self, cart_id: i64, item_id: i64) -> Result<(), Error> {
        query(
            "INSERT INTO cart_items (cart_id, item_id, quantity) VALUES (?1, ?2, 1) \
             ON CONFLICT (cart_id, item_id) DO UPDATE SET quantity = quantity + 1",
        )
        .bind(cart_id)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
