//! # Order Store Module
//!
//! Append-only persistence of confirmed orders in a single pretty-printed
//! JSON document of the shape `{"orders": [...]}`.
//!
//! Reads never fail: a missing file or malformed content is treated as an
//! empty store. Every operation runs under one async mutex so that two
//! concurrent confirmations cannot lose each other's order.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Display format used for order timestamps
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// A confirmed order as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub user_id: u64,
    pub name: String,
    /// Ordered items, stored under the `order` key
    #[serde(rename = "order")]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// ISO-8601 time at which the order was saved
    pub timestamp: String,
}

impl Order {
    /// Parse the stored timestamp.
    ///
    /// Accepts RFC 3339 timestamps with an offset as well as naive
    /// `YYYY-MM-DDTHH:MM:SS[.ffffff]` timestamps.
    pub fn saved_at(&self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    /// Timestamp formatted for display, or the raw value if it cannot be parsed
    pub fn display_timestamp(&self) -> String {
        match self.saved_at() {
            Some(dt) => dt.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
            None => self.timestamp.clone(),
        }
    }
}

/// An order that has been confirmed but not yet saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: u64,
    pub username: Option<String>,
    pub name: String,
    pub items: Vec<String>,
}

/// The whole on-disk document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// JSON file backed order store
#[derive(Debug)]
pub struct OrderStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OrderStore {
    /// Create a store backed by the file at `path`. The file is created on
    /// the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a confirmed order, stamping it with the current local time
    pub async fn append(&self, new_order: NewOrder) -> Result<Order> {
        let _guard = self.lock.lock().await;

        let mut book = self.read_book().await;
        let order = Order {
            user_id: new_order.user_id,
            name: new_order.name,
            items: new_order.items,
            username: new_order.username,
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        };
        book.orders.push(order.clone());

        let json = serde_json::to_string_pretty(&book).context("Failed to serialize orders")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write orders to {}", self.path.display()))?;

        info!(
            user_id = order.user_id,
            items_count = order.items.len(),
            total_orders = book.orders.len(),
            "Order saved"
        );

        Ok(order)
    }

    /// All stored orders, oldest first
    pub async fn list_all(&self) -> Vec<Order> {
        let _guard = self.lock.lock().await;
        self.read_book().await.orders
    }

    async fn read_book(&self) -> OrderBook {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Orders file does not exist yet");
                return OrderBook::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read orders file, using empty store");
                return OrderBook::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(book) => book,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Orders file is malformed, using empty store");
                OrderBook::default()
            }
        }
    }
}
