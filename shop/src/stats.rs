use std::sync::atomic::{AtomicU64, Ordering};

use shop_common::models::stats::StatsResponse;

/// Counters for the operations this process has performed. Request-level
/// metrics ride on the trace layer; these cover the domain operations a
/// status page cares about.
#[derive(Debug, Default)]
pub struct StatsTracker {
    items_created: AtomicU64,
    items_deleted: AtomicU64,
    carts_created: AtomicU64,
    cart_additions: AtomicU64,
}

impl StatsTracker {
    pub fn item_created(&self) {
        self.items_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn item_deleted(&self) {
        self.items_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cart_created(&self) {
        self.carts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cart_addition(&self) {
        self.cart_additions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsResponse {
        StatsResponse {
            items_created: self.items_created.load(Ordering::Relaxed),
            items_deleted: self.items_deleted.load(Ordering::Relaxed),
            carts_created: self.carts_created.load(Ordering::Relaxed),
            cart_additions: self.cart_additions.load(Ordering::Relaxed),
        }
    }
}
