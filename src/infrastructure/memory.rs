//! In-memory repositories backing the order and product ports.
//!
//! These stand in for a remote API: records live in a `Vec` behind an async
//! mutex, ids are assigned sequentially, and an optional artificial latency
//! is slept before every call to keep callers honest about the await point.
//! Latency defaults to zero so tests run instantly.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDraft, OrderPatch};
use crate::domain::ports::{OrderRepository, ProductRepository};
use crate::domain::product::{NewProduct, Product, ProductPatch};

fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    existing.max().unwrap_or(0) + 1
}

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
    latency: Duration,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get_all(&self) -> Result<Vec<Order>, DomainError> {
        self.simulate_latency().await;
        Ok(self.orders.lock().await.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Order, DomainError> {
        self.simulate_latency().await;
        self.orders
            .lock()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    async fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        self.simulate_latency().await;
        let mut orders = self.orders.lock().await;
        let id = next_id(orders.iter().map(|o| o.id));
        let order = Order::from_draft(id, draft, Utc::now());
        log::debug!("created order {id}");
        orders.push(order.clone());
        Ok(order)
    }

    async fn update(&self, id: i64, patch: OrderPatch) -> Result<Order, DomainError> {
        self.simulate_latency().await;
        let mut orders = self.orders.lock().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DomainError::NotFound)?;
        if let Some(status) = patch.status {
            order.status = status;
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete(&self, id: i64) -> Result<Order, DomainError> {
        self.simulate_latency().await;
        let mut orders = self.orders.lock().await;
        let index = orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(orders.remove(index))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
    latency: Duration,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog, mirroring a mock data file.
    pub fn seeded(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_all(&self) -> Result<Vec<Product>, DomainError> {
        self.simulate_latency().await;
        Ok(self.products.lock().await.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, DomainError> {
        self.simulate_latency().await;
        self.products
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        self.simulate_latency().await;
        let mut products = self.products.lock().await;
        let id = next_id(products.iter().map(|p| p.id));
        let product = product.into_product(id);
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, DomainError> {
        self.simulate_latency().await;
        let mut products = self.products.lock().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;
        product.apply_patch(patch);
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> Result<Product, DomainError> {
        self.simulate_latency().await;
        let mut products = self.products.lock().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(products.remove(index))
    }
}
