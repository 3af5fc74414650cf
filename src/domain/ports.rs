use async_trait::async_trait;

use super::errors::DomainError;
use super::order::{Order, OrderDraft, OrderPatch};
use super::product::{NewProduct, Product, ProductPatch};

/// Order persistence port. Calls are asynchronous; implementations may be
/// backed by anything that honors the contract. Ids are assigned by the
/// repository as one greater than the current maximum, starting at 1 on an
/// empty store.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn get_all(&self) -> Result<Vec<Order>, DomainError>;
    async fn get_by_id(&self, id: i64) -> Result<Order, DomainError>;
    async fn create(&self, draft: OrderDraft) -> Result<Order, DomainError>;
    async fn update(&self, id: i64, patch: OrderPatch) -> Result<Order, DomainError>;
    /// Removes the order and returns the deleted record.
    async fn delete(&self, id: i64) -> Result<Order, DomainError>;
}

/// Catalog port with the same CRUD shape, keyed on product id.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn get_all(&self) -> Result<Vec<Product>, DomainError>;
    async fn get_by_id(&self, id: i64) -> Result<Product, DomainError>;
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, DomainError>;
    async fn delete(&self, id: i64) -> Result<Product, DomainError>;
}
