//! Storefront state-management core: cart reducer, checkout workflow, and
//! the repository ports they depend on, plus in-memory implementations of
//! those ports. The presentation layer is an external collaborator that
//! reads this state and dispatches intents into it.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::checkout::{CheckoutConfig, CheckoutWorkflow, WorkflowState};
pub use domain::cart::{Cart, CartAction, CartLine, CartStore};
pub use domain::errors::DomainError;
pub use domain::money;
pub use domain::order::{
    DeliveryInfo, Order, OrderDraft, OrderPatch, OrderStatus, PaymentDetails, PaymentRecord,
};
pub use domain::ports::{OrderRepository, ProductRepository};
pub use domain::product::{Category, NewProduct, Product, ProductPatch};
pub use infrastructure::memory::{InMemoryOrderRepository, InMemoryProductRepository};
