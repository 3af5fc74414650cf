//! The checkout workflow: turns a non-empty cart plus delivery and payment
//! form data into a persisted order, with at most one submission in flight
//! per workflow instance.

use bigdecimal::{num_bigint::BigInt, BigDecimal};
use tokio::sync::Mutex;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    DeliveryInfo, Order, OrderDraft, OrderStatus, PaymentDetails, PaymentRecord,
};
use crate::domain::ports::OrderRepository;

/// Checkout pricing knobs. Centralized here so callers never carry the
/// constants themselves; the composition root may override them from the
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    pub tax_rate: BigDecimal,
    pub delivery_fee: BigDecimal,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            // 0.08 and 5.99
            tax_rate: BigDecimal::new(BigInt::from(8), 2),
            delivery_fee: BigDecimal::new(BigInt::from(599), 2),
        }
    }
}

/// Observable workflow state, mirrored after every transition.
///
/// `loading` is true exactly while a create-order call is outstanding and
/// doubles as the single-flight guard. `error` holds the last failure
/// message and is cleared when a new attempt starts. `current_order` is the
/// last successful order and persists until [`CheckoutWorkflow::clear_current_order`].
#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    pub loading: bool,
    pub error: Option<String>,
    pub current_order: Option<Order>,
    pub orders: Vec<Order>,
}

pub struct CheckoutWorkflow<R> {
    repo: R,
    config: CheckoutConfig,
    state: Mutex<WorkflowState>,
}

impl<R: OrderRepository> CheckoutWorkflow<R> {
    pub fn new(repo: R, config: CheckoutConfig) -> Self {
        Self {
            repo,
            config,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub async fn state(&self) -> WorkflowState {
        self.state.lock().await.clone()
    }

    /// Clears the confirmation state when the presentation layer leaves
    /// the confirmation view.
    pub async fn clear_current_order(&self) {
        self.state.lock().await.current_order = None;
    }

    /// Submit the cart as an order.
    ///
    /// Rejects re-entrant calls while a submission is outstanding, rejects
    /// an empty cart without touching the repository, and validates the
    /// form data before any state changes. On success the created order is
    /// stored as `current_order` and returned; clearing the cart is the
    /// caller's job, so a failed submission leaves the cart intact for a
    /// retry. `loading` is reset on both paths.
    pub async fn submit(
        &self,
        cart: &Cart,
        delivery: DeliveryInfo,
        payment: PaymentDetails,
    ) -> Result<Order, DomainError> {
        {
            let mut state = self.state.lock().await;
            if state.loading {
                return Err(DomainError::SubmissionInFlight);
            }
            if cart.is_empty() {
                return Err(DomainError::EmptyCart);
            }
            validate_submission(&delivery, &payment)?;
            state.loading = true;
            state.error = None;
        }

        let subtotal = cart.total.clone();
        let tax = &subtotal * &self.config.tax_rate;
        let total = &subtotal + &self.config.delivery_fee + &tax;
        let draft = OrderDraft {
            items: cart.items.clone(),
            delivery,
            payment: PaymentRecord::sanitize(&payment),
            subtotal,
            tax,
            delivery_fee: self.config.delivery_fee.clone(),
            total,
            status: OrderStatus::Confirmed,
        };

        // The lock is not held across the repository call; `loading` keeps
        // other submissions out in the meantime.
        let result = self.repo.create(draft).await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(order) => {
                log::info!("order {} placed, total {}", order.id, order.total);
                state.current_order = Some(order.clone());
                state.orders.push(order.clone());
                Ok(order)
            }
            Err(e) => {
                log::warn!("order submission failed: {e}");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

fn validate_submission(
    delivery: &DeliveryInfo,
    payment: &PaymentDetails,
) -> Result<(), DomainError> {
    let required = [
        ("name", &delivery.name),
        ("email", &delivery.email),
        ("phone", &delivery.phone),
        ("address", &delivery.address),
        ("city", &delivery.city),
        ("zip code", &delivery.zip_code),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DomainError::Validation(format!("{field} is required")));
        }
    }

    if let PaymentDetails::Card {
        number,
        expiry,
        cvv,
    } = payment
    {
        let card_fields = [
            ("card number", number),
            ("expiry date", expiry),
            ("cvv", cvv),
        ];
        for (field, value) in card_fields {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!("{field} is required")));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::cart::{Cart, CartAction};
    use crate::domain::order::OrderPatch;
    use crate::domain::product::{Category, Product};
    use crate::infrastructure::memory::InMemoryOrderRepository;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn product(id: i64, price: &str) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: String::new(),
            category: Category::Meals,
            price: dec(price),
            nutrition: None,
            ingredients: None,
            image: String::new(),
        }
    }

    fn delivery() -> DeliveryInfo {
        DeliveryInfo {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Analytical Way".to_string(),
            city: "London".to_string(),
            zip_code: "E1 6AN".to_string(),
        }
    }

    fn card() -> PaymentDetails {
        PaymentDetails::Card {
            number: "4111111111111111".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn cart_with_subtotal_20() -> Cart {
        Cart::new().apply(CartAction::Add {
            product: product(1, "10.00"),
            quantity: 2,
        })
    }

    /// Counts create calls so tests can assert the repository was never
    /// reached on the reject paths.
    #[derive(Default)]
    struct CountingRepo {
        created: AtomicUsize,
    }

    #[async_trait]
    impl OrderRepository for CountingRepo {
        async fn get_all(&self) -> Result<Vec<Order>, DomainError> {
            Ok(vec![])
        }

        async fn get_by_id(&self, _id: i64) -> Result<Order, DomainError> {
            Err(DomainError::NotFound)
        }

        async fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
            let n = self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Order::from_draft(n as i64 + 1, draft, Utc::now()))
        }

        async fn update(&self, _id: i64, _patch: OrderPatch) -> Result<Order, DomainError> {
            Err(DomainError::NotFound)
        }

        async fn delete(&self, _id: i64) -> Result<Order, DomainError> {
            Err(DomainError::NotFound)
        }
    }

    struct FailingRepo;

    #[async_trait]
    impl OrderRepository for FailingRepo {
        async fn get_all(&self) -> Result<Vec<Order>, DomainError> {
            Ok(vec![])
        }

        async fn get_by_id(&self, _id: i64) -> Result<Order, DomainError> {
            Err(DomainError::NotFound)
        }

        async fn create(&self, _draft: OrderDraft) -> Result<Order, DomainError> {
            Err(DomainError::Transport("connection reset".to_string()))
        }

        async fn update(&self, _id: i64, _patch: OrderPatch) -> Result<Order, DomainError> {
            Err(DomainError::NotFound)
        }

        async fn delete(&self, _id: i64) -> Result<Order, DomainError> {
            Err(DomainError::NotFound)
        }
    }

    #[tokio::test]
    async fn submit_on_empty_cart_never_reaches_the_repository() {
        let workflow = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());

        let result = workflow.submit(&Cart::new(), delivery(), card()).await;

        assert!(matches!(result, Err(DomainError::EmptyCart)));
        assert_eq!(workflow.repo.created.load(Ordering::SeqCst), 0);
        let state = workflow.state().await;
        assert!(!state.loading);
        assert!(state.current_order.is_none());
    }

    #[tokio::test]
    async fn successful_submit_computes_totals_and_records_the_order() {
        let workflow = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());
        let cart = cart_with_subtotal_20();

        let order = workflow
            .submit(&cart, delivery(), card())
            .await
            .expect("submit failed");

        assert_eq!(order.subtotal, dec("20.00"));
        assert_eq!(order.tax, dec("1.60"));
        assert_eq!(order.delivery_fee, dec("5.99"));
        assert_eq!(order.total, dec("27.59"));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(
            order.payment,
            PaymentRecord::Card {
                last4: "1111".to_string()
            }
        );

        let state = workflow.state().await;
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.current_order.as_ref().map(|o| o.id), Some(order.id));
        assert_eq!(state.orders.len(), 1);
    }

    #[tokio::test]
    async fn failed_submit_records_error_and_keeps_current_order() {
        let counting = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());
        let cart = cart_with_subtotal_20();
        let first = counting
            .submit(&cart, delivery(), card())
            .await
            .expect("submit failed");

        let workflow = CheckoutWorkflow::new(FailingRepo, CheckoutConfig::default());
        {
            let mut state = workflow.state.lock().await;
            state.current_order = Some(first.clone());
        }

        let result = workflow.submit(&cart, delivery(), PaymentDetails::Cash).await;

        assert!(matches!(result, Err(DomainError::Transport(_))));
        let state = workflow.state().await;
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Transport error: connection reset")
        );
        assert_eq!(state.current_order, Some(first));
        // Failure leaves the cart alone; the caller only clears on success.
        assert_eq!(cart.items.len(), 1);
    }

    #[tokio::test]
    async fn error_is_cleared_when_a_new_attempt_starts() {
        let workflow = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());
        {
            let mut state = workflow.state.lock().await;
            state.error = Some("Transport error: connection reset".to_string());
        }

        workflow
            .submit(&cart_with_subtotal_20(), delivery(), PaymentDetails::Cash)
            .await
            .expect("submit failed");

        assert!(workflow.state().await.error.is_none());
    }

    #[tokio::test]
    async fn blank_delivery_field_fails_validation_before_the_repository() {
        let workflow = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());
        let mut info = delivery();
        info.city = "   ".to_string();

        let result = workflow
            .submit(&cart_with_subtotal_20(), info, PaymentDetails::Cash)
            .await;

        match result {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "city is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(workflow.repo.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn card_payment_requires_card_fields() {
        let workflow = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());
        let payment = PaymentDetails::Card {
            number: "4111111111111111".to_string(),
            expiry: String::new(),
            cvv: "123".to_string(),
        };

        let result = workflow
            .submit(&cart_with_subtotal_20(), delivery(), payment)
            .await;

        match result {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "expiry date is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cash_payment_skips_card_field_validation() {
        let workflow = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());

        let order = workflow
            .submit(&cart_with_subtotal_20(), delivery(), PaymentDetails::Cash)
            .await
            .expect("submit failed");

        assert_eq!(order.payment, PaymentRecord::Cash);
    }

    #[tokio::test]
    async fn concurrent_submits_create_at_most_one_order() {
        let repo = InMemoryOrderRepository::with_latency(Duration::from_millis(50));
        let workflow = CheckoutWorkflow::new(repo, CheckoutConfig::default());
        let cart = cart_with_subtotal_20();

        let (first, second) = futures::join!(
            workflow.submit(&cart, delivery(), PaymentDetails::Cash),
            workflow.submit(&cart, delivery(), PaymentDetails::Cash),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(DomainError::SubmissionInFlight))));

        let orders = workflow.repo.get_all().await.expect("get_all failed");
        assert_eq!(orders.len(), 1, "one cart state, one order");
        assert!(!workflow.state().await.loading);
    }

    #[tokio::test]
    async fn clear_current_order_resets_confirmation_state() {
        let workflow = CheckoutWorkflow::new(CountingRepo::default(), CheckoutConfig::default());
        workflow
            .submit(&cart_with_subtotal_20(), delivery(), PaymentDetails::Cash)
            .await
            .expect("submit failed");

        workflow.clear_current_order().await;

        let state = workflow.state().await;
        assert!(state.current_order.is_none());
        // The known-orders list is history, not confirmation state.
        assert_eq!(state.orders.len(), 1);
    }
}
