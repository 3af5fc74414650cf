use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartLine;

/// Delivery form data for an order. Every field is required and
/// validated by the checkout workflow before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
}

/// Raw payment form data as entered by the customer.
///
/// Deliberately not serializable: full card numbers, expiry dates and CVVs
/// must never leave memory. The workflow reduces this to a
/// [`PaymentRecord`] before anything is persisted.
#[derive(Debug, Clone)]
pub enum PaymentDetails {
    Card {
        number: String,
        expiry: String,
        cvv: String,
    },
    Cash,
}

/// Sanitized payment data as stored on an order. For card payments only
/// the last four digits of the number are retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentRecord {
    Card { last4: String },
    Cash,
}

impl PaymentRecord {
    pub fn sanitize(details: &PaymentDetails) -> Self {
        match details {
            PaymentDetails::Card { number, .. } => {
                let keep = number.chars().count().saturating_sub(4);
                PaymentRecord::Card {
                    last4: number.chars().skip(keep).collect(),
                }
            }
            PaymentDetails::Cash => PaymentRecord::Cash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Confirmed,
}

/// Immutable order-submission payload handed to the repository. Holds
/// line snapshots copied out of the cart at submission time plus the
/// totals computed by the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    pub items: Vec<CartLine>,
    pub delivery: DeliveryInfo,
    pub payment: PaymentRecord,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub total: BigDecimal,
    pub status: OrderStatus,
}

/// A persisted order. Id and timestamps are repository-assigned; the rest
/// is the draft, frozen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub items: Vec<CartLine>,
    pub delivery: DeliveryInfo,
    pub payment: PaymentRecord,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn from_draft(id: i64, draft: OrderDraft, at: DateTime<Utc>) -> Self {
        Order {
            id,
            items: draft.items,
            delivery: draft.delivery,
            payment: draft.payment,
            subtotal: draft.subtotal,
            tax: draft.tax,
            delivery_fee: draft.delivery_fee,
            total: draft.total,
            status: draft.status,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Partial update for an order; `None` fields are left untouched.
/// The repository refreshes `updated_at` on every update.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
}
