//! Order and execution events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderType, TimeInForce};

// ============================================================================
// Order
// ============================================================================

/// State of an order as reported by the venue.
///
/// Identifiers the venue has not assigned yet are empty strings. Fields that
/// only apply to some order types are `None` when the message left them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    // ----- Identification -----
    pub instruction_id: String,
    pub original_instruction_id: String,
    pub order_id: String,
    pub instrument_id: i64,
    pub account_id: i64,

    // ----- Quantities -----
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    pub filled_quantity: Decimal,
    pub cancelled_quantity: Decimal,

    // ----- Type -----
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,

    // ----- Stops -----
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_offset: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_profit_offset: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reference_price: Option<Decimal>,

    // ----- Costs / linkage -----
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_order_id: Option<String>,
}

impl Order {
    /// Quantity neither filled nor cancelled.
    pub fn remaining_quantity(&self) -> Decimal {
        self.quantity - self.filled_quantity - self.cancelled_quantity
    }

    pub fn is_buy(&self) -> bool {
        self.quantity.is_sign_positive() && !self.quantity.is_zero()
    }
}

// ============================================================================
// Execution
// ============================================================================

/// One fill or cancellation against an order.
///
/// A cancellation has zero `price` and `quantity` and a non-zero
/// `cancelled_quantity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub execution_id: i64,
    pub price: Decimal,
    pub quantity: Decimal,
    pub order: Order,
    pub cancelled_quantity: Decimal,
    pub encoded_execution_id: String,
}

impl Execution {
    pub fn is_cancellation(&self) -> bool {
        !self.cancelled_quantity.is_zero()
    }
}
