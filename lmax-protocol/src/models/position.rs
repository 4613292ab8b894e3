//! Position events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Open position on one instrument, published for every `position` message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionEvent {
    pub account_id: i64,
    pub instrument_id: i64,
    pub valuation: Decimal,
    pub short_unfilled_cost: Decimal,
    pub long_unfilled_cost: Decimal,
    pub open_quantity: Decimal,
    pub cumulative_cost: Decimal,
    pub open_cost: Decimal,
}

impl PositionEvent {
    /// True when the position is flat.
    pub fn is_closed(&self) -> bool {
        self.open_quantity.is_zero()
    }
}
