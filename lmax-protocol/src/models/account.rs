//! Account state snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// AccountStateEvent
// ============================================================================

/// Snapshot of an account's funds, published for every `accountState` message.
///
/// `wallets` holds one balance per currency seen in the message.
/// `net_open_positions` only has entries for wallets that reported a net open
/// position; a missing key means "not reported", not zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStateEvent {
    pub account_id: i64,
    pub balance: Decimal,
    pub cash: Decimal,
    pub credit: Decimal,
    pub available_funds: Decimal,
    pub available_to_withdraw: Decimal,
    pub unrealised_profit_and_loss: Decimal,
    pub margin: Decimal,
    pub active: bool,
    pub wallets: HashMap<String, Decimal>,
    pub net_open_positions: HashMap<String, Decimal>,
}

impl AccountStateEvent {
    /// Balance of the wallet held in `currency`, if the message carried one.
    pub fn wallet(&self, currency: &str) -> Option<Decimal> {
        self.wallets.get(currency).copied()
    }

    pub fn net_open_position(&self, currency: &str) -> Option<Decimal> {
        self.net_open_positions.get(currency).copied()
    }
}
