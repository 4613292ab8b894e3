//! `accountState` messages and their `wallet` repeating group.
//!
//! ```xml
//! <accountState>
//!   <accountId>42</accountId>
//!   <balance>1000.50</balance>
//!   ...
//!   <wallets>
//!     <wallet><currency>GBP</currency><balance>500</balance></wallet>
//!     <wallet><currency>USD</currency><balance>300</balance><netOpenPosition>10</netOpenPosition></wallet>
//!   </wallets>
//! </accountState>
//! ```
//!
//! The `wallets` envelope is not recognized and therefore transparent.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::mem;

use crate::builders::AccountStateBuilder;
use crate::fields::FieldAccumulator;
use crate::handler::ElementHandler;
use crate::listener::Listeners;
use crate::models::account::AccountStateEvent;
use crate::protocol::element;

// ============================================================================
// WalletsHandler
// ============================================================================

/// One `wallet` record per close: the balance is always recorded under its
/// currency, the net open position only when the record carried one.
#[derive(Debug)]
pub struct WalletsHandler {
    fields: FieldAccumulator,
    wallets: HashMap<String, Decimal>,
    net_open_positions: HashMap<String, Decimal>,
}

impl WalletsHandler {
    pub fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[
                element::CURRENCY,
                element::BALANCE,
                element::NET_OPEN_POSITION,
            ]),
            wallets: HashMap::new(),
            net_open_positions: HashMap::new(),
        }
    }

    /// Wallet balances collected so far, leaving the collection empty.
    pub fn take_wallets(&mut self) -> HashMap<String, Decimal> {
        mem::take(&mut self.wallets)
    }

    /// Net open positions collected so far, leaving the collection empty.
    pub fn take_net_open_positions(&mut self) -> HashMap<String, Decimal> {
        mem::take(&mut self.net_open_positions)
    }

    /// Drop the current scope and every collected record.
    pub fn clear(&mut self) {
        self.fields.reset();
        self.wallets.clear();
        self.net_open_positions.clear();
    }
}

impl Default for WalletsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for WalletsHandler {
    fn element_name(&self) -> &str {
        element::WALLET
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn end_element(&mut self, _content: &str) {
        let currency = self.fields.string(element::CURRENCY);
        self.wallets
            .insert(currency.clone(), self.fields.decimal(element::BALANCE));
        if let Some(position) = self.fields.decimal_opt(element::NET_OPEN_POSITION) {
            self.net_open_positions.insert(currency, position);
        }
    }
}

// ============================================================================
// AccountStateHandler
// ============================================================================

/// Assembles an [`AccountStateEvent`] each time an `accountState` closes.
#[derive(Debug)]
pub struct AccountStateHandler {
    fields: FieldAccumulator,
    wallets: WalletsHandler,
    listeners: Listeners<AccountStateEvent>,
}

impl AccountStateHandler {
    pub fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[
                element::ACCOUNT_ID,
                element::BALANCE,
                element::CASH,
                element::CREDIT,
                element::AVAILABLE_FUNDS,
                element::AVAILABLE_TO_WITHDRAW,
                element::UNREALISED_PROFIT_AND_LOSS,
                element::MARGIN,
                element::ACTIVE,
            ]),
            wallets: WalletsHandler::new(),
            listeners: Listeners::new(),
        }
    }

    pub fn on_account_state<F>(&mut self, listener: F)
    where
        F: FnMut(&AccountStateEvent) + Send + 'static,
    {
        self.listeners.register(listener);
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners<AccountStateEvent> {
        &mut self.listeners
    }

    fn build(&mut self) -> AccountStateEvent {
        let f = &self.fields;
        AccountStateBuilder::new()
            .account_id(f.i64(element::ACCOUNT_ID))
            .balance(f.decimal(element::BALANCE))
            .cash(f.decimal(element::CASH))
            .credit(f.decimal(element::CREDIT))
            .available_funds(f.decimal(element::AVAILABLE_FUNDS))
            .available_to_withdraw(f.decimal(element::AVAILABLE_TO_WITHDRAW))
            .unrealised_profit_and_loss(f.decimal(element::UNREALISED_PROFIT_AND_LOSS))
            .margin(f.decimal(element::MARGIN))
            .active(f.bool(element::ACTIVE))
            .wallets(self.wallets.take_wallets())
            .net_open_positions(self.wallets.take_net_open_positions())
            .build()
    }
}

impl Default for AccountStateHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for AccountStateHandler {
    fn element_name(&self) -> &str {
        element::ACCOUNT_STATE
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        if name == element::WALLET {
            Some(&mut self.wallets)
        } else {
            None
        }
    }

    fn end_element(&mut self, _content: &str) {
        let event = self.build();
        if self.listeners.publish(&event) == 0 {
            tracing::trace!(account_id = event.account_id, "account state with no listeners");
        }
    }

    fn reset(&mut self) {
        self.fields.reset();
        self.wallets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::handler::HandlerRegistry;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    fn leaf(handler: &mut dyn ElementHandler, name: &str, value: &str) {
        assert!(handler.fields_mut().unwrap().store(name, value));
    }

    #[test]
    fn wallet_records_balance_and_optional_position() {
        let mut wallets = WalletsHandler::new();

        leaf(&mut wallets, "currency", "GBP");
        leaf(&mut wallets, "balance", "500");
        wallets.end_element("");
        wallets.reset();

        leaf(&mut wallets, "currency", "USD");
        leaf(&mut wallets, "balance", "300");
        leaf(&mut wallets, "netOpenPosition", "10");
        wallets.end_element("");
        wallets.reset();

        let balances = wallets.take_wallets();
        let positions = wallets.take_net_open_positions();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances["GBP"], dec!(500));
        assert_eq!(positions.len(), 1);
        assert_eq!(positions["USD"], dec!(10));
        assert!(wallets.take_wallets().is_empty());
    }

    #[test]
    fn duplicate_currency_overwrites() {
        let mut wallets = WalletsHandler::new();
        for balance in ["1", "2"] {
            leaf(&mut wallets, "currency", "EUR");
            leaf(&mut wallets, "balance", balance);
            wallets.end_element("");
            wallets.reset();
        }
        assert_eq!(wallets.take_wallets(), HashMap::from([("EUR".into(), dec!(2))]));
    }

    #[test]
    fn event_built_without_listeners_and_state_cleared() {
        let mut handler = AccountStateHandler::new();
        leaf(&mut handler, "accountId", "1");
        leaf(handler.child_mut("wallet").unwrap(), "currency", "GBP");
        handler.child_mut("wallet").unwrap().end_element("");

        handler.end_element("");
        handler.reset();

        assert!(handler.fields().unwrap().is_empty());
        assert!(handler.wallets.take_wallets().is_empty());
    }

    #[test]
    fn decodes_through_dispatcher() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut handler = AccountStateHandler::new();
        {
            let seen = Arc::clone(&seen);
            handler.on_account_state(move |e| seen.lock().unwrap().push(e.clone()));
        }
        let mut d = Dispatcher::new(HandlerRegistry::new().with(handler));

        let events = [
            ("accountState", None),
            ("accountId", Some("42")),
            ("margin", Some("oops")),
            ("wallets", None),
            ("wallet", None),
            ("currency", Some("GBP")),
            ("balance", Some("500")),
        ];
        for (name, text) in events {
            d.enter_element(name).unwrap();
            if let Some(text) = text {
                d.text(text).unwrap();
                d.leave_element(name).unwrap();
            }
        }
        for name in ["wallet", "wallets", "accountState"] {
            d.leave_element(name).unwrap();
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].account_id, 42);
        assert_eq!(seen[0].margin, Decimal::ZERO);
        assert_eq!(seen[0].balance, Decimal::ZERO);
        assert_eq!(seen[0].wallet("GBP"), Some(dec!(500)));
    }
}
