//! Staging builders for domain events.
//!
//! A builder collects raw decoded values through a fluent chain of setters
//! and produces one event from [`build`](OrderBuilder::build). Builders are
//! consumed by `build`, so one cannot leak staged values into the next
//! message. No validation happens here: values are assembled exactly as
//! received.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::account::AccountStateEvent;
use crate::models::enums::{OrderType, TimeInForce};
use crate::models::order::{Execution, Order};
use crate::models::position::PositionEvent;

// ============================================================================
// AccountStateBuilder
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AccountStateBuilder {
    event: AccountStateEvent,
}

impl AccountStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(mut self, account_id: i64) -> Self {
        self.event.account_id = account_id;
        self
    }

    pub fn balance(mut self, balance: Decimal) -> Self {
        self.event.balance = balance;
        self
    }

    pub fn cash(mut self, cash: Decimal) -> Self {
        self.event.cash = cash;
        self
    }

    pub fn credit(mut self, credit: Decimal) -> Self {
        self.event.credit = credit;
        self
    }

    pub fn available_funds(mut self, available_funds: Decimal) -> Self {
        self.event.available_funds = available_funds;
        self
    }

    pub fn available_to_withdraw(mut self, available_to_withdraw: Decimal) -> Self {
        self.event.available_to_withdraw = available_to_withdraw;
        self
    }

    pub fn unrealised_profit_and_loss(mut self, value: Decimal) -> Self {
        self.event.unrealised_profit_and_loss = value;
        self
    }

    pub fn margin(mut self, margin: Decimal) -> Self {
        self.event.margin = margin;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.event.active = active;
        self
    }

    pub fn wallets(mut self, wallets: HashMap<String, Decimal>) -> Self {
        self.event.wallets = wallets;
        self
    }

    pub fn net_open_positions(mut self, net_open_positions: HashMap<String, Decimal>) -> Self {
        self.event.net_open_positions = net_open_positions;
        self
    }

    pub fn build(self) -> AccountStateEvent {
        self.event
    }
}

// ============================================================================
// OrderBuilder
// ============================================================================

/// Builder for [`Order`].
///
/// Order type and time in force can be given either as enums or as raw wire
/// tokens; tokens go through the legacy remap tables and resolve to
/// `Unknown` when unrecognized. Optional setters take anything convertible
/// into `Option`, so both `dec!(1.5)` and `None` are accepted.
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instruction_id(mut self, instruction_id: impl Into<String>) -> Self {
        self.order.instruction_id = instruction_id.into();
        self
    }

    pub fn original_instruction_id(mut self, original_instruction_id: impl Into<String>) -> Self {
        self.order.original_instruction_id = original_instruction_id.into();
        self
    }

    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order.order_id = order_id.into();
        self
    }

    pub fn instrument_id(mut self, instrument_id: i64) -> Self {
        self.order.instrument_id = instrument_id;
        self
    }

    pub fn account_id(mut self, account_id: i64) -> Self {
        self.order.account_id = account_id;
        self
    }

    pub fn price(mut self, price: impl Into<Option<Decimal>>) -> Self {
        self.order.price = price.into();
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.order.quantity = quantity;
        self
    }

    pub fn filled_quantity(mut self, filled_quantity: Decimal) -> Self {
        self.order.filled_quantity = filled_quantity;
        self
    }

    pub fn cancelled_quantity(mut self, cancelled_quantity: Decimal) -> Self {
        self.order.cancelled_quantity = cancelled_quantity;
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order.order_type = order_type;
        self
    }

    /// Set the order type from a wire token such as `STOP_COMPOUND_MARKET`.
    pub fn order_type_token(self, token: &str) -> Self {
        self.order_type(OrderType::from_wire(token))
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.order.time_in_force = time_in_force;
        self
    }

    /// Set the time in force from a wire token such as `GoodForDay`.
    pub fn time_in_force_token(self, token: &str) -> Self {
        self.time_in_force(TimeInForce::from_wire(token))
    }

    pub fn stop_loss_offset(mut self, offset: impl Into<Option<Decimal>>) -> Self {
        self.order.stop_loss_offset = offset.into();
        self
    }

    pub fn stop_profit_offset(mut self, offset: impl Into<Option<Decimal>>) -> Self {
        self.order.stop_profit_offset = offset.into();
        self
    }

    pub fn stop_reference_price(mut self, price: impl Into<Option<Decimal>>) -> Self {
        self.order.stop_reference_price = price.into();
        self
    }

    pub fn commission(mut self, commission: impl Into<Option<Decimal>>) -> Self {
        self.order.commission = commission.into();
        self
    }

    pub fn opening_order_id(mut self, opening_order_id: impl Into<Option<String>>) -> Self {
        self.order.opening_order_id = opening_order_id.into();
        self
    }

    pub fn build(self) -> Order {
        self.order
    }
}

// ============================================================================
// ExecutionBuilder
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ExecutionBuilder {
    execution: Execution,
}

impl ExecutionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execution_id(mut self, execution_id: i64) -> Self {
        self.execution.execution_id = execution_id;
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.execution.price = price;
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.execution.quantity = quantity;
        self
    }

    pub fn cancelled_quantity(mut self, cancelled_quantity: Decimal) -> Self {
        self.execution.cancelled_quantity = cancelled_quantity;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.execution.order = order;
        self
    }

    pub fn encoded_execution_id(mut self, encoded_execution_id: impl Into<String>) -> Self {
        self.execution.encoded_execution_id = encoded_execution_id.into();
        self
    }

    pub fn build(self) -> Execution {
        self.execution
    }
}

// ============================================================================
// PositionBuilder
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PositionBuilder {
    position: PositionEvent,
}

impl PositionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(mut self, account_id: i64) -> Self {
        self.position.account_id = account_id;
        self
    }

    pub fn instrument_id(mut self, instrument_id: i64) -> Self {
        self.position.instrument_id = instrument_id;
        self
    }

    pub fn valuation(mut self, valuation: Decimal) -> Self {
        self.position.valuation = valuation;
        self
    }

    pub fn short_unfilled_cost(mut self, cost: Decimal) -> Self {
        self.position.short_unfilled_cost = cost;
        self
    }

    pub fn long_unfilled_cost(mut self, cost: Decimal) -> Self {
        self.position.long_unfilled_cost = cost;
        self
    }

    pub fn open_quantity(mut self, open_quantity: Decimal) -> Self {
        self.position.open_quantity = open_quantity;
        self
    }

    pub fn cumulative_cost(mut self, cost: Decimal) -> Self {
        self.position.cumulative_cost = cost;
        self
    }

    pub fn open_cost(mut self, cost: Decimal) -> Self {
        self.position.open_cost = cost;
        self
    }

    pub fn build(self) -> PositionEvent {
        self.position
    }
}
