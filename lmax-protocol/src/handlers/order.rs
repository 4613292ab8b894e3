//! `order` messages and the executions nested inside them.
//!
//! ```xml
//! <order>
//!   <instructionId>..</instructionId> <orderId>..</orderId> ...
//!   <executions>
//!     <executionId>12</executionId>
//!     <execution><price>1.2345</price><quantity>2</quantity></execution>
//!     <execution><orderCancelled><quantity>1</quantity></orderCancelled></execution>
//!   </executions>
//! </order>
//! ```
//!
//! When `order` closes the handler publishes the [`Order`] first and then one
//! [`Execution`] per `execution` element, in document order.

use rust_decimal::Decimal;
use std::mem;

use crate::builders::{ExecutionBuilder, OrderBuilder};
use crate::fields::FieldAccumulator;
use crate::handler::ElementHandler;
use crate::listener::Listeners;
use crate::models::order::{Execution, Order};
use crate::protocol::element;

/// One `execution` element: a fill, or a cancellation when it carried an
/// `orderCancelled` child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub price: Decimal,
    pub quantity: Decimal,
    pub cancelled_quantity: Decimal,
}

// ============================================================================
// orderCancelled
// ============================================================================

#[derive(Debug)]
struct OrderCancelledHandler {
    fields: FieldAccumulator,
    cancelled: Option<Decimal>,
}

impl OrderCancelledHandler {
    fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[element::QUANTITY]),
            cancelled: None,
        }
    }
}

impl ElementHandler for OrderCancelledHandler {
    fn element_name(&self) -> &str {
        element::ORDER_CANCELLED
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn end_element(&mut self, _content: &str) {
        self.cancelled = Some(self.fields.decimal(element::QUANTITY));
    }
}

// ============================================================================
// execution
// ============================================================================

#[derive(Debug)]
struct ExecutionHandler {
    fields: FieldAccumulator,
    cancelled: OrderCancelledHandler,
    records: Vec<ExecutionRecord>,
}

impl ExecutionHandler {
    fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[element::PRICE, element::QUANTITY]),
            cancelled: OrderCancelledHandler::new(),
            records: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.reset();
        self.records.clear();
    }
}

impl ElementHandler for ExecutionHandler {
    fn element_name(&self) -> &str {
        element::EXECUTION
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        if name == element::ORDER_CANCELLED {
            Some(&mut self.cancelled)
        } else {
            None
        }
    }

    fn end_element(&mut self, _content: &str) {
        let record = match self.cancelled.cancelled.take() {
            Some(cancelled_quantity) => ExecutionRecord {
                cancelled_quantity,
                ..ExecutionRecord::default()
            },
            None => ExecutionRecord {
                price: self.fields.decimal(element::PRICE),
                quantity: self.fields.decimal(element::QUANTITY),
                cancelled_quantity: Decimal::ZERO,
            },
        };
        self.records.push(record);
    }

    fn reset(&mut self) {
        self.fields.reset();
        self.cancelled.fields.reset();
        self.cancelled.cancelled = None;
    }
}

// ============================================================================
// executions
// ============================================================================

/// What an `executions` element reported once it closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionGroup {
    pub execution_id: i64,
    pub encoded_execution_id: String,
    pub records: Vec<ExecutionRecord>,
}

#[derive(Debug)]
pub struct ExecutionsHandler {
    fields: FieldAccumulator,
    execution: ExecutionHandler,
    group: Option<ExecutionGroup>,
}

impl ExecutionsHandler {
    pub fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[
                element::EXECUTION_ID,
                element::ENCODED_EXECUTION_ID,
            ]),
            execution: ExecutionHandler::new(),
            group: None,
        }
    }

    /// The group collected since the last take, if an `executions` element
    /// closed in between.
    pub fn take_group(&mut self) -> Option<ExecutionGroup> {
        self.group.take()
    }

    pub fn clear(&mut self) {
        self.fields.reset();
        self.execution.clear();
        self.group = None;
    }
}

impl Default for ExecutionsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for ExecutionsHandler {
    fn element_name(&self) -> &str {
        element::EXECUTIONS
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        if name == element::EXECUTION {
            Some(&mut self.execution)
        } else {
            None
        }
    }

    fn end_element(&mut self, _content: &str) {
        self.group = Some(ExecutionGroup {
            execution_id: self.fields.i64(element::EXECUTION_ID),
            encoded_execution_id: self.fields.string(element::ENCODED_EXECUTION_ID),
            records: mem::take(&mut self.execution.records),
        });
    }
}

// ============================================================================
// order
// ============================================================================

/// Publishes [`Order`] and [`Execution`] events for every `order` element.
#[derive(Debug)]
pub struct OrderEventHandler {
    fields: FieldAccumulator,
    executions: ExecutionsHandler,
    order_listeners: Listeners<Order>,
    execution_listeners: Listeners<Execution>,
}

impl OrderEventHandler {
    pub fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[
                element::INSTRUCTION_ID,
                element::ORIGINAL_INSTRUCTION_ID,
                element::ORDER_ID,
                element::ACCOUNT_ID,
                element::INSTRUMENT_ID,
                element::PRICE,
                element::QUANTITY,
                element::MATCHED_QUANTITY,
                element::CANCELLED_QUANTITY,
                element::ORDER_TYPE,
                element::TIME_IN_FORCE,
                element::STOP_REFERENCE_PRICE,
                element::STOP_LOSS_OFFSET,
                element::STOP_PROFIT_OFFSET,
                element::COMMISSION,
                element::OPENING_ORDER_ID,
            ]),
            executions: ExecutionsHandler::new(),
            order_listeners: Listeners::new(),
            execution_listeners: Listeners::new(),
        }
    }

    pub fn on_order<F>(&mut self, listener: F)
    where
        F: FnMut(&Order) + Send + 'static,
    {
        self.order_listeners.register(listener);
    }

    pub fn on_execution<F>(&mut self, listener: F)
    where
        F: FnMut(&Execution) + Send + 'static,
    {
        self.execution_listeners.register(listener);
    }

    pub fn order_listeners_mut(&mut self) -> &mut Listeners<Order> {
        &mut self.order_listeners
    }

    pub fn execution_listeners_mut(&mut self) -> &mut Listeners<Execution> {
        &mut self.execution_listeners
    }

    fn build_order(&self) -> Order {
        let f = &self.fields;
        OrderBuilder::new()
            .instruction_id(f.string(element::INSTRUCTION_ID))
            .original_instruction_id(f.string(element::ORIGINAL_INSTRUCTION_ID))
            .order_id(f.string(element::ORDER_ID))
            .account_id(f.i64(element::ACCOUNT_ID))
            .instrument_id(f.i64(element::INSTRUMENT_ID))
            .price(f.decimal_opt(element::PRICE))
            .quantity(f.decimal(element::QUANTITY))
            .filled_quantity(f.decimal(element::MATCHED_QUANTITY))
            .cancelled_quantity(f.decimal(element::CANCELLED_QUANTITY))
            .order_type_token(&f.string(element::ORDER_TYPE))
            .time_in_force_token(&f.string(element::TIME_IN_FORCE))
            .stop_reference_price(f.decimal_opt(element::STOP_REFERENCE_PRICE))
            .stop_loss_offset(f.decimal_opt(element::STOP_LOSS_OFFSET))
            .stop_profit_offset(f.decimal_opt(element::STOP_PROFIT_OFFSET))
            .commission(f.decimal_opt(element::COMMISSION))
            .opening_order_id(f.string_opt(element::OPENING_ORDER_ID))
            .build()
    }
}

impl Default for OrderEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for OrderEventHandler {
    fn element_name(&self) -> &str {
        element::ORDER
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        if name == element::EXECUTIONS {
            Some(&mut self.executions)
        } else {
            None
        }
    }

    fn end_element(&mut self, _content: &str) {
        let order = self.build_order();
        if self.order_listeners.publish(&order) == 0 {
            tracing::trace!(order_id = %order.order_id, "order with no listeners");
        }

        let Some(group) = self.executions.take_group() else {
            return;
        };
        for record in group.records {
            let execution = ExecutionBuilder::new()
                .execution_id(group.execution_id)
                .encoded_execution_id(group.encoded_execution_id.clone())
                .price(record.price)
                .quantity(record.quantity)
                .cancelled_quantity(record.cancelled_quantity)
                .order(order.clone())
                .build();
            self.execution_listeners.publish(&execution);
        }
    }

    fn reset(&mut self) {
        self.fields.reset();
        self.executions.clear();
    }
}
