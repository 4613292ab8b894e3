//! `position` messages.

use crate::builders::PositionBuilder;
use crate::fields::FieldAccumulator;
use crate::handler::ElementHandler;
use crate::listener::Listeners;
use crate::models::position::PositionEvent;
use crate::protocol::element;

#[derive(Debug)]
pub struct PositionHandler {
    fields: FieldAccumulator,
    listeners: Listeners<PositionEvent>,
}

impl PositionHandler {
    pub fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[
                element::ACCOUNT_ID,
                element::INSTRUMENT_ID,
                element::VALUATION,
                element::SHORT_UNFILLED_COST,
                element::LONG_UNFILLED_COST,
                element::OPEN_QUANTITY,
                element::CUMULATIVE_COST,
                element::OPEN_COST,
            ]),
            listeners: Listeners::new(),
        }
    }

    pub fn on_position<F>(&mut self, listener: F)
    where
        F: FnMut(&PositionEvent) + Send + 'static,
    {
        self.listeners.register(listener);
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners<PositionEvent> {
        &mut self.listeners
    }
}

impl Default for PositionHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for PositionHandler {
    fn element_name(&self) -> &str {
        element::POSITION
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn end_element(&mut self, _content: &str) {
        let f = &self.fields;
        let event = PositionBuilder::new()
            .account_id(f.i64(element::ACCOUNT_ID))
            .instrument_id(f.i64(element::INSTRUMENT_ID))
            .valuation(f.decimal(element::VALUATION))
            .short_unfilled_cost(f.decimal(element::SHORT_UNFILLED_COST))
            .long_unfilled_cost(f.decimal(element::LONG_UNFILLED_COST))
            .open_quantity(f.decimal(element::OPEN_QUANTITY))
            .cumulative_cost(f.decimal(element::CUMULATIVE_COST))
            .open_cost(f.decimal(element::OPEN_COST))
            .build();
        if self.listeners.publish(&event) == 0 {
            tracing::trace!(instrument_id = event.instrument_id, "position with no listeners");
        }
    }
}
