//! Root handler for the LMAX event stream.
//!
//! The stream is one long document, `<events><body>...</body></events>`,
//! whose body holds any number of messages. [`EventStreamHandler`] recognizes
//! every message this crate decodes; the `events` and `body` envelopes are
//! unrecognized and pass through transparently.

use tokio::sync::mpsc;

use crate::handler::ElementHandler;
use crate::models::account::AccountStateEvent;
use crate::models::market_data::HistoricMarketDataEvent;
use crate::models::order::{Execution, Order};
use crate::models::position::PositionEvent;
use crate::protocol::element;
use crate::wrapper::LmaxEvent;

use super::account::AccountStateHandler;
use super::historic::HistoricMarketDataHandler;
use super::order::OrderEventHandler;
use super::position::PositionHandler;

/// Handler tree root with one typed handler per stream message.
#[derive(Debug, Default)]
pub struct EventStreamHandler {
    account_state: AccountStateHandler,
    order: OrderEventHandler,
    position: PositionHandler,
    historic_market_data: HistoricMarketDataHandler,
}

impl EventStreamHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_account_state<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&AccountStateEvent) + Send + 'static,
    {
        self.account_state.on_account_state(listener);
        self
    }

    pub fn on_order<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&Order) + Send + 'static,
    {
        self.order.on_order(listener);
        self
    }

    pub fn on_execution<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&Execution) + Send + 'static,
    {
        self.order.on_execution(listener);
        self
    }

    pub fn on_position<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&PositionEvent) + Send + 'static,
    {
        self.position.on_position(listener);
        self
    }

    pub fn on_historic_market_data<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&HistoricMarketDataEvent) + Send + 'static,
    {
        self.historic_market_data.on_historic_market_data(listener);
        self
    }

    /// Register listeners sending every event into `tx` as an [`LmaxEvent`].
    pub fn forward_to(&mut self, tx: mpsc::UnboundedSender<LmaxEvent>) -> &mut Self {
        let sender = tx.clone();
        self.on_account_state(move |e| forward(&sender, LmaxEvent::AccountState(e.clone())));
        let sender = tx.clone();
        self.on_order(move |e| forward(&sender, LmaxEvent::Order(e.clone())));
        let sender = tx.clone();
        self.on_execution(move |e| forward(&sender, LmaxEvent::Execution(e.clone())));
        let sender = tx.clone();
        self.on_position(move |e| forward(&sender, LmaxEvent::Position(e.clone())));
        self.on_historic_market_data(move |e| {
            forward(&tx, LmaxEvent::HistoricMarketData(e.clone()))
        });
        self
    }

    pub fn account_state_mut(&mut self) -> &mut AccountStateHandler {
        &mut self.account_state
    }

    pub fn order_mut(&mut self) -> &mut OrderEventHandler {
        &mut self.order
    }

    pub fn position_mut(&mut self) -> &mut PositionHandler {
        &mut self.position
    }

    pub fn historic_market_data_mut(&mut self) -> &mut HistoricMarketDataHandler {
        &mut self.historic_market_data
    }
}

fn forward(tx: &mpsc::UnboundedSender<LmaxEvent>, event: LmaxEvent) {
    if tx.send(event).is_err() {
        tracing::trace!("event channel closed, dropping event");
    }
}

impl ElementHandler for EventStreamHandler {
    fn element_name(&self) -> &str {
        ""
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        match name {
            element::ACCOUNT_STATE => Some(&mut self.account_state),
            element::ORDER => Some(&mut self.order),
            element::POSITION => Some(&mut self.position),
            element::HISTORIC_MARKET_DATA => Some(&mut self.historic_market_data),
            _ => None,
        }
    }

    fn end_element(&mut self, _content: &str) {}
}
