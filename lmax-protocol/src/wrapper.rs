//! LMAX event types for channel delivery.
//!
//! Defines `LmaxEvent`, one variant per event the decoder can produce. Code
//! that prefers a single stream of events over per-message callbacks receives
//! them through the `tokio::sync::mpsc::UnboundedReceiver<LmaxEvent>` returned
//! by [`MessageReader::spawn`](crate::reader::MessageReader::spawn), or wires
//! its own channel with
//! [`EventStreamHandler::forward_to`](crate::handlers::stream::EventStreamHandler::forward_to).

use crate::models::account::AccountStateEvent;
use crate::models::market_data::HistoricMarketDataEvent;
use crate::models::order::{Execution, Order};
use crate::models::position::PositionEvent;

// ============================================================================
// LmaxEvent
// ============================================================================

/// Every event the LMAX event stream decodes to.
///
/// ## Usage
///
/// ```rust,ignore
/// let (mut rx, handle) = MessageReader::new(stream).spawn();
///
/// while let Some(event) = rx.recv().await {
///     match event {
///         LmaxEvent::AccountState(state) => { /* ... */ },
///         LmaxEvent::Execution(execution) => { /* ... */ },
///         LmaxEvent::StreamClosed => break,
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum LmaxEvent {
    // ========================================================================
    // Account
    // ========================================================================

    /// An `accountState` message closed.
    AccountState(AccountStateEvent),

    /// A `position` message closed.
    Position(PositionEvent),

    // ========================================================================
    // Orders
    // ========================================================================

    /// An `order` message closed. Sent before the order's executions.
    Order(Order),

    /// One `execution` inside an `order`, carrying a copy of that order.
    Execution(Execution),

    // ========================================================================
    // Market data
    // ========================================================================

    /// A `historicMarketData` message closed.
    HistoricMarketData(HistoricMarketDataEvent),

    // ========================================================================
    // Stream
    // ========================================================================

    /// Decoding stopped on a fatal error. Followed by `StreamClosed`.
    Error(String),

    /// The underlying stream ended. Always the last event.
    StreamClosed,
}

impl LmaxEvent {
    /// The wire element that produced this event, if any.
    pub fn element_name(&self) -> Option<&'static str> {
        use crate::protocol::element;
        match self {
            Self::AccountState(_) => Some(element::ACCOUNT_STATE),
            Self::Position(_) => Some(element::POSITION),
            Self::Order(_) => Some(element::ORDER),
            Self::Execution(_) => Some(element::EXECUTION),
            Self::HistoricMarketData(_) => Some(element::HISTORIC_MARKET_DATA),
            Self::Error(_) | Self::StreamClosed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_names() {
        assert_eq!(
            LmaxEvent::AccountState(AccountStateEvent::default()).element_name(),
            Some("accountState")
        );
        assert_eq!(
            LmaxEvent::Execution(Execution::default()).element_name(),
            Some("execution")
        );
        assert_eq!(LmaxEvent::StreamClosed.element_name(), None);
    }
}
