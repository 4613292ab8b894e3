//! lmax-protocol -- streaming decoder and request encoder for the LMAX XML
//! trading protocol.
//!
//! Inbound, a tree of element handlers receives enter/text/leave
//! notifications, accumulates scalar fields per element scope and, each time
//! a message element closes, builds an immutable domain event and hands it to
//! the listeners registered for it. Outbound, request objects are validated
//! and written as `<req><body>...</body></req>` documents.
//!
//! ## Modules
//!
//! - [`dispatcher`] -- Stack-based router driving the handler tree
//! - [`handler`] -- `ElementHandler` trait, `CompositeHandler`, `HandlerRegistry`
//! - [`handlers`] -- Handlers for account state, orders, positions, historic data, responses
//! - [`fields`] -- Per-scope field storage with lenient typed reads
//! - [`listener`] -- Ordered listener lists
//! - [`builders`] -- Fluent builders for the domain events
//! - [`models`] -- Domain events and enums (AccountStateEvent, Order, Execution, ...)
//! - [`requests`] -- Outbound request types (orders, stops, historic data, subscriptions)
//! - [`encoder`] -- XML request encoding
//! - [`reader`] -- quick-xml driven readers (in-memory and async stream)
//! - [`wrapper`] -- LmaxEvent enum for channel delivery
//! - [`protocol`] -- Element names and request paths
//! - [`config`] -- Client options
//! - [`errors`] -- Error types for the library
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut root = EventStreamHandler::new();
//! root.on_account_state(|state| println!("balance {}", state.balance));
//!
//! let mut dispatcher = Dispatcher::new(root);
//! decode_str(&mut dispatcher, "<events><body><accountState>...</accountState></body></events>")?;
//! ```

pub mod builders;
pub mod config;
pub mod dispatcher;
pub mod encoder;
pub mod errors;
pub mod fields;
pub mod handler;
pub mod handlers;
pub mod listener;
pub mod models;
pub mod protocol;
pub mod reader;
pub mod requests;
pub mod wrapper;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use errors::{LmaxApiError, Result};

// Decoding core
pub use dispatcher::Dispatcher;
pub use fields::FieldAccumulator;
pub use handler::{CompositeHandler, ElementHandler, HandlerRegistry};
pub use listener::{Listener, Listeners};

// Message handlers
pub use handlers::{
    AccountStateHandler, EventStreamHandler, HistoricMarketDataHandler, InstructionResponseHandler,
    OrderEventHandler, PositionHandler, ResponseDocument,
};

// Events
pub use models::account::AccountStateEvent;
pub use models::enums::{
    AggregateOption, AggregateResolution, OrderType, SubscriptionType, TimeInForce,
};
pub use models::market_data::HistoricMarketDataEvent;
pub use models::order::{Execution, Order};
pub use models::position::PositionEvent;

// Builders
pub use builders::{AccountStateBuilder, ExecutionBuilder, OrderBuilder, PositionBuilder};

// Requests / Encoder
pub use encoder::{encode_request, MessageEncoder};
pub use requests::{
    AmendStopLossProfitRequest, CancelOrderRequest, ClosingOrderSpecification, HistoricDataKind,
    HistoricMarketDataRequest, LimitOrderSpecification, MarketOrderSpecification, Request,
    SubscriptionRequest,
};

// Reader / Events / Config
pub use config::ApiOptions;
pub use reader::{decode_instruction_response, decode_str, MessageReader};
pub use wrapper::LmaxEvent;
