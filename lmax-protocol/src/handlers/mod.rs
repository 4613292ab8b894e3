//! Specialized handlers, one module per LMAX message.
//!
//! Each message handler owns its scalar fields, any nested repeating-group
//! handlers, and the listeners for the events it builds.
//! [`stream::EventStreamHandler`] wires the event-stream handlers under one
//! root; [`response::ResponseDocument`] does the same for instruction
//! responses.

pub mod account;
pub mod historic;
pub mod order;
pub mod position;
pub mod response;
pub mod stream;

pub use account::{AccountStateHandler, WalletsHandler};
pub use historic::{HistoricMarketDataHandler, UrlHandler};
pub use order::{ExecutionGroup, ExecutionRecord, ExecutionsHandler, OrderEventHandler};
pub use position::PositionHandler;
pub use response::{InstructionResponseHandler, ResponseDocument};
pub use stream::EventStreamHandler;
