//! Domain events and enums produced by the decoder.
//!
//! Events are plain values assembled once by a builder and then handed to
//! listeners; the decoder keeps no reference to them afterwards.

pub mod account;
pub mod enums;
pub mod market_data;
pub mod order;
pub mod position;
