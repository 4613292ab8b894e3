//! Outbound trading requests.
//!
//! Each request knows the path it is posted to, how to validate itself, and
//! how to write its fields inside the `<req><body>` envelope. Encoding goes
//! through [`encode_request`](crate::encoder::encode_request), which validates
//! before writing anything.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::encoder::MessageEncoder;
use crate::errors::{LmaxApiError, Result};
use crate::models::enums::{
    AggregateOption, AggregateResolution, SubscriptionType, TimeInForce,
};
use crate::protocol::{element, request, uri};

/// A request that can be posted to the venue.
pub trait Request {
    /// Path of the endpoint, relative to the venue's base URL.
    fn uri(&self) -> &'static str;

    /// Reject the request before encoding if a mandatory field is missing.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Write the request's fields. Called inside `<req><body>`.
    fn write_body(&self, enc: &mut MessageEncoder);
}

// ============================================================================
// Closing orders
// ============================================================================

/// Close out a position, either for a whole instrument or for the fills of
/// one earlier order.
///
/// `quantity` is mandatory. An `instrument_id` of `0` means "not set" and is
/// not written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingOrderSpecification {
    pub instruction_id: Option<String>,
    pub instrument_id: i64,
    pub original_instruction_id: Option<String>,
    pub quantity: Option<Decimal>,
}

impl ClosingOrderSpecification {
    /// Close `quantity` of the whole position held in `instrument_id`.
    pub fn for_instrument(instrument_id: i64, quantity: Decimal) -> Self {
        Self {
            instrument_id,
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    /// Close `quantity` of the position opened by `original_instruction_id`.
    pub fn for_order(
        instrument_id: i64,
        original_instruction_id: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        Self {
            instrument_id,
            original_instruction_id: Some(original_instruction_id.into()),
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn with_instruction_id(mut self, instruction_id: impl Into<String>) -> Self {
        self.instruction_id = Some(instruction_id.into());
        self
    }
}

impl Request for ClosingOrderSpecification {
    fn uri(&self) -> &'static str {
        if self.original_instruction_id.is_some() {
            uri::CLOSE_OUT_ORDER
        } else {
            uri::CLOSE_OUT_INSTRUMENT_POSITION
        }
    }

    fn validate(&self) -> Result<()> {
        if self.quantity.is_none() {
            return Err(LmaxApiError::InvalidRequest("Quantity required".into()));
        }
        Ok(())
    }

    fn write_body(&self, enc: &mut MessageEncoder) {
        enc.value_or_none(element::INSTRUCTION_ID, self.instruction_id.as_deref())
            .value_or_none(
                element::INSTRUMENT_ID,
                (self.instrument_id != 0).then_some(self.instrument_id),
            )
            .value_or_none(
                element::ORIGINAL_INSTRUCTION_ID,
                self.original_instruction_id.as_deref(),
            )
            .value_or_none(element::QUANTITY, self.quantity);
    }
}

// ============================================================================
// Amending stops
// ============================================================================

/// Change (or remove) the stop-loss and stop-profit offsets of a working
/// order. An absent offset is written as an empty element, which clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendStopLossProfitRequest {
    pub instrument_id: i64,
    pub original_instruction_id: String,
    pub instruction_id: String,
    pub stop_loss_offset: Option<Decimal>,
    pub stop_profit_offset: Option<Decimal>,
    pub stop_loss_instruction_id: Option<String>,
    pub stop_profit_instruction_id: Option<String>,
}

impl AmendStopLossProfitRequest {
    pub fn new(
        instrument_id: i64,
        original_instruction_id: impl Into<String>,
        instruction_id: impl Into<String>,
    ) -> Self {
        Self {
            instrument_id,
            original_instruction_id: original_instruction_id.into(),
            instruction_id: instruction_id.into(),
            ..Self::default()
        }
    }

    pub fn with_stop_loss_offset(mut self, offset: Decimal) -> Self {
        self.stop_loss_offset = Some(offset);
        self
    }

    pub fn with_stop_profit_offset(mut self, offset: Decimal) -> Self {
        self.stop_profit_offset = Some(offset);
        self
    }
}

impl Request for AmendStopLossProfitRequest {
    fn uri(&self) -> &'static str {
        uri::AMEND_ORDER
    }

    fn write_body(&self, enc: &mut MessageEncoder) {
        enc.value(element::INSTRUMENT_ID, &self.instrument_id)
            .value(element::ORIGINAL_INSTRUCTION_ID, &self.original_instruction_id)
            .value(element::INSTRUCTION_ID, &self.instruction_id)
            .value_or_empty(element::STOP_LOSS_OFFSET, self.stop_loss_offset)
            .value_or_none(
                request::STOP_LOSS_INSTRUCTION_ID,
                self.stop_loss_instruction_id.as_deref(),
            )
            .value_or_empty(element::STOP_PROFIT_OFFSET, self.stop_profit_offset)
            .value_or_none(
                request::STOP_PROFIT_INSTRUCTION_ID,
                self.stop_profit_instruction_id.as_deref(),
            );
    }
}

// ============================================================================
// Placing orders
// ============================================================================

/// A limit order. Positive quantities buy, negative quantities sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrderSpecification {
    pub instruction_id: String,
    pub instrument_id: i64,
    pub price: Decimal,
    pub quantity: Decimal,
    pub time_in_force: TimeInForce,
    pub stop_loss_price_offset: Option<Decimal>,
    pub stop_profit_price_offset: Option<Decimal>,
}

impl LimitOrderSpecification {
    pub fn new(
        instruction_id: impl Into<String>,
        instrument_id: i64,
        price: Decimal,
        quantity: Decimal,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            instruction_id: instruction_id.into(),
            instrument_id,
            price,
            quantity,
            time_in_force,
            stop_loss_price_offset: None,
            stop_profit_price_offset: None,
        }
    }
}

impl Request for LimitOrderSpecification {
    fn uri(&self) -> &'static str {
        uri::PLACE_ORDER
    }

    fn validate(&self) -> Result<()> {
        validate_order(self.quantity, self.time_in_force)
    }

    fn write_body(&self, enc: &mut MessageEncoder) {
        enc.start_element(element::ORDER)
            .value(element::INSTRUMENT_ID, &self.instrument_id)
            .value(element::INSTRUCTION_ID, &self.instruction_id)
            .value(element::PRICE, &self.price)
            .value(element::QUANTITY, &self.quantity)
            .value(element::TIME_IN_FORCE, &self.time_in_force)
            .value_or_empty(element::STOP_LOSS_OFFSET, self.stop_loss_price_offset)
            .value_or_empty(element::STOP_PROFIT_OFFSET, self.stop_profit_price_offset)
            .end_element(element::ORDER);
    }
}

/// A market order: filled at the best available price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrderSpecification {
    pub instruction_id: String,
    pub instrument_id: i64,
    pub quantity: Decimal,
    pub time_in_force: TimeInForce,
    pub stop_loss_price_offset: Option<Decimal>,
    pub stop_profit_price_offset: Option<Decimal>,
}

impl MarketOrderSpecification {
    pub fn new(
        instruction_id: impl Into<String>,
        instrument_id: i64,
        quantity: Decimal,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            instruction_id: instruction_id.into(),
            instrument_id,
            quantity,
            time_in_force,
            stop_loss_price_offset: None,
            stop_profit_price_offset: None,
        }
    }
}

impl Request for MarketOrderSpecification {
    fn uri(&self) -> &'static str {
        uri::PLACE_ORDER
    }

    fn validate(&self) -> Result<()> {
        validate_order(self.quantity, self.time_in_force)
    }

    fn write_body(&self, enc: &mut MessageEncoder) {
        enc.start_element(element::ORDER)
            .value(element::INSTRUMENT_ID, &self.instrument_id)
            .value(element::INSTRUCTION_ID, &self.instruction_id)
            .value(element::QUANTITY, &self.quantity)
            .value(element::TIME_IN_FORCE, &self.time_in_force)
            .value_or_empty(element::STOP_LOSS_OFFSET, self.stop_loss_price_offset)
            .value_or_empty(element::STOP_PROFIT_OFFSET, self.stop_profit_price_offset)
            .end_element(element::ORDER);
    }
}

fn validate_order(quantity: Decimal, time_in_force: TimeInForce) -> Result<()> {
    if quantity.is_zero() {
        return Err(LmaxApiError::InvalidRequest("Quantity must be non-zero".into()));
    }
    if time_in_force == TimeInForce::Unknown {
        return Err(LmaxApiError::InvalidRequest("Time in force required".into()));
    }
    Ok(())
}

// ============================================================================
// Cancelling orders
// ============================================================================

/// Cancel the unfilled part of the order placed as `original_instruction_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub instrument_id: i64,
    pub original_instruction_id: String,
    pub instruction_id: Option<String>,
}

impl CancelOrderRequest {
    pub fn new(instrument_id: i64, original_instruction_id: impl Into<String>) -> Self {
        Self {
            instrument_id,
            original_instruction_id: original_instruction_id.into(),
            instruction_id: None,
        }
    }
}

impl Request for CancelOrderRequest {
    fn uri(&self) -> &'static str {
        uri::CANCEL_ORDER
    }

    fn validate(&self) -> Result<()> {
        if self.original_instruction_id.is_empty() {
            return Err(LmaxApiError::InvalidRequest(
                "Original instruction id required".into(),
            ));
        }
        Ok(())
    }

    fn write_body(&self, enc: &mut MessageEncoder) {
        enc.value(element::INSTRUMENT_ID, &self.instrument_id)
            .value(element::ORIGINAL_INSTRUCTION_ID, &self.original_instruction_id)
            .value_or_none(element::INSTRUCTION_ID, self.instruction_id.as_deref());
    }
}

// ============================================================================
// Historic market data
// ============================================================================

/// What a historic market data request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricDataKind {
    /// Bars at `resolution` for each requested side.
    Aggregate {
        options: Vec<AggregateOption>,
        resolution: AggregateResolution,
    },
    /// Order book snapshots for each requested side.
    OrderBook { options: Vec<AggregateOption> },
}

/// Ask the venue for the locations of historic data files.
///
/// The answer arrives on the event stream as a `historicMarketData` event
/// carrying the same instruction id. `from` and `to` are Unix epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricMarketDataRequest {
    pub instruction_id: String,
    pub order_book_id: i64,
    pub from: i64,
    pub to: i64,
    pub depth: u32,
    pub kind: HistoricDataKind,
}

impl HistoricMarketDataRequest {
    /// Bars of one side of the book.
    pub fn aggregate(
        instruction_id: impl Into<String>,
        order_book_id: i64,
        from: i64,
        to: i64,
        option: AggregateOption,
        resolution: AggregateResolution,
    ) -> Self {
        Self {
            instruction_id: instruction_id.into(),
            order_book_id,
            from,
            to,
            depth: 1,
            kind: HistoricDataKind::Aggregate {
                options: vec![option],
                resolution,
            },
        }
    }

    /// Best bid and ask over time.
    pub fn top_of_book(
        instruction_id: impl Into<String>,
        order_book_id: i64,
        from: i64,
        to: i64,
    ) -> Self {
        Self {
            instruction_id: instruction_id.into(),
            order_book_id,
            from,
            to,
            depth: 1,
            kind: HistoricDataKind::OrderBook {
                options: vec![AggregateOption::Bid, AggregateOption::Ask],
            },
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    fn options(&self) -> &[AggregateOption] {
        match &self.kind {
            HistoricDataKind::Aggregate { options, .. } | HistoricDataKind::OrderBook { options } => {
                options.as_slice()
            }
        }
    }
}

impl Request for HistoricMarketDataRequest {
    fn uri(&self) -> &'static str {
        uri::REQUEST_HISTORIC_MARKET_DATA
    }

    fn validate(&self) -> Result<()> {
        if self.from > self.to {
            return Err(LmaxApiError::InvalidRequest(format!(
                "Time range starts after it ends ({} > {})",
                self.from, self.to
            )));
        }
        if self.options().is_empty() {
            return Err(LmaxApiError::InvalidRequest("At least one option required".into()));
        }
        if self.depth == 0 {
            return Err(LmaxApiError::InvalidRequest("Depth must be at least 1".into()));
        }
        Ok(())
    }

    fn write_body(&self, enc: &mut MessageEncoder) {
        let (group, resolution) = match &self.kind {
            HistoricDataKind::Aggregate { resolution, .. } => (request::AGGREGATE, Some(resolution)),
            HistoricDataKind::OrderBook { .. } => (request::ORDER_BOOK, None),
        };

        enc.value(element::INSTRUCTION_ID, &self.instruction_id)
            .value(request::ORDER_BOOK_ID, &self.order_book_id)
            .value(request::FROM, &self.from)
            .value(request::TO, &self.to)
            .start_element(group)
            .start_element(request::OPTIONS);
        for option in self.options() {
            enc.value(request::OPTION, option);
        }
        enc.end_element(request::OPTIONS)
            .value_or_none(request::RESOLUTION, resolution)
            .value(request::DEPTH, &self.depth)
            .value(request::FORMAT, request::FORMAT_CSV)
            .end_element(group);
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Enable one kind of event on the session's event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub subscription_type: SubscriptionType,
}

impl SubscriptionRequest {
    pub fn new(subscription_type: SubscriptionType) -> Self {
        Self { subscription_type }
    }
}

impl Request for SubscriptionRequest {
    fn uri(&self) -> &'static str {
        uri::SUBSCRIBE
    }

    fn write_body(&self, enc: &mut MessageEncoder) {
        enc.start_element(request::SUBSCRIPTION)
            .value(request::TYPE, &self.subscription_type)
            .end_element(request::SUBSCRIPTION);
    }
}
