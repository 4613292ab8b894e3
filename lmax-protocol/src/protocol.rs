//! LMAX protocol vocabulary.
//!
//! Element names are bit-exact with the venue's XML and must not be changed.
//! They are grouped by the message that owns them; a name such as `balance`
//! is reused by several messages and only means something relative to the
//! handler whose scope it appears in.

// ============================================================================
// Inbound element names
// ============================================================================

/// Element names seen on the event stream and in responses.
pub mod element {
    // ----- accountState -----
    pub const ACCOUNT_STATE: &str = "accountState";
    pub const ACCOUNT_ID: &str = "accountId";
    pub const BALANCE: &str = "balance";
    pub const CASH: &str = "cash";
    pub const CREDIT: &str = "credit";
    pub const AVAILABLE_FUNDS: &str = "availableFunds";
    pub const AVAILABLE_TO_WITHDRAW: &str = "availableToWithdraw";
    pub const UNREALISED_PROFIT_AND_LOSS: &str = "unrealisedProfitAndLoss";
    pub const MARGIN: &str = "margin";
    pub const ACTIVE: &str = "active";

    // ----- wallet (repeating group inside accountState) -----
    pub const WALLET: &str = "wallet";
    pub const CURRENCY: &str = "currency";
    pub const NET_OPEN_POSITION: &str = "netOpenPosition";

    // ----- historicMarketData -----
    pub const HISTORIC_MARKET_DATA: &str = "historicMarketData";
    pub const INSTRUCTION_ID: &str = "instructionId";
    pub const URL: &str = "url";

    // ----- order -----
    pub const ORDER: &str = "order";
    pub const ORIGINAL_INSTRUCTION_ID: &str = "originalInstructionId";
    pub const ORDER_ID: &str = "orderId";
    pub const INSTRUMENT_ID: &str = "instrumentId";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
    pub const MATCHED_QUANTITY: &str = "matchedQuantity";
    pub const CANCELLED_QUANTITY: &str = "cancelledQuantity";
    pub const ORDER_TYPE: &str = "orderType";
    pub const TIME_IN_FORCE: &str = "timeInForce";
    pub const STOP_REFERENCE_PRICE: &str = "stopReferencePrice";
    pub const STOP_LOSS_OFFSET: &str = "stopLossOffset";
    pub const STOP_PROFIT_OFFSET: &str = "stopProfitOffset";
    pub const COMMISSION: &str = "commission";
    pub const OPENING_ORDER_ID: &str = "openingOrderId";

    // ----- executions (nested inside order) -----
    pub const EXECUTIONS: &str = "executions";
    pub const EXECUTION_ID: &str = "executionId";
    pub const ENCODED_EXECUTION_ID: &str = "encodedExecutionId";
    pub const EXECUTION: &str = "execution";
    pub const ORDER_CANCELLED: &str = "orderCancelled";

    // ----- position -----
    pub const POSITION: &str = "position";
    pub const VALUATION: &str = "valuation";
    pub const SHORT_UNFILLED_COST: &str = "shortUnfilledCost";
    pub const LONG_UNFILLED_COST: &str = "longUnfilledCost";
    pub const OPEN_QUANTITY: &str = "openQuantity";
    pub const CUMULATIVE_COST: &str = "cumulativeCost";
    pub const OPEN_COST: &str = "openCost";

    // ----- generic response -----
    pub const BODY: &str = "body";
}

// ============================================================================
// Outbound request structure
// ============================================================================

/// Element names used only when writing requests.
pub mod request {
    /// Root element of every outbound request.
    pub const REQ: &str = "req";
    /// Wrapper around the request's own fields.
    pub const BODY: &str = super::element::BODY;
    pub const STOP_LOSS_INSTRUCTION_ID: &str = "stopLossInstructionId";
    pub const STOP_PROFIT_INSTRUCTION_ID: &str = "stopProfitInstructionId";

    // ----- historic market data request -----
    pub const ORDER_BOOK_ID: &str = "orderBookId";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const AGGREGATE: &str = "aggregate";
    pub const ORDER_BOOK: &str = "orderBook";
    pub const OPTIONS: &str = "options";
    pub const OPTION: &str = "option";
    pub const RESOLUTION: &str = "resolution";
    pub const DEPTH: &str = "depth";
    pub const FORMAT: &str = "format";
    /// Only file format the venue serves.
    pub const FORMAT_CSV: &str = "CSV";

    // ----- subscription -----
    pub const SUBSCRIPTION: &str = "subscription";
    pub const TYPE: &str = "type";
}

/// Request paths, relative to the venue's base URL.
pub mod uri {
    pub const PLACE_ORDER: &str = "/secure/trade/placeOrder";
    pub const AMEND_ORDER: &str = "/secure/trade/amendOrder";
    pub const CANCEL_ORDER: &str = "/secure/trade/cancel";
    pub const CLOSE_OUT_ORDER: &str = "/secure/trade/closeOutOrder";
    pub const CLOSE_OUT_INSTRUMENT_POSITION: &str = "/secure/trade/closeOutInstrumentPosition";
    pub const REQUEST_HISTORIC_MARKET_DATA: &str = "/secure/read/marketData/requestHistoricMarketData";
    pub const SUBSCRIBE: &str = "/secure/subscribe";
}
