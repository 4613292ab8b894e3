//! Order type and time-in-force enums, plus the small vocabularies used by
//! historic data and subscription requests.
//!
//! The venue reports several internal order-type tokens that collapse onto a
//! small canonical set. Resolution is two-stage: the legacy table first, then
//! the canonical symbolic names. Anything else becomes the `Unknown` variant;
//! resolution never fails.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// OrderType
// ============================================================================

/// Canonical order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    #[serde(rename = "STOP_LOSS_MARKET_ORDER")]
    StopLossMarket,
    #[serde(rename = "STOP_PROFIT_LIMIT_ORDER")]
    StopProfitLimit,
    #[serde(rename = "STOP_ORDER")]
    Stop,
    #[default]
    Unknown,
}

/// Internal tokens the venue sends in `orderType`, mapped to canonical types.
pub const LEGACY_ORDER_TYPES: &[(&str, OrderType)] = &[
    ("STOP_COMPOUND_PRICE_LIMIT", OrderType::Limit),
    ("PRICE_LIMIT", OrderType::Limit),
    ("STOP_COMPOUND_MARKET", OrderType::Market),
    ("MARKET_ORDER", OrderType::Market),
    ("STOP_LOSS_ORDER", OrderType::StopLossMarket),
    ("STOP_PROFIT_ORDER", OrderType::StopProfitLimit),
    ("STOP_ORDER", OrderType::Stop),
];

impl OrderType {
    /// Every variant, `Unknown` last.
    pub const ALL: [OrderType; 6] = [
        Self::Limit,
        Self::Market,
        Self::StopLossMarket,
        Self::StopProfitLimit,
        Self::Stop,
        Self::Unknown,
    ];

    /// Canonical symbolic name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::StopLossMarket => "STOP_LOSS_MARKET_ORDER",
            Self::StopProfitLimit => "STOP_PROFIT_LIMIT_ORDER",
            Self::Stop => "STOP_ORDER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Look `token` up in [`LEGACY_ORDER_TYPES`] only.
    pub fn from_legacy(token: &str) -> Option<Self> {
        LEGACY_ORDER_TYPES
            .iter()
            .find(|(legacy, _)| *legacy == token)
            .map(|(_, order_type)| *order_type)
    }

    /// Match `token` against the canonical names only.
    ///
    /// The short spellings without the `_ORDER` suffix are accepted too.
    pub fn from_symbol(token: &str) -> Option<Self> {
        Some(match token {
            "LIMIT" => Self::Limit,
            "MARKET" => Self::Market,
            "STOP_LOSS_MARKET_ORDER" | "STOP_LOSS_MARKET" => Self::StopLossMarket,
            "STOP_PROFIT_LIMIT_ORDER" | "STOP_PROFIT_LIMIT" => Self::StopProfitLimit,
            "STOP_ORDER" | "STOP" => Self::Stop,
            "UNKNOWN" => Self::Unknown,
            _ => return None,
        })
    }

    /// Resolve a wire token: legacy table, then canonical names, then `Unknown`.
    pub fn from_wire(token: &str) -> Self {
        let token = token.trim();
        Self::from_legacy(token)
            .or_else(|| Self::from_symbol(token))
            .unwrap_or_else(|| {
                tracing::warn!(token, "unknown order type");
                Self::Unknown
            })
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_wire(s))
    }
}

// ============================================================================
// TimeInForce
// ============================================================================

/// How long an order stays on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    GoodTilCancelled,
    GoodForDay,
    ImmediateOrCancel,
    FillOrKill,
    #[default]
    Unknown,
}

/// Time-in-force tokens recognized on the wire.
pub const LEGACY_TIME_IN_FORCE: &[(&str, TimeInForce)] = &[
    ("GoodTilCancelled", TimeInForce::GoodTilCancelled),
    ("GoodForDay", TimeInForce::GoodForDay),
    ("ImmediateOrCancel", TimeInForce::ImmediateOrCancel),
    ("FillOrKill", TimeInForce::FillOrKill),
];

impl TimeInForce {
    pub const ALL: [TimeInForce; 5] = [
        Self::GoodTilCancelled,
        Self::GoodForDay,
        Self::ImmediateOrCancel,
        Self::FillOrKill,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTilCancelled => "GoodTilCancelled",
            Self::GoodForDay => "GoodForDay",
            Self::ImmediateOrCancel => "ImmediateOrCancel",
            Self::FillOrKill => "FillOrKill",
            Self::Unknown => "Unknown",
        }
    }

    pub fn from_legacy(token: &str) -> Option<Self> {
        LEGACY_TIME_IN_FORCE
            .iter()
            .find(|(legacy, _)| *legacy == token)
            .map(|(_, tif)| *tif)
    }

    pub fn from_symbol(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tif| tif.as_str() == token)
    }

    /// Resolve a wire token: legacy table, then canonical names, then `Unknown`.
    pub fn from_wire(token: &str) -> Self {
        let token = token.trim();
        Self::from_legacy(token)
            .or_else(|| Self::from_symbol(token))
            .unwrap_or_else(|| {
                tracing::warn!(token, "unknown time in force");
                Self::Unknown
            })
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInForce {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_wire(s))
    }
}

// ============================================================================
// Historic data and subscriptions
// ============================================================================

/// Side of the book a historic data file covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateOption {
    Bid,
    Ask,
}

impl AggregateOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "BID",
            Self::Ask => "ASK",
        }
    }
}

impl fmt::Display for AggregateOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar width of aggregated historic data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateResolution {
    Minute,
    Day,
}

impl AggregateResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "MINUTE",
            Self::Day => "DAY",
        }
    }
}

impl fmt::Display for AggregateResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event stream a session can subscribe to. The token is the element name
/// of the events it enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionType {
    AccountState,
    Order,
    Execution,
    Position,
    HistoricMarketData,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountState => "accountState",
            Self::Order => "order",
            Self::Execution => "execution",
            Self::Position => "position",
            Self::HistoricMarketData => "historicMarketData",
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_legacy_order_type_maps_to_a_known_type() {
        for (token, expected) in LEGACY_ORDER_TYPES {
            let resolved = OrderType::from_wire(token);
            assert_eq!(resolved, *expected, "token {token}");
            assert_ne!(resolved, OrderType::Unknown, "token {token}");
        }
    }

    #[test]
    fn every_canonical_order_type_name_round_trips() {
        for order_type in OrderType::ALL {
            assert_eq!(OrderType::from_wire(order_type.as_str()), order_type);
        }
        assert_eq!(OrderType::from_wire("STOP_LOSS_MARKET"), OrderType::StopLossMarket);
        assert_eq!(OrderType::from_wire("STOP"), OrderType::Stop);
    }

    #[test]
    fn unrecognized_order_type_is_unknown() {
        for token in ["", "limit", "ICEBERG", "PRICE_LIMIT_X", "42"] {
            assert_eq!(OrderType::from_wire(token), OrderType::Unknown, "token {token:?}");
        }
        assert_eq!("whatever".parse::<OrderType>().unwrap(), OrderType::Unknown);
    }

    #[test]
    fn legacy_table_wins_over_symbol() {
        // "STOP_ORDER" is both a legacy token and a canonical name.
        assert_eq!(OrderType::from_legacy("STOP_ORDER"), Some(OrderType::Stop));
        assert_eq!(OrderType::from_legacy("LIMIT"), None);
        assert_eq!(OrderType::from_symbol("LIMIT"), Some(OrderType::Limit));
    }

    #[test]
    fn time_in_force_resolution() {
        for tif in TimeInForce::ALL {
            assert_eq!(TimeInForce::from_wire(tif.as_str()), tif);
        }
        assert_eq!(TimeInForce::from_wire(" GoodForDay "), TimeInForce::GoodForDay);
        assert_eq!(TimeInForce::from_wire("GTC"), TimeInForce::Unknown);
        assert_eq!(TimeInForce::from_wire(""), TimeInForce::Unknown);
    }

    #[test]
    fn request_vocabulary_tokens() {
        assert_eq!(AggregateOption::Bid.to_string(), "BID");
        assert_eq!(AggregateResolution::Day.to_string(), "DAY");
        assert_eq!(SubscriptionType::HistoricMarketData.to_string(), "historicMarketData");
        assert_eq!(
            serde_json::to_string(&AggregateResolution::Minute).unwrap(),
            "\"MINUTE\""
        );
        assert_eq!(
            serde_json::to_string(&SubscriptionType::AccountState).unwrap(),
            "\"accountState\""
        );
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderType::StopLossMarket).unwrap(),
            "\"STOP_LOSS_MARKET_ORDER\""
        );
        assert_eq!(serde_json::to_string(&OrderType::Limit).unwrap(), "\"LIMIT\"");
        assert_eq!(
            serde_json::to_string(&TimeInForce::FillOrKill).unwrap(),
            "\"FillOrKill\""
        );
    }
}
