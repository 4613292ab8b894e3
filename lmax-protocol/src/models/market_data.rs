//! Historic market data locations.

use serde::{Deserialize, Serialize};
use url::Url;

/// Locations of the files answering a historic market data request.
///
/// `instruction_id` is the id the request was sent with. `urls` keeps the
/// order in which the venue listed the files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricMarketDataEvent {
    pub instruction_id: String,
    pub urls: Vec<Url>,
}
