//! Client options handed to the transport layer.

use serde::{Deserialize, Deserializer, Serialize};

/// Longest client identifier the venue accepts, in characters.
pub const MAX_CLIENT_IDENTIFIER_LEN: usize = 25;

/// Default number of concurrent HTTP connections to the venue.
pub const DEFAULT_CONNECTION_LIMIT: usize = 5;

/// Options for a venue session.
///
/// The client identifier is sent with every request; longer values are
/// truncated to [`MAX_CLIENT_IDENTIFIER_LEN`] characters, including when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiOptions {
    #[serde(deserialize_with = "deserialize_client_identifier")]
    client_identifier: String,
    pub default_connection_limit: usize,
}

impl ApiOptions {
    pub fn new(client_identifier: &str) -> Self {
        Self::default().with_client_identifier(client_identifier)
    }

    pub fn with_client_identifier(mut self, client_identifier: &str) -> Self {
        self.client_identifier = truncate(client_identifier);
        self
    }

    pub fn with_connection_limit(mut self, limit: usize) -> Self {
        self.default_connection_limit = limit;
        self
    }

    pub fn client_identifier(&self) -> &str {
        &self.client_identifier
    }
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            client_identifier: String::new(),
            default_connection_limit: DEFAULT_CONNECTION_LIMIT,
        }
    }
}

fn truncate(value: &str) -> String {
    value.chars().take(MAX_CLIENT_IDENTIFIER_LEN).collect()
}

fn deserialize_client_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(truncate(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ApiOptions::default();
        assert_eq!(options.client_identifier(), "");
        assert_eq!(options.default_connection_limit, 5);
    }

    #[test]
    fn client_identifier_is_truncated() {
        let options = ApiOptions::new("an-extremely-long-client-identifier");
        assert_eq!(options.client_identifier(), "an-extremely-long-client-");
        assert_eq!(options.client_identifier().chars().count(), 25);

        assert_eq!(ApiOptions::new("short").client_identifier(), "short");
    }

    #[test]
    fn deserialize_applies_defaults_and_truncation() {
        let options: ApiOptions =
            serde_json::from_str(r#"{"clientIdentifier":"abcdefghijklmnopqrstuvwxyz0123"}"#).unwrap();
        assert_eq!(options.client_identifier(), "abcdefghijklmnopqrstuvwxy");
        assert_eq!(options.default_connection_limit, DEFAULT_CONNECTION_LIMIT);

        let options: ApiOptions = serde_json::from_str(r#"{"defaultConnectionLimit":2}"#).unwrap();
        assert_eq!(options, ApiOptions::default().with_connection_limit(2));
    }
}
