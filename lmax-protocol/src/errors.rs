//! Error types for the lmax-protocol library.
//!
//! Only conditions that stop decoding or reject an outbound request are
//! errors. Unknown elements, unparsable scalars and unknown enum tokens are
//! resolved leniently by the decoder and reported through `tracing` instead.

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Top-level error type for the protocol codec.
#[derive(Debug, Error)]
pub enum LmaxApiError {
    /// A closing element did not match the element currently open.
    ///
    /// The stream can no longer be trusted as a structured sequence; the
    /// dispatcher refuses further notifications after this.
    #[error("Framing error: expected </{expected}>, found </{found}>")]
    Framing { expected: String, found: String },

    /// A closing element arrived while no element was open.
    #[error("Unbalanced close element </{0}>")]
    Unbalanced(String),

    /// A notification arrived after a fatal framing error.
    #[error("Decoder aborted after a framing error")]
    Aborted,

    /// An outbound request failed validation before encoding.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The structured writer was misused (unbalanced elements, etc.).
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The XML tokenizer rejected the input.
    #[error("XML error: {0}")]
    Xml(quick_xml::Error),

    /// I/O error from the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<quick_xml::Error> for LmaxApiError {
    /// Read failures surface as [`LmaxApiError::Io`], not as tokenizer errors.
    fn from(e: quick_xml::Error) -> Self {
        match e {
            quick_xml::Error::Io(shared) => Self::Io(
                Arc::try_unwrap(shared)
                    .unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string())),
            ),
            other => Self::Xml(other),
        }
    }
}

impl LmaxApiError {
    /// Whether this error means the current connection must be torn down.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_) | Self::Encoding(_))
    }
}

/// Convenience Result type for this library.
pub type Result<T> = std::result::Result<T, LmaxApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_error_message_names_both_elements() {
        let err = LmaxApiError::Framing {
            expected: "wallet".into(),
            found: "accountState".into(),
        };
        assert_eq!(
            err.to_string(),
            "Framing error: expected </wallet>, found </accountState>"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn tokenizer_io_error_becomes_io() {
        let inner = io::Error::new(io::ErrorKind::ConnectionReset, "peer reset");
        let err = LmaxApiError::from(quick_xml::Error::Io(Arc::new(inner)));
        match &err {
            LmaxApiError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected Io, got {other:?}"),
        }
        assert_eq!(err.to_string(), "I/O error: peer reset");
        assert!(err.is_fatal());

        let err = LmaxApiError::from(quick_xml::Error::UnexpectedBang(b'x'));
        assert!(matches!(err, LmaxApiError::Xml(_)));
    }

    #[test]
    fn invalid_request_is_not_fatal() {
        let err = LmaxApiError::InvalidRequest("Quantity required".into());
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Invalid request: Quantity required");
    }
}
