//! LMAX request encoder.
//!
//! Writes outbound requests as nested XML elements:
//!
//! ```xml
//! <req><body><instrumentId>4001</instrumentId><quantity>1.5</quantity></body></req>
//! ```
//!
//! Text is escaped; decimals use their canonical `Display` form, which keeps
//! the scale they were constructed with (`1000.50` stays `1000.50`).

use bytes::{BufMut, BytesMut};
use quick_xml::escape::escape;
use std::fmt;

use crate::errors::{LmaxApiError, Result};
use crate::protocol::request;
use crate::requests::Request;

// ============================================================================
// MessageEncoder
// ============================================================================

/// Builds a single outbound XML message.
///
/// Element writers are fluent and never fail; misuse (closing an element that
/// is not the innermost open one) is recorded and reported by
/// [`MessageEncoder::finalize`].
#[derive(Debug)]
pub struct MessageEncoder {
    buf: BytesMut,
    open: Vec<String>,
    error: Option<String>,
}

impl MessageEncoder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
            open: Vec::new(),
            error: None,
        }
    }

    /// Return the finished message. Fails if any element is still open or an
    /// element was closed out of order.
    pub fn finalize(self) -> Result<BytesMut> {
        if let Some(error) = self.error {
            return Err(LmaxApiError::Encoding(error));
        }
        if let Some(name) = self.open.last() {
            return Err(LmaxApiError::Encoding(format!(
                "element <{name}> still open at end of message"
            )));
        }
        Ok(self.buf)
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    // ========================================================================
    // Structure
    // ========================================================================

    pub fn start_element(&mut self, name: &str) -> &mut Self {
        self.buf.put_u8(b'<');
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.put_u8(b'>');
        self.open.push(name.to_string());
        self
    }

    pub fn end_element(&mut self, name: &str) -> &mut Self {
        match self.open.pop() {
            Some(open) if open == name => {}
            Some(open) => self.fail(format!("closing </{name}> while <{open}> is open")),
            None => self.fail(format!("closing </{name}> with no element open")),
        }
        self.write_close(name);
        self
    }

    // ========================================================================
    // Leaf values
    // ========================================================================

    /// Write `<name>value</name>`.
    pub fn value<T: fmt::Display + ?Sized>(&mut self, name: &str, value: &T) -> &mut Self {
        self.buf.put_u8(b'<');
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.put_u8(b'>');
        self.buf
            .extend_from_slice(escape(value.to_string().as_str()).as_bytes());
        self.write_close(name);
        self
    }

    /// Write the value, or an empty `<name/>` when it is absent.
    pub fn value_or_empty<T: fmt::Display>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        match value {
            Some(value) => self.value(name, &value),
            None => self.empty(name),
        }
    }

    /// Write the value, or nothing at all when it is absent.
    pub fn value_or_none<T: fmt::Display>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.value(name, &value);
        }
        self
    }

    /// Write an empty element, `<name/>`.
    pub fn empty(&mut self, name: &str) -> &mut Self {
        self.buf.put_u8(b'<');
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(b"/>");
        self
    }

    fn write_close(&mut self, name: &str) {
        self.buf.extend_from_slice(b"</");
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.put_u8(b'>');
    }

    fn fail(&mut self, message: String) {
        tracing::warn!("{message}");
        if self.error.is_none() {
            self.error = Some(message);
        }
    }
}

impl Default for MessageEncoder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Validate `req` and encode it as `<req><body>...</body></req>`.
///
/// Validation runs first; an invalid request produces no bytes.
pub fn encode_request<R: Request + ?Sized>(req: &R) -> Result<BytesMut> {
    req.validate()?;
    let mut enc = MessageEncoder::new();
    enc.start_element(request::REQ).start_element(request::BODY);
    req.write_body(&mut enc);
    enc.end_element(request::BODY).end_element(request::REQ);
    enc.finalize()
}

// ============================================================================
// Tests
// ============================================================================
