//! XML readers feeding the dispatcher.
//!
//! quick-xml tokenizes the byte stream; each start, text and end event is
//! forwarded to a [`Dispatcher`] as an enter/text/leave notification. End-name
//! checking is left to the dispatcher so that a mismatched close element is
//! reported as [`LmaxApiError::Framing`] and aborts decoding.
//!
//! Two entry points:
//! - [`decode_str`] for a complete document already in memory (an HTTP
//!   response body, a test fixture);
//! - [`MessageReader`] for the open-ended event stream, read asynchronously
//!   in a spawned tokio task that sends [`LmaxEvent`]s through an mpsc
//!   channel.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::dispatcher::Dispatcher;
use crate::errors::{LmaxApiError, Result};
use crate::handler::ElementHandler;
use crate::handlers::response::ResponseDocument;
use crate::handlers::stream::EventStreamHandler;
use crate::wrapper::LmaxEvent;

// ============================================================================
// Event translation
// ============================================================================

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| LmaxApiError::Xml(quick_xml::Error::from(e)))
}

/// Forward one tokenizer event. Returns `false` at end of input.
fn dispatch<H: ElementHandler + 'static>(
    dispatcher: &mut Dispatcher<H>,
    event: Event<'_>,
) -> Result<bool> {
    match event {
        Event::Start(e) => dispatcher.enter_element(utf8(e.local_name().into_inner())?)?,
        Event::Empty(e) => {
            let name = utf8(e.local_name().into_inner())?;
            dispatcher.enter_element(name)?;
            dispatcher.leave_element(name)?;
        }
        Event::End(e) => dispatcher.leave_element(utf8(e.local_name().into_inner())?)?,
        Event::Text(e) => dispatcher.text(&e.unescape()?)?,
        Event::CData(e) => {
            let raw: Cow<'_, [u8]> = e.into_inner();
            dispatcher.text(utf8(&raw)?)?
        }
        Event::Eof => return Ok(false),
        Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
    }
    Ok(true)
}

// ============================================================================
// In-memory documents
// ============================================================================

/// Feed a complete document to `dispatcher`.
///
/// Listeners run while the document is read. On error the dispatcher may be
/// left with elements open (and aborted, for framing errors).
pub fn decode_str<H: ElementHandler + 'static>(
    dispatcher: &mut Dispatcher<H>,
    xml: &str,
) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true).check_end_names(false);
    while dispatch(dispatcher, reader.read_event()?)? {}
    Ok(())
}

/// Decode an instruction response and return the echoed instruction id.
pub fn decode_instruction_response(xml: &str) -> Result<Option<String>> {
    let mut dispatcher = Dispatcher::new(ResponseDocument::new());
    decode_str(&mut dispatcher, xml)?;
    Ok(dispatcher.root().instruction_id().map(str::to_string))
}

// ============================================================================
// MessageReader
// ============================================================================

/// Async reader for the event stream, run in a spawned tokio task.
///
/// Decodes the stream through an [`EventStreamHandler`] and sends every
/// event to the consumer through an unbounded mpsc channel. Callbacks already
/// registered on the handler still run, before the channel send.
///
/// ## Usage
///
/// ```rust,ignore
/// let reader = MessageReader::new(tokio::io::BufReader::new(stream));
/// let (mut rx, handle) = reader.spawn();
///
/// while let Some(event) = rx.recv().await {
///     println!("{event:?}");
/// }
/// ```
pub struct MessageReader<R> {
    source: R,
    root: EventStreamHandler,
}

impl<R> MessageReader<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(source: R) -> Self {
        Self::with_handler(source, EventStreamHandler::new())
    }

    /// Use a pre-configured root, e.g. one with callbacks registered.
    pub fn with_handler(source: R, root: EventStreamHandler) -> Self {
        Self { source, root }
    }

    /// Spawn the reader task and return the event receiver + task handle.
    ///
    /// The task runs until the stream ends, decoding fails, or the receiver
    /// is dropped. The last event sent is always [`LmaxEvent::StreamClosed`]
    /// unless the receiver was dropped first.
    pub fn spawn(self) -> (mpsc::UnboundedReceiver<LmaxEvent>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            self.run(tx).await;
        });

        (rx, handle)
    }

    async fn run(mut self, tx: mpsc::UnboundedSender<LmaxEvent>) {
        self.root.forward_to(tx.clone());
        let mut dispatcher = Dispatcher::new(self.root);
        let mut reader = Reader::from_reader(self.source);
        reader.trim_text(true).check_end_names(false);
        let mut buf = Vec::new();

        loop {
            if tx.is_closed() {
                tracing::debug!("event receiver dropped, reader stopping");
                return;
            }

            let step = match reader.read_event_into_async(&mut buf).await {
                Ok(event) => dispatch(&mut dispatcher, event),
                Err(e) => Err(e.into()),
            };
            buf.clear();

            match step {
                Ok(true) => {}
                Ok(false) => {
                    if !dispatcher.is_idle() {
                        tracing::warn!(depth = dispatcher.depth(), "stream ended inside an element");
                    }
                    tracing::info!("event stream ended");
                    break;
                }
                Err(e) => {
                    tracing::error!("reader error: {e}");
                    let _ = tx.send(LmaxEvent::Error(e.to_string()));
                    break;
                }
            }
        }
        let _ = tx.send(LmaxEvent::StreamClosed);
    }
}

// ============================================================================
// Tests
// ============================================================================
