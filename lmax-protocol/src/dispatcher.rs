//! Push-driven element dispatcher.
//!
//! The dispatcher receives three notifications from whatever tokenizes the
//! byte stream (see [`crate::reader`]): an element started, text content, an
//! element ended. It keeps a stack mirroring the nesting of the markup and
//! routes each element to the handler tree:
//!
//! - a child that the nearest open handler owns a nested handler for becomes
//!   the active handler;
//! - a child declared as one of its scalar fields is buffered and, when it
//!   closes, stored into that handler's [`FieldAccumulator`];
//! - anything else is skipped. Skipped elements are transparent: their own
//!   children are still routed against the nearest open handler, so envelope
//!   elements such as `<events><body>` need no handlers of their own.
//!
//! A close element that does not match the innermost open element is a
//! framing error. It is fatal: the dispatcher aborts and rejects every later
//! notification, and the caller is expected to tear the connection down.
//!
//! [`FieldAccumulator`]: crate::fields::FieldAccumulator

use crate::errors::{LmaxApiError, Result};
use crate::handler::ElementHandler;

// ============================================================================
// Frames
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// The element is owned by a nested handler.
    Handler,
    /// The element is a scalar field of the nearest handler.
    Field,
    /// Nothing recognizes the element.
    Skipped,
}

#[derive(Debug)]
struct Frame {
    name: String,
    kind: FrameKind,
    content: String,
}

/// Walk from the root to the innermost open handler.
fn active_handler<'a>(
    root: &'a mut (dyn ElementHandler + 'static),
    stack: &[Frame],
) -> Option<&'a mut (dyn ElementHandler + 'static)> {
    let mut node = root;
    for frame in stack.iter().filter(|f| f.kind == FrameKind::Handler) {
        node = node.child_mut(&frame.name)?;
    }
    Some(node)
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes element notifications through a handler tree rooted at `H`.
///
/// The root itself owns no element: its nested handlers are the top-level
/// messages the dispatcher recognizes. Decoding is single-threaded; listeners
/// run synchronously inside [`Dispatcher::leave_element`].
#[derive(Debug)]
pub struct Dispatcher<H> {
    root: H,
    stack: Vec<Frame>,
    aborted: bool,
}

impl<H: ElementHandler + 'static> Dispatcher<H> {
    pub fn new(root: H) -> Self {
        Self {
            root,
            stack: Vec::new(),
            aborted: false,
        }
    }

    pub fn root(&self) -> &H {
        &self.root
    }

    /// Mutable access to the root, e.g. to register more listeners.
    pub fn root_mut(&mut self) -> &mut H {
        &mut self.root
    }

    pub fn into_root(self) -> H {
        self.root
    }

    /// Number of currently open elements, recognized or not.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True when no element is open.
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// True after a framing error.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// An element named `name` started.
    pub fn enter_element(&mut self, name: &str) -> Result<()> {
        self.ensure_live()?;
        let kind = match active_handler(&mut self.root, &self.stack) {
            Some(handler) => {
                if handler.child_mut(name).is_some() {
                    FrameKind::Handler
                } else if handler.accepts_field(name) {
                    FrameKind::Field
                } else {
                    tracing::trace!(element = name, "skipping unrecognized element");
                    FrameKind::Skipped
                }
            }
            None => return Err(self.lost(name)),
        };

        self.stack.push(Frame {
            name: name.to_string(),
            kind,
            content: String::new(),
        });
        Ok(())
    }

    /// Text content inside the innermost open element.
    ///
    /// Text may arrive in several pieces; they are concatenated. Text inside
    /// skipped elements (or outside any element) is dropped.
    pub fn text(&mut self, content: &str) -> Result<()> {
        self.ensure_live()?;
        if let Some(frame) = self.stack.last_mut() {
            if frame.kind != FrameKind::Skipped {
                frame.content.push_str(content);
            }
        }
        Ok(())
    }

    /// The element named `name` ended.
    ///
    /// Closing a handler's element runs its close behavior (building and
    /// publishing an event, appending a group record, ...) and then resets it.
    pub fn leave_element(&mut self, name: &str) -> Result<()> {
        self.ensure_live()?;
        let frame = match self.stack.pop() {
            Some(frame) if frame.name == name => frame,
            Some(frame) => {
                self.aborted = true;
                tracing::error!(expected = %frame.name, found = name, "mismatched close element");
                return Err(LmaxApiError::Framing {
                    expected: frame.name,
                    found: name.to_string(),
                });
            }
            None => {
                self.aborted = true;
                tracing::error!(found = name, "close element with nothing open");
                return Err(LmaxApiError::Unbalanced(name.to_string()));
            }
        };

        match frame.kind {
            FrameKind::Handler => {
                let handler = active_handler(&mut self.root, &self.stack)
                    .and_then(|parent| parent.child_mut(&frame.name));
                match handler {
                    Some(handler) => {
                        handler.end_element(&frame.content);
                        handler.reset();
                    }
                    None => return Err(self.lost(&frame.name)),
                }
            }
            FrameKind::Field => {
                let stored = active_handler(&mut self.root, &self.stack)
                    .and_then(|handler| handler.fields_mut())
                    .is_some_and(|fields| fields.store(&frame.name, frame.content));
                if !stored {
                    return Err(self.lost(&frame.name));
                }
            }
            FrameKind::Skipped => {}
        }
        Ok(())
    }

    /// Drop every open element without running any close behavior and clear
    /// the aborted flag. Handler scopes are reset.
    ///
    /// Meant for reuse of a handler tree on a fresh connection.
    pub fn restart(&mut self) {
        while let Some(frame) = self.stack.pop() {
            if frame.kind != FrameKind::Handler {
                continue;
            }
            if let Some(handler) = active_handler(&mut self.root, &self.stack)
                .and_then(|parent| parent.child_mut(&frame.name))
            {
                handler.reset();
            }
        }
        self.aborted = false;
    }

    fn ensure_live(&self) -> Result<()> {
        if self.aborted {
            Err(LmaxApiError::Aborted)
        } else {
            Ok(())
        }
    }

    /// The handler tree no longer matches the open stack. Only reachable if a
    /// handler stops reporting a child it reported when the element opened.
    fn lost(&mut self, name: &str) -> LmaxApiError {
        self.aborted = true;
        tracing::error!(element = name, "handler tree no longer matches open elements");
        LmaxApiError::Framing {
            expected: self
                .stack
                .last()
                .map(|f| f.name.clone())
                .unwrap_or_default(),
            found: name.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldAccumulator;
    use crate::handler::{CompositeHandler, HandlerRegistry};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<FieldAccumulator>>>;

    fn recording(name: &str, fields: &[&'static str], seen: &Seen) -> CompositeHandler {
        let mut handler = CompositeHandler::new(name).with_fields(fields);
        let seen = Arc::clone(seen);
        handler.on_close(move |f| seen.lock().unwrap().push(f.clone()));
        handler
    }

    fn leaf(d: &mut Dispatcher<HandlerRegistry>, name: &str, text: &str) {
        d.enter_element(name).unwrap();
        d.text(text).unwrap();
        d.leave_element(name).unwrap();
    }

    #[test]
    fn scalar_children_reach_the_enclosing_handler() {
        let seen = Seen::default();
        let registry = HandlerRegistry::new().with(recording("body", &["instructionId"], &seen));
        let mut d = Dispatcher::new(registry);

        d.enter_element("body").unwrap();
        leaf(&mut d, "instructionId", "42");
        d.leave_element("body").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].string("instructionId"), "42");
        assert!(d.is_idle());
    }

    #[test]
    fn skipped_envelopes_are_transparent() {
        let seen = Seen::default();
        let registry = HandlerRegistry::new().with(recording("order", &["orderId"], &seen));
        let mut d = Dispatcher::new(registry);

        d.enter_element("events").unwrap();
        d.enter_element("body").unwrap();
        d.enter_element("order").unwrap();
        leaf(&mut d, "orderId", "A1");
        leaf(&mut d, "somethingNew", "ignored");
        d.leave_element("order").unwrap();
        d.leave_element("body").unwrap();
        d.leave_element("events").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].string("orderId"), "A1");
        assert!(!seen[0].contains("somethingNew"));
    }

    #[test]
    fn text_pieces_are_concatenated() {
        let seen = Seen::default();
        let registry = HandlerRegistry::new().with(recording("body", &["instructionId"], &seen));
        let mut d = Dispatcher::new(registry);

        d.enter_element("body").unwrap();
        d.enter_element("instructionId").unwrap();
        d.text("ab").unwrap();
        d.text("&c").unwrap();
        d.leave_element("instructionId").unwrap();
        d.leave_element("body").unwrap();

        assert_eq!(seen.lock().unwrap()[0].string("instructionId"), "ab&c");
    }

    #[test]
    fn nested_handler_scope_is_separate_from_parent() {
        let outer_seen = Seen::default();
        let inner_seen = Seen::default();
        let inner = recording("inner", &["value"], &inner_seen);
        let outer = recording("outer", &["value"], &outer_seen).with_child(inner);
        let mut d = Dispatcher::new(HandlerRegistry::new().with(outer));

        d.enter_element("outer").unwrap();
        leaf(&mut d, "value", "1");
        d.enter_element("inner").unwrap();
        leaf(&mut d, "value", "2");
        d.leave_element("inner").unwrap();
        d.leave_element("outer").unwrap();

        assert_eq!(inner_seen.lock().unwrap()[0].i64("value"), 2);
        assert_eq!(outer_seen.lock().unwrap()[0].i64("value"), 1);
    }

    #[test]
    fn scope_is_reset_between_messages() {
        let seen = Seen::default();
        let registry = HandlerRegistry::new().with(recording("body", &["a", "b"], &seen));
        let mut d = Dispatcher::new(registry);

        d.enter_element("body").unwrap();
        leaf(&mut d, "a", "1");
        d.leave_element("body").unwrap();
        d.enter_element("body").unwrap();
        leaf(&mut d, "b", "2");
        d.leave_element("body").unwrap();

        let seen = seen.lock().unwrap();
        assert!(!seen[1].contains("a"));
        assert_eq!(seen[1].i64("b"), 2);
    }

    #[test]
    fn mismatched_close_is_fatal() {
        let mut d = Dispatcher::new(HandlerRegistry::new().with(CompositeHandler::new("body")));
        d.enter_element("body").unwrap();
        d.enter_element("x").unwrap();

        let err = d.leave_element("body").unwrap_err();
        assert!(matches!(
            err,
            LmaxApiError::Framing { ref expected, ref found } if expected == "x" && found == "body"
        ));
        assert!(d.is_aborted());
        assert!(matches!(d.enter_element("body"), Err(LmaxApiError::Aborted)));
        assert!(matches!(d.text("t"), Err(LmaxApiError::Aborted)));
    }

    #[test]
    fn close_with_nothing_open_is_fatal() {
        let mut d = Dispatcher::new(HandlerRegistry::new());
        assert!(matches!(
            d.leave_element("body"),
            Err(LmaxApiError::Unbalanced(ref name)) if name == "body"
        ));
        assert!(d.is_aborted());
    }

    #[test]
    fn restart_clears_open_scopes() {
        let seen = Seen::default();
        let registry = HandlerRegistry::new().with(recording("body", &["a", "b"], &seen));
        let mut d = Dispatcher::new(registry);

        d.enter_element("body").unwrap();
        leaf(&mut d, "a", "1");
        d.restart();
        assert!(d.is_idle());

        d.enter_element("body").unwrap();
        leaf(&mut d, "b", "2");
        d.leave_element("body").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].contains("a"));
    }
}
