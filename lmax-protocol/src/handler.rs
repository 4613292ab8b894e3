//! The element handler tree.
//!
//! A handler owns one element name. While its element is open it may accept
//! scalar children into a [`FieldAccumulator`] and may own nested handlers for
//! structured children (repeating groups, sub-records). When its element
//! closes the [`Dispatcher`](crate::dispatcher::Dispatcher) calls
//! [`ElementHandler::end_element`] and then [`ElementHandler::reset`], so no
//! value from one message is visible while decoding the next.
//!
//! Handlers are built once and live as long as the connection. Specialized
//! handlers (account state, orders, ...) live in [`crate::handlers`]; this
//! module provides the trait plus two generic building blocks:
//! [`CompositeHandler`] and the root-level [`HandlerRegistry`].

use std::collections::HashMap;
use std::fmt;

use crate::fields::FieldAccumulator;
use crate::listener::Listeners;

// ============================================================================
// ElementHandler
// ============================================================================

/// One node of the decoding tree.
pub trait ElementHandler: Send {
    /// The element name this handler owns. Unique among its siblings.
    fn element_name(&self) -> &str;

    /// Scalar children accumulated in this handler's scope, if it has any.
    fn fields(&self) -> Option<&FieldAccumulator> {
        None
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        None
    }

    /// The nested handler registered for child element `name`.
    fn child_mut(&mut self, _name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        None
    }

    /// The handler's own element closed. `content` is the text that appeared
    /// directly inside it (empty for purely structural elements).
    fn end_element(&mut self, content: &str);

    /// Clear the scope opened by this handler's element.
    ///
    /// Repeating-group handlers keep the records they collected for their
    /// parent; the parent takes or clears them when its own element closes.
    fn reset(&mut self) {
        if let Some(fields) = self.fields_mut() {
            fields.reset();
        }
    }

    /// Whether `name` is a scalar child recorded into this handler's fields.
    fn accepts_field(&self, name: &str) -> bool {
        self.fields().is_some_and(|f| f.is_declared(name))
    }
}

// ============================================================================
// CompositeHandler
// ============================================================================

/// A general-purpose handler: a named element with declared scalar fields
/// and optional nested handlers.
///
/// On close it hands its accumulated fields to every registered listener,
/// which can read them with the typed getters.
pub struct CompositeHandler {
    name: String,
    fields: FieldAccumulator,
    children: HashMap<String, Box<dyn ElementHandler>>,
    listeners: Listeners<FieldAccumulator>,
}

impl CompositeHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FieldAccumulator::new(),
            children: HashMap::new(),
            listeners: Listeners::new(),
        }
    }

    pub fn with_field(mut self, name: &'static str) -> Self {
        self.fields.declare(name);
        self
    }

    pub fn with_fields(mut self, names: &[&'static str]) -> Self {
        for name in names {
            self.fields.declare(name);
        }
        self
    }

    /// Add a nested handler, replacing any child with the same element name.
    pub fn with_child(mut self, child: impl ElementHandler + 'static) -> Self {
        self.children
            .insert(child.element_name().to_string(), Box::new(child));
        self
    }

    /// Register a listener receiving the scope's fields when the element closes.
    pub fn on_close<F>(&mut self, listener: F)
    where
        F: FnMut(&FieldAccumulator) + Send + 'static,
    {
        self.listeners.register(listener);
    }
}

impl ElementHandler for CompositeHandler {
    fn element_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        self.children.get_mut(name).map(|child| child.as_mut())
    }

    fn end_element(&mut self, _content: &str) {
        if self.listeners.publish(&self.fields) == 0 {
            tracing::trace!(element = %self.name, "closed with no listeners");
        }
    }
}

impl fmt::Debug for CompositeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeHandler")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners)
            .finish()
    }
}

// ============================================================================
// HandlerRegistry
// ============================================================================

/// Root of an ad-hoc handler tree: top-level handlers keyed by element name.
///
/// The registry itself owns no element; it never receives text and its
/// `end_element` is never called by the dispatcher.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn ElementHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level handler. Returns the handler it replaced, if any.
    pub fn register(
        &mut self,
        handler: impl ElementHandler + 'static,
    ) -> Option<Box<dyn ElementHandler>> {
        self.handlers
            .insert(handler.element_name().to_string(), Box::new(handler))
    }

    pub fn with(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.register(handler);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl ElementHandler for HandlerRegistry {
    fn element_name(&self) -> &str {
        ""
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        self.handlers.get_mut(name).map(|handler| handler.as_mut())
    }

    fn end_element(&mut self, _content: &str) {}
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
