//! Generic instruction responses.
//!
//! Most trading requests are answered synchronously with a document such as
//!
//! ```xml
//! <res><header><status>OK</status></header><body><instructionId>123</instructionId></body></res>
//! ```
//!
//! The only value of interest is the echoed instruction id, which correlates
//! the request with the asynchronous `order`/`execution` events that follow.

use crate::fields::FieldAccumulator;
use crate::handler::ElementHandler;
use crate::listener::Listeners;
use crate::protocol::element;

/// Handler for the `body` of an instruction response.
///
/// Keeps the last instruction id seen (`None` until a `body` closed with a
/// non-empty id) and publishes each one to its listeners.
#[derive(Debug)]
pub struct InstructionResponseHandler {
    fields: FieldAccumulator,
    instruction_id: Option<String>,
    listeners: Listeners<String>,
}

impl InstructionResponseHandler {
    pub fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[element::INSTRUCTION_ID]),
            instruction_id: None,
            listeners: Listeners::new(),
        }
    }

    pub fn instruction_id(&self) -> Option<&str> {
        self.instruction_id.as_deref()
    }

    pub fn on_instruction_id<F>(&mut self, listener: F)
    where
        F: FnMut(&String) + Send + 'static,
    {
        self.listeners.register(listener);
    }
}

impl Default for InstructionResponseHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for InstructionResponseHandler {
    fn element_name(&self) -> &str {
        element::BODY
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn end_element(&mut self, _content: &str) {
        self.instruction_id = self.fields.string_opt(element::INSTRUCTION_ID);
        if let Some(id) = &self.instruction_id {
            self.listeners.publish(id);
        }
    }
}

/// Root for decoding one response document.
#[derive(Debug, Default)]
pub struct ResponseDocument {
    body: InstructionResponseHandler,
}

impl ResponseDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self) -> &InstructionResponseHandler {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut InstructionResponseHandler {
        &mut self.body
    }

    pub fn instruction_id(&self) -> Option<&str> {
        self.body.instruction_id()
    }
}

impl ElementHandler for ResponseDocument {
    fn element_name(&self) -> &str {
        ""
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        if name == element::BODY {
            Some(&mut self.body)
        } else {
            None
        }
    }

    fn end_element(&mut self, _content: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use std::sync::{Arc, Mutex};

    #[test]
    fn extracts_instruction_id_from_body() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut root = ResponseDocument::new();
        {
            let seen = Arc::clone(&seen);
            root.body_mut()
                .on_instruction_id(move |id| seen.lock().unwrap().push(id.clone()));
        }
        let mut d = Dispatcher::new(root);

        d.enter_element("res").unwrap();
        d.enter_element("header").unwrap();
        d.enter_element("status").unwrap();
        d.text("OK").unwrap();
        d.leave_element("status").unwrap();
        d.leave_element("header").unwrap();
        d.enter_element("body").unwrap();
        d.enter_element("instructionId").unwrap();
        d.text("123").unwrap();
        d.leave_element("instructionId").unwrap();
        d.leave_element("body").unwrap();
        d.leave_element("res").unwrap();

        assert_eq!(d.root().instruction_id(), Some("123"));
        assert_eq!(*seen.lock().unwrap(), vec!["123".to_string()]);
    }

    #[test]
    fn empty_body_has_no_instruction_id() {
        let mut handler = InstructionResponseHandler::new();
        handler.end_element("");
        assert_eq!(handler.instruction_id(), None);
    }
}
