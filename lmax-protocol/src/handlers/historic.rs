//! `historicMarketData` messages: an instruction id plus a list of `url`
//! elements locating the requested files.

use std::mem;
use url::Url;

use crate::fields::FieldAccumulator;
use crate::handler::ElementHandler;
use crate::listener::Listeners;
use crate::models::market_data::HistoricMarketDataEvent;
use crate::protocol::element;

/// Collects one URL per `url` element, in document order.
///
/// The element's own text is the location. Text that is not an absolute URL
/// is dropped with a warning.
#[derive(Debug, Default)]
pub struct UrlHandler {
    urls: Vec<Url>,
}

impl UrlHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_urls(&mut self) -> Vec<Url> {
        mem::take(&mut self.urls)
    }

    pub fn clear(&mut self) {
        self.urls.clear();
    }
}

impl ElementHandler for UrlHandler {
    fn element_name(&self) -> &str {
        element::URL
    }

    fn end_element(&mut self, content: &str) {
        let content = content.trim();
        match Url::parse(content) {
            Ok(url) => self.urls.push(url),
            Err(e) => tracing::warn!(url = content, "dropping invalid url: {e}"),
        }
    }
}

/// Publishes a [`HistoricMarketDataEvent`] each time `historicMarketData`
/// closes.
#[derive(Debug)]
pub struct HistoricMarketDataHandler {
    fields: FieldAccumulator,
    urls: UrlHandler,
    listeners: Listeners<HistoricMarketDataEvent>,
}

impl HistoricMarketDataHandler {
    pub fn new() -> Self {
        Self {
            fields: FieldAccumulator::with_fields(&[element::INSTRUCTION_ID]),
            urls: UrlHandler::new(),
            listeners: Listeners::new(),
        }
    }

    pub fn on_historic_market_data<F>(&mut self, listener: F)
    where
        F: FnMut(&HistoricMarketDataEvent) + Send + 'static,
    {
        self.listeners.register(listener);
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners<HistoricMarketDataEvent> {
        &mut self.listeners
    }
}

impl Default for HistoricMarketDataHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for HistoricMarketDataHandler {
    fn element_name(&self) -> &str {
        element::HISTORIC_MARKET_DATA
    }

    fn fields(&self) -> Option<&FieldAccumulator> {
        Some(&self.fields)
    }

    fn fields_mut(&mut self) -> Option<&mut FieldAccumulator> {
        Some(&mut self.fields)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut (dyn ElementHandler + 'static)> {
        (name == element::URL).then_some(&mut self.urls as &mut (dyn ElementHandler + 'static))
    }

    fn end_element(&mut self, _content: &str) {
        let event = HistoricMarketDataEvent {
            instruction_id: self.fields.string(element::INSTRUCTION_ID),
            urls: self.urls.take_urls(),
        };
        if self.listeners.publish(&event) == 0 {
            tracing::trace!(instruction_id = %event.instruction_id, "historic market data with no listeners");
        }
    }

    fn reset(&mut self) {
        self.fields.reset();
        self.urls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::handler::HandlerRegistry;
    use std::sync::{Arc, Mutex};

    #[test]
    fn url_handler_skips_invalid_locations() {
        let mut urls = UrlHandler::new();
        urls.end_element(" https://example.com/a.csv.gz ");
        urls.end_element("not a url");
        urls.end_element("https://example.com/b.csv.gz");

        let taken: Vec<String> = urls.take_urls().iter().map(Url::to_string).collect();
        assert_eq!(
            taken,
            vec!["https://example.com/a.csv.gz", "https://example.com/b.csv.gz"]
        );
    }

    #[test]
    fn publishes_urls_in_document_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut handler = HistoricMarketDataHandler::new();
        {
            let seen = Arc::clone(&seen);
            handler.on_historic_market_data(move |e| seen.lock().unwrap().push(e.clone()));
        }
        let mut d = Dispatcher::new(HandlerRegistry::new().with(handler));

        d.enter_element("historicMarketData").unwrap();
        d.enter_element("instructionId").unwrap();
        d.text("77").unwrap();
        d.leave_element("instructionId").unwrap();
        d.enter_element("urls").unwrap();
        for file in ["one", "two"] {
            d.enter_element("url").unwrap();
            d.text(&format!("https://data.example.com/{file}")).unwrap();
            d.leave_element("url").unwrap();
        }
        d.leave_element("urls").unwrap();
        d.leave_element("historicMarketData").unwrap();

        // A second message starts from empty state.
        d.enter_element("historicMarketData").unwrap();
        d.leave_element("historicMarketData").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].instruction_id, "77");
        assert_eq!(seen[0].urls.len(), 2);
        assert_eq!(seen[0].urls[1].path(), "/two");
        assert_eq!(seen[1], HistoricMarketDataEvent::default());
    }
}
