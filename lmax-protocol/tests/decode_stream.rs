//! End-to-end decoding and encoding through the public API.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lmax_protocol::{
    decode_str, encode_request, AccountStateEvent, AmendStopLossProfitRequest,
    ClosingOrderSpecification, CompositeHandler, Dispatcher, EventStreamHandler, Execution,
    FieldAccumulator, HandlerRegistry, LmaxApiError, LmaxEvent, MessageReader, Order, OrderType,
    TimeInForce,
};

const ACCOUNT_STATE: &str = "<accountState><accountId>42</accountId><balance>1000.50</balance>\
<wallet><currency>GBP</currency><balance>500</balance></wallet>\
<wallet><currency>USD</currency><balance>300</balance><netOpenPosition>10</netOpenPosition></wallet>\
</accountState>";

fn account_states() -> (Dispatcher<EventStreamHandler>, Arc<Mutex<Vec<AccountStateEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut root = EventStreamHandler::new();
    let sink = Arc::clone(&seen);
    root.on_account_state(move |e| sink.lock().unwrap().push(e.clone()));
    (Dispatcher::new(root), seen)
}

// ============================================================================
// Account state
// ============================================================================

#[test]
fn account_state_scenario() {
    let (mut d, seen) = account_states();
    decode_str(&mut d, ACCOUNT_STATE).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let event = &seen[0];
    assert_eq!(event.account_id, 42);
    assert_eq!(event.balance, dec!(1000.50));
    assert_eq!(
        event.wallets,
        HashMap::from([("GBP".to_string(), dec!(500)), ("USD".to_string(), dec!(300))])
    );
    assert_eq!(
        event.net_open_positions,
        HashMap::from([("USD".to_string(), dec!(10))])
    );
    assert_eq!(event.net_open_position("GBP"), None);
}

#[test]
fn non_numeric_margin_is_zero() {
    let (mut d, seen) = account_states();
    decode_str(
        &mut d,
        "<accountState><accountId>1</accountId><margin>N/A</margin></accountState>",
    )
    .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].margin, Decimal::ZERO);
    assert_eq!(seen[0].account_id, 1);
}

#[test]
fn same_message_twice_gives_equal_events() {
    let (mut d, seen) = account_states();
    let stream = format!("<events><body>{ACCOUNT_STATE}{ACCOUNT_STATE}</body></events>");
    decode_str(&mut d, &stream).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn wallet_counts_follow_records() {
    // N wallets, M of which report a net open position, plus one duplicate.
    let wallets = [
        ("EUR", "1", Some("5")),
        ("GBP", "2", None),
        ("JPY", "3", Some("-1")),
        ("USD", "4", None),
        ("EUR", "9", None),
    ];
    let mut xml = String::from("<accountState><wallets>");
    for (currency, balance, position) in wallets {
        xml.push_str(&format!(
            "<wallet><currency>{currency}</currency><balance>{balance}</balance>"
        ));
        if let Some(position) = position {
            xml.push_str(&format!("<netOpenPosition>{position}</netOpenPosition>"));
        }
        xml.push_str("</wallet>");
    }
    xml.push_str("</wallets></accountState>");

    let (mut d, seen) = account_states();
    decode_str(&mut d, &xml).unwrap();

    let seen = seen.lock().unwrap();
    let event = &seen[0];
    assert_eq!(event.wallets.len(), 4);
    assert_eq!(event.wallet("EUR"), Some(dec!(9)));
    // The later EUR record had no position, so the earlier one stays.
    assert_eq!(event.net_open_positions.len(), 2);
    assert_eq!(event.net_open_position("EUR"), Some(dec!(5)));
    assert_eq!(event.net_open_position("JPY"), Some(dec!(-1)));
}

#[test]
fn mismatched_close_aborts_decoding() {
    let (mut d, seen) = account_states();
    let err = decode_str(&mut d, "<accountState><wallet></accountState>").unwrap_err();
    assert!(matches!(err, LmaxApiError::Framing { .. }));
    assert!(err.is_fatal());
    assert!(seen.lock().unwrap().is_empty());

    assert!(matches!(
        decode_str(&mut d, ACCOUNT_STATE),
        Err(LmaxApiError::Aborted)
    ));

    d.restart();
    decode_str(&mut d, ACCOUNT_STATE).unwrap();
    assert_eq!(seen.lock().unwrap()[0].account_id, 42);
}

// ============================================================================
// Orders
// ============================================================================

#[test]
fn order_with_executions() {
    let orders = Arc::new(Mutex::new(Vec::<Order>::new()));
    let executions = Arc::new(Mutex::new(Vec::<Execution>::new()));
    let mut root = EventStreamHandler::new();
    {
        let orders = Arc::clone(&orders);
        let executions = Arc::clone(&executions);
        root.on_order(move |o| orders.lock().unwrap().push(o.clone()))
            .on_execution(move |e| executions.lock().unwrap().push(e.clone()));
    }
    let mut d = Dispatcher::new(root);

    decode_str(
        &mut d,
        "<events><body><order>\
            <timeInForce>GoodForDay</timeInForce>\
            <instructionId>I-1</instructionId>\
            <originalInstructionId>I-1</originalInstructionId>\
            <orderId>AAK</orderId>\
            <accountId>1</accountId>\
            <instrumentId>4001</instrumentId>\
            <price>1.3000</price>\
            <quantity>10</quantity>\
            <matchedQuantity>10</matchedQuantity>\
            <cancelledQuantity>0</cancelledQuantity>\
            <orderType>STOP_COMPOUND_PRICE_LIMIT</orderType>\
            <stopLossOffset></stopLossOffset>\
            <commission>0.8</commission>\
            <executions>\
              <executionId>7</executionId>\
              <execution><price>1.2999</price><quantity>10</quantity></execution>\
            </executions>\
          </order></body></events>",
    )
    .unwrap();

    let orders = orders.lock().unwrap();
    let order = &orders[0];
    assert_eq!(order.order_type, OrderType::Limit);
    assert_eq!(order.time_in_force, TimeInForce::GoodForDay);
    assert_eq!(order.price, Some(dec!(1.3000)));
    assert_eq!(order.stop_loss_offset, None);
    assert_eq!(order.remaining_quantity(), Decimal::ZERO);

    let executions = executions.lock().unwrap();
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].execution_id, 7);
    assert_eq!(executions[0].price, dec!(1.2999));
    assert_eq!(&executions[0].order, order);
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn closing_order_without_quantity_is_rejected() {
    let req = ClosingOrderSpecification {
        instrument_id: 4001,
        original_instruction_id: Some("I-1".into()),
        ..Default::default()
    };
    assert!(matches!(
        encode_request(&req),
        Err(LmaxApiError::InvalidRequest(_))
    ));
}

#[test]
fn encoded_request_round_trips_through_handlers() {
    let req = AmendStopLossProfitRequest::new(4001, "I-1", "I-2").with_stop_profit_offset(dec!(0.0025));
    let bytes = encode_request(&req).unwrap();
    let xml = std::str::from_utf8(&bytes).unwrap();

    let seen = Arc::new(Mutex::new(Vec::<FieldAccumulator>::new()));
    let mut body = CompositeHandler::new("body").with_fields(&[
        "instrumentId",
        "originalInstructionId",
        "instructionId",
        "stopLossOffset",
        "stopProfitOffset",
    ]);
    {
        let seen = Arc::clone(&seen);
        body.on_close(move |f| seen.lock().unwrap().push(f.clone()));
    }
    let mut d = Dispatcher::new(HandlerRegistry::new().with(body));
    decode_str(&mut d, xml).unwrap();

    let seen = seen.lock().unwrap();
    let fields = &seen[0];
    assert_eq!(fields.i64("instrumentId"), req.instrument_id);
    assert_eq!(fields.string("originalInstructionId"), req.original_instruction_id);
    assert_eq!(fields.string("instructionId"), req.instruction_id);
    assert_eq!(fields.decimal_opt("stopLossOffset"), req.stop_loss_offset);
    assert_eq!(fields.decimal_opt("stopProfitOffset"), req.stop_profit_offset);
}

#[test]
fn closing_order_round_trips_through_handlers() {
    let req = ClosingOrderSpecification::for_order(0, "I-1", dec!(-2.5)).with_instruction_id("I-3");
    let bytes = encode_request(&req).unwrap();
    let xml = std::str::from_utf8(&bytes).unwrap();
    assert!(!xml.contains("instrumentId"), "{xml}");

    let seen = Arc::new(Mutex::new(Vec::<FieldAccumulator>::new()));
    let mut body = CompositeHandler::new("body").with_fields(&[
        "instructionId",
        "instrumentId",
        "originalInstructionId",
        "quantity",
    ]);
    {
        let seen = Arc::clone(&seen);
        body.on_close(move |f| seen.lock().unwrap().push(f.clone()));
    }
    let mut d = Dispatcher::new(HandlerRegistry::new().with(body));
    decode_str(&mut d, xml).unwrap();

    let seen = seen.lock().unwrap();
    let fields = &seen[0];
    assert!(!fields.contains("instrumentId"));
    assert_eq!(fields.i64("instrumentId"), req.instrument_id);
    assert_eq!(Some(fields.string("instructionId")), req.instruction_id);
    assert_eq!(
        Some(fields.string("originalInstructionId")),
        req.original_instruction_id
    );
    assert_eq!(fields.decimal_opt("quantity"), req.quantity);
}

// ============================================================================
// Async stream
// ============================================================================

#[tokio::test]
async fn message_reader_delivers_events_in_order() {
    let stream = format!(
        "<events><body>{ACCOUNT_STATE}\
         <historicMarketData><instructionId>5</instructionId>\
         <urls><url>https://example.com/f.csv.gz</url></urls></historicMarketData>\
         </body></events>"
    );
    let source: &'static [u8] = Box::leak(stream.into_bytes().into_boxed_slice());

    let (mut rx, handle) = MessageReader::new(source).spawn();
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    handle.await.unwrap();

    assert_eq!(events.len(), 3, "{events:?}");
    assert!(matches!(&events[0], LmaxEvent::AccountState(a) if a.account_id == 42));
    match &events[1] {
        LmaxEvent::HistoricMarketData(h) => {
            assert_eq!(h.instruction_id, "5");
            assert_eq!(h.urls[0].as_str(), "https://example.com/f.csv.gz");
        }
        other => panic!("expected HistoricMarketData, got {other:?}"),
    }
    assert_eq!(events[2], LmaxEvent::StreamClosed);
}
