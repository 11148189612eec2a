//! Wire, equality and rendering scenarios over the bot connector schema.

use bot_connector_model::{error::Error, AnyValue, Record, Value, CONNECTOR};
use serde_json::json;

fn coffee() -> Record {
    let mut amount = CONNECTOR.record("PaymentCurrencyAmount").unwrap();
    amount
        .set("currency", "USD")
        .unwrap()
        .set("value", "3.50".parse::<bot_connector_model::Amount>().unwrap())
        .unwrap();

    let mut item = CONNECTOR.record("PaymentItem").unwrap();
    item.set("label", "Coffee").unwrap().set("amount", amount).unwrap();
    item
}

#[test]
fn payment_item_encode() {
    let item = coffee();
    assert_eq!(
        serde_json::to_string(&item).unwrap(),
        r#"{"label":"Coffee","amount":{"currency":"USD","value":"3.50"}}"#
    );
    assert!(item.to_json().get("pending").is_none());
}

#[test]
fn payment_item_round_trip() {
    let item = coffee();
    let decoded = CONNECTOR
        .decode_str(
            "PaymentItem",
            r#"{"label":"Coffee","amount":{"currency":"USD","value":"3.50"}}"#,
        )
        .unwrap();
    assert_eq!(decoded, item);
    assert_eq!(decoded.hash_code(), item.hash_code());
    assert_eq!(
        CONNECTOR.decode("PaymentItem", item.to_json()).unwrap(),
        item
    );
}

#[test]
fn payment_item_render() {
    assert_eq!(
        coffee().to_string(),
        "PaymentItem {\n  label: Coffee\n  amount: PaymentCurrencyAmount {\n    currency: USD\n    value: 3.50\n  }\n  pending: null\n}"
    );
}

#[test]
fn amounts_compare_literally() {
    let a = CONNECTOR
        .decode("PaymentCurrencyAmount", json!({"currency": "USD", "value": "3.50"}))
        .unwrap();
    let b = CONNECTOR
        .decode("PaymentCurrencyAmount", json!({"currency": "USD", "value": "3.5"}))
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn place_address_variants_differ() {
    let text = CONNECTOR
        .decode("Place", json!({"address": "221B Baker St"}))
        .unwrap();
    let object = CONNECTOR
        .decode("Place", json!({"address": {"streetAddress": "221B Baker St"}}))
        .unwrap();

    assert_ne!(text, object);
    assert_eq!(text.to_json(), json!({"address": "221B Baker St"}));
    assert_eq!(
        object.to_json(),
        json!({"address": {"streetAddress": "221B Baker St"}})
    );

    match object.get("address").unwrap() {
        Some(Value::Any(AnyValue::Record(address))) => {
            assert_eq!(address.type_name(), "PostalAddress")
        }
        other => panic!("unexpected address {other:?}"),
    }

    let built = CONNECTOR
        .record("Place")
        .unwrap()
        .with("address", "221B Baker St")
        .unwrap();
    assert_eq!(built, text);
}

#[test]
fn place_address_takes_only_postal_addresses() {
    let thing = CONNECTOR.record("Thing").unwrap().with("name", "Home").unwrap();
    let mut place = CONNECTOR.record("Place").unwrap();
    assert!(matches!(
        place.set("address", thing.clone()),
        Err(Error::TypeMismatch(field, _, got)) if field == "address" && got == "record Thing"
    ));
    assert!(place.set("hasMap", thing).is_ok());

    let address = CONNECTOR
        .record("PostalAddress")
        .unwrap()
        .with("streetAddress", "221B Baker St")
        .unwrap();
    place.set("address", address).unwrap();
    assert_eq!(CONNECTOR.decode("Place", place.to_json()).unwrap(), place);
}

#[test]
fn place_keeps_unmodelled_shapes() {
    let box_a = CONNECTOR
        .decode("Place", json!({"geo": {"box": "1 2 3 4"}}))
        .unwrap();
    let box_b = CONNECTOR
        .decode("Place", json!({"geo": {"box": "5 6 7 8"}}))
        .unwrap();
    assert_ne!(box_a, box_b);
    assert_eq!(box_a.to_json(), json!({"geo": {"box": "1 2 3 4"}}));
    assert_eq!(CONNECTOR.decode("Place", box_a.to_json()).unwrap(), box_a);

    for wire in [
        json!({"address": {"streetAddress": 221}}),
        json!({"address": 221}),
        json!({"hasMap": false}),
        json!({"geo": [47.6, -122.3]}),
    ] {
        let place = CONNECTOR.decode("Place", wire.clone()).unwrap();
        assert_eq!(place.to_json(), wire);
        assert_eq!(CONNECTOR.decode("Place", place.to_json()).unwrap(), place);
    }

    let place = CONNECTOR
        .decode("Place", json!({"geo": {"latitude": 47.6, "longitude": "-122.3"}}))
        .unwrap();
    match place.get("geo").unwrap() {
        Some(Value::Any(AnyValue::Record(geo))) => assert_eq!(geo.type_name(), "GeoCoordinates"),
        other => panic!("unexpected geo {other:?}"),
    }
}

#[test]
fn coordinates_keep_number_form() {
    let geo = CONNECTOR
        .decode("GeoCoordinates", json!({"latitude": 47.6}))
        .unwrap();
    assert_eq!(serde_json::to_string(&geo).unwrap(), r#"{"latitude":47.6}"#);
    assert_eq!(geo.to_string().lines().nth(2), Some("  latitude: 47.6"));

    let high = CONNECTOR
        .decode_str("GeoCoordinates", r#"{"elevation":1e30}"#)
        .unwrap();
    assert_eq!(CONNECTOR.decode("GeoCoordinates", high.to_json()).unwrap(), high);
}

#[test]
fn thing_ignores_unknown_keys() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let with_extra = CONNECTOR
        .decode("Thing", json!({"type": "Place", "name": "Home", "extra": 42}))
        .unwrap();
    let without = CONNECTOR
        .decode("Thing", json!({"type": "Place", "name": "Home"}))
        .unwrap();
    assert_eq!(with_extra, without);
    assert_eq!(with_extra.hash_code(), without.hash_code());
}

#[test]
fn different_types_never_equal() {
    let thing = CONNECTOR
        .decode("Thing", json!({"type": "Place", "name": "Home"}))
        .unwrap();
    let place = CONNECTOR
        .decode("Place", json!({"type": "Place", "name": "Home"}))
        .unwrap();
    assert_ne!(thing, place);
    assert_ne!(
        CONNECTOR.record("Thing").unwrap(),
        CONNECTOR.record("PostalAddress").unwrap()
    );
}

#[test]
fn conversation_reference() {
    let wire = json!({
        "activityId": "1234",
        "user": {"id": "29:user", "name": "Joe", "role": "user"},
        "bot": {"id": "28:bot", "name": "Assistant", "role": "bot"},
        "conversation": {"isGroup": false, "id": "a:conv"},
        "channelId": "directlinespeech",
        "serviceUrl": "https://directline.botframework.com/"
    });
    let reference = CONNECTOR.decode("ConversationReference", wire.clone()).unwrap();
    assert_eq!(reference.to_json(), wire);
    assert_eq!(reference.present(), 6);

    let rendered = reference.to_string();
    assert!(rendered.starts_with("ConversationReference {\n  activityId: 1234\n  user: ChannelAccount {\n    id: 29:user\n"));
    assert!(rendered.contains("\n  conversation: ConversationAccount {\n    isGroup: false\n    conversationType: null\n"));
    assert!(rendered.ends_with("\n  serviceUrl: https://directline.botframework.com/\n}"));

    assert!(matches!(
        CONNECTOR.decode(
            "ConversationReference",
            json!({"user": {"role": "admin"}})
        ),
        Err(Error::MalformedValue(field, _, _)) if field == "role"
    ));
}

#[test]
fn failed_decode_reports_error() {
    assert!(matches!(
        CONNECTOR.decode("PaymentItem", json!({"label": "Tea", "pending": "soon"})),
        Err(Error::MalformedValue(field, _, _)) if field == "pending"
    ));
    assert!(matches!(
        CONNECTOR.decode_str("PaymentItem", "{\"label\":"),
        Err(Error::JSONSerde(_))
    ));
}
