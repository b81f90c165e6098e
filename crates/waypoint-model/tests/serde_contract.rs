use serde_json::{json, Value};
use waypoint_model::{Country, Document, Guide, TransportMode};

#[test]
fn unset_optional_fields_are_absent_not_null() {
    let guide = Guide {
        title: "Louvre".to_string(),
        description: None,
        duration: Some("2 hours".to_string()),
    };
    let value = serde_json::to_value(&guide).expect("serialize guide");
    assert_eq!(value, json!({"title": "Louvre", "duration": "2 hours"}));
    assert!(value.get("description").is_none());
}

#[test]
fn country_wire_shape_uses_camel_case_hero_image() {
    let raw = json!({
        "name": "Japan",
        "continent": "Asia",
        "flag": "🇯🇵",
        "description": "Islands",
        "heroImage": "/images/japan.jpg"
    });
    let country: Country = serde_json::from_value(raw).expect("deserialize country");
    assert_eq!(country.hero_image, "/images/japan.jpg");
    assert!(country.cities.is_empty(), "missing cities defaults to empty");
    assert_eq!(country.itineraries, None);

    let back = serde_json::to_value(&country).expect("serialize country");
    assert!(back.get("heroImage").is_some());
    assert!(back.get("hero_image").is_none());
    assert!(
        back.get("itineraries").is_none(),
        "lazy block absent until first insert"
    );
}

#[test]
fn transport_mode_round_trips_type_keyword_field() {
    let raw = json!({"type": "metro", "details": "Line 1-14", "cost": "€2.10"});
    let mode: TransportMode = serde_json::from_value(raw.clone()).expect("deserialize mode");
    assert_eq!(mode.kind, "metro");
    assert_eq!(serde_json::to_value(&mode).expect("serialize mode"), raw);
}

#[test]
fn document_preserves_key_insertion_order() {
    let raw = r#"{
        "peru": {"name":"Peru","continent":"South America","flag":"🇵🇪","description":"","heroImage":""},
        "japan": {"name":"Japan","continent":"Asia","flag":"🇯🇵","description":"","heroImage":""},
        "france": {"name":"France","continent":"Europe","flag":"🇫🇷","description":"","heroImage":""}
    }"#;
    let doc: Document = serde_json::from_str(raw).expect("deserialize document");
    let keys: Vec<&str> = doc.keys().map(waypoint_model::CountryKey::as_str).collect();
    assert_eq!(keys, vec!["peru", "japan", "france"]);

    let serialized = serde_json::to_string(&doc).expect("serialize document");
    let peru = serialized.find("\"peru\"").expect("peru");
    let japan = serialized.find("\"japan\"").expect("japan");
    let france = serialized.find("\"france\"").expect("france");
    assert!(peru < japan && japan < france, "order survives round-trip");
}

#[test]
fn malformed_document_is_rejected() {
    let err = serde_json::from_str::<Document>("[1,2,3]").expect_err("array is not a document");
    let _ = err.to_string();

    let missing_name = json!({"japan": {"continent": "Asia"}});
    assert!(serde_json::from_value::<Document>(missing_name).is_err());
}

#[test]
fn empty_document_round_trips_as_empty_object() {
    let doc: Document = serde_json::from_str("{}").expect("empty document");
    assert!(doc.is_empty());
    assert_eq!(serde_json::to_string(&doc).expect("serialize"), "{}");
}

#[test]
fn stored_guide_with_value_round_trips_unchanged() {
    let raw = json!({"title": "Tea ceremony", "description": "Book ahead", "duration": "1 hour"});
    let guide: Guide = serde_json::from_value(raw.clone()).expect("deserialize");
    let back: Value = serde_json::to_value(&guide).expect("serialize");
    assert_eq!(back, raw);
}
