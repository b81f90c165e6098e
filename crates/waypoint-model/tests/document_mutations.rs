use waypoint_model::{
    add_city, add_guide, add_itinerary, add_transport_mode, create_country, delete_city,
    delete_country, delete_guide, delete_itinerary, delete_transport_mode, City, Country, Document,
    Guide, Itinerary, MutationErrorCode, TransportMode,
};

fn key(raw: &str) -> waypoint_model::CountryKey {
    waypoint_model::parse_country_key(raw).expect("valid key")
}

fn slug(raw: &str) -> waypoint_model::CitySlug {
    waypoint_model::parse_city_slug(raw).expect("valid slug")
}

fn country(name: &str) -> Country {
    Country {
        name: name.to_string(),
        continent: "Asia".to_string(),
        flag: "🇯🇵".to_string(),
        description: format!("All about {name}"),
        hero_image: "/images/hero.jpg".to_string(),
        cities: Vec::new(),
        itineraries: None,
        transport: None,
    }
}

fn city(raw_slug: &str) -> City {
    City {
        slug: slug(raw_slug),
        name: raw_slug.to_string(),
        description: String::new(),
        image: String::new(),
        guides: Vec::new(),
    }
}

fn guide(title: &str) -> Guide {
    Guide {
        title: title.to_string(),
        description: None,
        duration: None,
    }
}

#[test]
fn create_country_then_exists() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    assert!(doc.contains_key(&key("japan")));
}

#[test]
fn duplicate_country_key_rejected_and_state_unchanged() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    let mut second = country("Japan II");
    second.continent = "Europe".to_string();
    let err = create_country(&mut doc, key("japan"), second).expect_err("duplicate");
    assert_eq!(err.code, MutationErrorCode::AlreadyExists);
    assert_eq!(doc.len(), 1);
    assert_eq!(doc[&key("japan")].name, "Japan");
}

#[test]
fn delete_country_missing_is_not_found() {
    let mut doc = Document::new();
    let err = delete_country(&mut doc, &key("atlantis")).expect_err("missing");
    assert_eq!(err.code, MutationErrorCode::NotFound);
    assert_eq!(err.message, "Country not found");
}

#[test]
fn delete_country_preserves_sibling_order() {
    let mut doc = Document::new();
    for k in ["japan", "france", "peru"] {
        create_country(&mut doc, key(k), country(k)).expect("create");
    }
    delete_country(&mut doc, &key("france")).expect("delete");
    let remaining: Vec<&str> = doc.keys().map(waypoint_model::CountryKey::as_str).collect();
    assert_eq!(remaining, vec!["japan", "peru"]);
}

#[test]
fn add_then_delete_city_restores_prior_sequence() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    add_city(&mut doc, &key("japan"), city("tokyo")).expect("add tokyo");
    add_city(&mut doc, &key("japan"), city("kyoto")).expect("add kyoto");
    let before: Vec<String> = doc[&key("japan")]
        .cities
        .iter()
        .map(|c| c.slug.as_str().to_string())
        .collect();

    add_city(&mut doc, &key("japan"), city("osaka")).expect("add osaka");
    delete_city(&mut doc, &key("japan"), &slug("osaka")).expect("delete osaka");

    let after: Vec<String> = doc[&key("japan")]
        .cities
        .iter()
        .map(|c| c.slug.as_str().to_string())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn add_city_to_missing_country_fails() {
    let mut doc = Document::new();
    let err = add_city(&mut doc, &key("japan"), city("tokyo")).expect_err("no country");
    assert_eq!(err.message, "Country not found");
}

#[test]
fn delete_city_missing_slug_fails() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    let err = delete_city(&mut doc, &key("japan"), &slug("tokyo")).expect_err("no city");
    assert_eq!(err.message, "City not found");
}

#[test]
fn add_guide_strips_empty_optional_fields() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    add_city(&mut doc, &key("japan"), city("tokyo")).expect("add city");
    add_guide(
        &mut doc,
        &key("japan"),
        &slug("tokyo"),
        Guide {
            title: "Shibuya at night".to_string(),
            description: Some(String::new()),
            duration: Some("3 hours".to_string()),
        },
    )
    .expect("add guide");

    let stored = &doc[&key("japan")].cities[0].guides[0];
    assert_eq!(stored.description, None);
    assert_eq!(stored.duration.as_deref(), Some("3 hours"));
}

#[test]
fn delete_guide_validates_index_bounds() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    add_city(&mut doc, &key("japan"), city("tokyo")).expect("add city");
    for i in 0..3 {
        add_guide(&mut doc, &key("japan"), &slug("tokyo"), guide(&format!("g{i}")))
            .expect("add guide");
    }

    let err = delete_guide(&mut doc, &key("japan"), &slug("tokyo"), 3).expect_err("index == len");
    assert_eq!(err.message, "Guide not found");
    assert_eq!(doc[&key("japan")].cities[0].guides.len(), 3);

    let removed = delete_guide(&mut doc, &key("japan"), &slug("tokyo"), 1).expect("valid index");
    assert_eq!(removed.title, "g1");
    let titles: Vec<&str> = doc[&key("japan")].cities[0]
        .guides
        .iter()
        .map(|g| g.title.as_str())
        .collect();
    assert_eq!(titles, vec!["g0", "g2"]);
}

#[test]
fn delete_guide_reports_missing_path_segment() {
    let mut doc = Document::new();
    let err = delete_guide(&mut doc, &key("japan"), &slug("tokyo"), 0).expect_err("no country");
    assert_eq!(err.message, "Country not found");

    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    let err = delete_guide(&mut doc, &key("japan"), &slug("tokyo"), 0).expect_err("no city");
    assert_eq!(err.message, "City not found");
}

#[test]
fn first_itinerary_materializes_block_with_derived_text() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    add_itinerary(
        &mut doc,
        &key("japan"),
        Itinerary {
            title: "Golden Route".to_string(),
            cities: vec!["tokyo".to_string(), "kyoto".to_string()],
            duration: Some(String::new()),
            description: None,
        },
    )
    .expect("add itinerary");

    let block = doc[&key("japan")].itineraries.as_ref().expect("block");
    assert_eq!(block.title, "Japan Itineraries");
    assert!(block.description.contains("Japan"));
    assert_eq!(block.items.len(), 1);
    assert_eq!(block.items[0].duration, None);
}

#[test]
fn second_itinerary_reuses_existing_block() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    for title in ["a", "b"] {
        add_itinerary(
            &mut doc,
            &key("japan"),
            Itinerary {
                title: title.to_string(),
                cities: Vec::new(),
                duration: None,
                description: None,
            },
        )
        .expect("add itinerary");
    }
    let block = doc[&key("japan")].itineraries.as_ref().expect("block");
    assert_eq!(block.items.len(), 2);
}

#[test]
fn delete_itinerary_without_block_is_not_found() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    let err = delete_itinerary(&mut doc, &key("japan"), 0).expect_err("no block");
    assert_eq!(err.message, "Itinerary not found");
}

#[test]
fn transport_block_lazy_creation_and_bounds() {
    let mut doc = Document::new();
    create_country(&mut doc, key("japan"), country("Japan")).expect("create");
    add_transport_mode(
        &mut doc,
        &key("japan"),
        TransportMode {
            kind: "train".to_string(),
            details: "Shinkansen network".to_string(),
            image: None,
            cost: Some(String::new()),
        },
    )
    .expect("add mode");

    let block = doc[&key("japan")].transport.as_ref().expect("block");
    assert_eq!(block.title, "Getting Around Japan");
    assert_eq!(block.description, "Transportation options in Japan.");
    assert_eq!(block.modes[0].cost, None);

    let err = delete_transport_mode(&mut doc, &key("japan"), 1).expect_err("stale index");
    assert_eq!(err.message, "Transport mode not found");
    delete_transport_mode(&mut doc, &key("japan"), 0).expect("valid index");
    assert!(doc[&key("japan")]
        .transport
        .as_ref()
        .expect("block stays")
        .modes
        .is_empty());
}
