use proptest::prelude::*;
use proptest::test_runner::Config;
use waypoint_model::{
    add_guide, create_country, delete_country, delete_guide, parse_city_slug, parse_country_key,
    City, Country, Document, Guide,
};

fn fixture_country(name: &str) -> Country {
    Country {
        name: name.to_string(),
        continent: String::new(),
        flag: String::new(),
        description: String::new(),
        hero_image: String::new(),
        cities: vec![City {
            slug: parse_city_slug("base").expect("slug"),
            name: "Base".to_string(),
            description: String::new(),
            image: String::new(),
            guides: Vec::new(),
        }],
        itineraries: None,
        transport: None,
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn create_then_delete_leaves_document_empty(raw_key in "[a-z][a-z0-9-]{0,20}") {
        let key = parse_country_key(&raw_key).expect("generated key is valid");
        let mut doc = Document::new();
        create_country(&mut doc, key.clone(), fixture_country(&raw_key)).expect("create");
        prop_assert!(doc.contains_key(&key));
        delete_country(&mut doc, &key).expect("delete");
        prop_assert!(doc.is_empty());
    }

    #[test]
    fn guide_delete_succeeds_exactly_within_bounds(n in 0usize..8, index in 0usize..12) {
        let key = parse_country_key("japan").expect("key");
        let slug = parse_city_slug("base").expect("slug");
        let mut doc = Document::new();
        create_country(&mut doc, key.clone(), fixture_country("Japan")).expect("create");
        for i in 0..n {
            add_guide(&mut doc, &key, &slug, Guide {
                title: format!("g{i}"),
                description: None,
                duration: None,
            }).expect("add guide");
        }
        let result = delete_guide(&mut doc, &key, &slug, index);
        prop_assert_eq!(result.is_ok(), index < n);
        let remaining = doc[&key].cities[0].guides.len();
        prop_assert_eq!(remaining, if index < n { n - 1 } else { n });
    }

    #[test]
    fn normalization_never_stores_empty_optionals(
        description in prop::option::of("[a-z ]{0,12}"),
        duration in prop::option::of("[0-9]{0,3}"),
    ) {
        let normalized = Guide {
            title: "t".to_string(),
            description,
            duration,
        }.normalized();
        prop_assert!(normalized.description.as_deref() != Some(""));
        prop_assert!(normalized.duration.as_deref() != Some(""));
    }
}
