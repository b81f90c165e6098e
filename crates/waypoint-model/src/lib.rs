#![forbid(unsafe_code)]
//! Waypoint content model SSOT.
//!
//! The whole dataset is one [`Document`]: an insertion-ordered map from
//! country key to [`Country`], with cities, guides, and the lazily created
//! itinerary/transport blocks nested inside. Mutations resolve their target
//! through the shared path helpers so every operation reports missing
//! segments the same way.

mod document;
mod mutation;
mod path;

pub use document::{
    none_if_empty, parse_city_slug, parse_country_key, City, CitySlug, Country, CountryKey,
    Document, Guide, Itinerary, ItineraryBlock, TransportBlock, TransportMode, ValidationError,
    KEY_MAX_LEN,
};
pub use mutation::{
    add_city, add_guide, add_itinerary, add_transport_mode, create_country, delete_city,
    delete_country, delete_guide, delete_itinerary, delete_transport_mode, MutationError,
    MutationErrorCode,
};
pub use path::{resolve_city_mut, resolve_country_mut, PathError, PathSegment};

pub const CRATE_NAME: &str = "waypoint-model";
