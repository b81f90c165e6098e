use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const KEY_MAX_LEN: usize = 64;

pub fn parse_country_key(input: &str) -> Result<CountryKey, ValidationError> {
    CountryKey::parse(input)
}

pub fn parse_city_slug(input: &str) -> Result<CitySlug, ValidationError> {
    CitySlug::parse(input)
}

/// The root dataset: country key to country, in insertion order.
///
/// Order carries no semantic meaning but must survive load/save round-trips,
/// hence the ordered map.
pub type Document = IndexMap<CountryKey, Country>;

/// Stable identifier of a country inside the [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct CountryKey(String);

impl CountryKey {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("country key must not be empty".to_string()));
        }
        if s.len() > KEY_MAX_LEN {
            return Err(ValidationError(format!(
                "country key exceeds max length {KEY_MAX_LEN}"
            )));
        }
        if s.contains('/') {
            return Err(ValidationError(
                "country key must not contain '/'".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for CountryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a city, unique within one country's city list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct CitySlug(String);

impl CitySlug {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("city slug must not be empty".to_string()));
        }
        if s.len() > KEY_MAX_LEN {
            return Err(ValidationError(format!(
                "city slug exceeds max length {KEY_MAX_LEN}"
            )));
        }
        if s.contains('/') {
            return Err(ValidationError("city slug must not contain '/'".to_string()));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for CitySlug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub continent: String,
    pub flag: String,
    pub description: String,
    pub hero_image: String,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itineraries: Option<ItineraryBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub slug: CitySlug,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub guides: Vec<Guide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl Guide {
    /// Strips empty optional fields so absence, not `""`, signals "unset".
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title,
            description: none_if_empty(self.description),
            duration: none_if_empty(self.duration),
        }
    }
}

/// Container for a country's itineraries, created on first insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryBlock {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub items: Vec<Itinerary>,
}

impl ItineraryBlock {
    #[must_use]
    pub fn for_country(name: &str) -> Self {
        Self {
            title: format!("{name} Itineraries"),
            description: format!("Explore {name} with our curated itineraries."),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub title: String,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Itinerary {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title,
            cities: self.cities,
            duration: none_if_empty(self.duration),
            description: none_if_empty(self.description),
        }
    }
}

/// Container for a country's transport modes, created on first insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportBlock {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub modes: Vec<TransportMode>,
}

impl TransportBlock {
    #[must_use]
    pub fn for_country(name: &str) -> Self {
        Self {
            title: format!("Getting Around {name}"),
            description: format!("Transportation options in {name}."),
            modes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMode {
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
}

impl TransportMode {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            kind: self.kind,
            details: self.details,
            image: none_if_empty(self.image),
            cost: none_if_empty(self.cost),
        }
    }
}

/// The one normalization rule shared by every payload type: an empty string
/// in an optional field means "unset" and is stored as absence.
#[must_use]
pub fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_key_rejects_empty_and_separator() {
        assert!(CountryKey::parse("").is_err());
        assert!(CountryKey::parse("   ").is_err());
        assert!(CountryKey::parse("ja/pan").is_err());
        assert_eq!(CountryKey::parse(" japan ").unwrap().as_str(), "japan");
    }

    #[test]
    fn country_key_length_cap() {
        let long = "k".repeat(KEY_MAX_LEN + 1);
        assert!(CountryKey::parse(&long).is_err());
        let ok = "k".repeat(KEY_MAX_LEN);
        assert!(CountryKey::parse(&ok).is_ok());
    }

    #[test]
    fn none_if_empty_keeps_whitespace_values() {
        assert_eq!(none_if_empty(Some(String::new())), None);
        assert_eq!(none_if_empty(None), None);
        assert_eq!(
            none_if_empty(Some("2 days".to_string())).as_deref(),
            Some("2 days")
        );
        // Whitespace is a value, only the empty string means unset.
        assert_eq!(none_if_empty(Some(" ".to_string())).as_deref(), Some(" "));
    }
}
