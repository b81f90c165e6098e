use crate::document::{City, CitySlug, Country, CountryKey, Document};
use std::fmt::{Display, Formatter};

/// Which segment of a logical path `(country, city?, index?)` was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathSegment {
    Country,
    City,
    Guide,
    Itinerary,
    TransportMode,
}

impl PathSegment {
    #[must_use]
    pub const fn not_found_message(self) -> &'static str {
        match self {
            Self::Country => "Country not found",
            Self::City => "City not found",
            Self::Guide => "Guide not found",
            Self::Itinerary => "Itinerary not found",
            Self::TransportMode => "Transport mode not found",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathError {
    pub segment: PathSegment,
}

impl PathError {
    #[must_use]
    pub const fn new(segment: PathSegment) -> Self {
        Self { segment }
    }
}

impl Display for PathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segment.not_found_message())
    }
}

impl std::error::Error for PathError {}

pub fn resolve_country_mut<'a>(
    document: &'a mut Document,
    key: &CountryKey,
) -> Result<&'a mut Country, PathError> {
    document
        .get_mut(key)
        .ok_or(PathError::new(PathSegment::Country))
}

/// First match by slug; slugs are unique within one country by invariant.
pub fn resolve_city_mut<'a>(
    country: &'a mut Country,
    slug: &CitySlug,
) -> Result<&'a mut City, PathError> {
    country
        .cities
        .iter_mut()
        .find(|city| &city.slug == slug)
        .ok_or(PathError::new(PathSegment::City))
}

/// Stale indices from an outdated client view are rejected, never clamped.
pub(crate) fn check_index(len: usize, index: usize, segment: PathSegment) -> Result<(), PathError> {
    if index < len {
        Ok(())
    } else {
        Err(PathError::new(segment))
    }
}
