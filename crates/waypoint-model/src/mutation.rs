//! Structural edits over the in-memory [`Document`] tree.
//!
//! Each operation validates its whole path before touching the tree, so a
//! failed call leaves the document exactly as it was.

use crate::document::{
    City, CitySlug, Country, CountryKey, Document, Guide, Itinerary, ItineraryBlock, TransportBlock,
    TransportMode,
};
use crate::path::{check_index, resolve_city_mut, resolve_country_mut, PathError, PathSegment};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MutationErrorCode {
    NotFound,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationError {
    pub code: MutationErrorCode,
    pub message: String,
}

impl MutationError {
    #[must_use]
    pub fn new(code: MutationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MutationError {}

impl From<PathError> for MutationError {
    fn from(err: PathError) -> Self {
        Self::new(MutationErrorCode::NotFound, err.segment.not_found_message())
    }
}

pub fn create_country(
    document: &mut Document,
    key: CountryKey,
    country: Country,
) -> Result<(), MutationError> {
    if document.contains_key(&key) {
        return Err(MutationError::new(
            MutationErrorCode::AlreadyExists,
            "Country already exists",
        ));
    }
    document.insert(key, country);
    Ok(())
}

/// Removes the country and all its descendants, preserving sibling order.
pub fn delete_country(document: &mut Document, key: &CountryKey) -> Result<Country, MutationError> {
    document
        .shift_remove(key)
        .ok_or_else(|| PathError::new(PathSegment::Country).into())
}

pub fn add_city(
    document: &mut Document,
    key: &CountryKey,
    city: City,
) -> Result<(), MutationError> {
    let country = resolve_country_mut(document, key)?;
    country.cities.push(city);
    Ok(())
}

pub fn delete_city(
    document: &mut Document,
    key: &CountryKey,
    slug: &CitySlug,
) -> Result<City, MutationError> {
    let country = resolve_country_mut(document, key)?;
    let position = country
        .cities
        .iter()
        .position(|city| &city.slug == slug)
        .ok_or(PathError::new(PathSegment::City))?;
    Ok(country.cities.remove(position))
}

pub fn add_guide(
    document: &mut Document,
    key: &CountryKey,
    slug: &CitySlug,
    guide: Guide,
) -> Result<(), MutationError> {
    let country = resolve_country_mut(document, key)?;
    let city = resolve_city_mut(country, slug)?;
    city.guides.push(guide.normalized());
    Ok(())
}

pub fn delete_guide(
    document: &mut Document,
    key: &CountryKey,
    slug: &CitySlug,
    index: usize,
) -> Result<Guide, MutationError> {
    let country = resolve_country_mut(document, key)?;
    let city = resolve_city_mut(country, slug)?;
    check_index(city.guides.len(), index, PathSegment::Guide)?;
    Ok(city.guides.remove(index))
}

/// Get-or-create, then append: the block and its derived text materialize on
/// the first insert and only then.
pub fn add_itinerary(
    document: &mut Document,
    key: &CountryKey,
    itinerary: Itinerary,
) -> Result<(), MutationError> {
    let country = resolve_country_mut(document, key)?;
    let block = itinerary_block_mut(country);
    block.items.push(itinerary.normalized());
    Ok(())
}

pub fn delete_itinerary(
    document: &mut Document,
    key: &CountryKey,
    index: usize,
) -> Result<Itinerary, MutationError> {
    let country = resolve_country_mut(document, key)?;
    let block = country
        .itineraries
        .as_mut()
        .ok_or(PathError::new(PathSegment::Itinerary))?;
    check_index(block.items.len(), index, PathSegment::Itinerary)?;
    Ok(block.items.remove(index))
}

pub fn add_transport_mode(
    document: &mut Document,
    key: &CountryKey,
    mode: TransportMode,
) -> Result<(), MutationError> {
    let country = resolve_country_mut(document, key)?;
    let block = transport_block_mut(country);
    block.modes.push(mode.normalized());
    Ok(())
}

pub fn delete_transport_mode(
    document: &mut Document,
    key: &CountryKey,
    index: usize,
) -> Result<TransportMode, MutationError> {
    let country = resolve_country_mut(document, key)?;
    let block = country
        .transport
        .as_mut()
        .ok_or(PathError::new(PathSegment::TransportMode))?;
    check_index(block.modes.len(), index, PathSegment::TransportMode)?;
    Ok(block.modes.remove(index))
}

fn itinerary_block_mut(country: &mut Country) -> &mut ItineraryBlock {
    let name = country.name.clone();
    country
        .itineraries
        .get_or_insert_with(|| ItineraryBlock::for_country(&name))
}

fn transport_block_mut(country: &mut Country) -> &mut TransportBlock {
    let name = country.name.clone();
    country
        .transport
        .get_or_insert_with(|| TransportBlock::for_country(&name))
}
