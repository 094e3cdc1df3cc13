//! Place storage.
//!
//! The guide reads places from a headless data source that returns pages of
//! loosely typed records. [`RawRecord`] mirrors that wire format and
//! [`transform_record`] turns one into a [`Place`], filling safe defaults and
//! normalizing tags once so nothing downstream re-parses them.

use crate::error::Result;
use crate::types::{Category, GeoPoint, Place};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// A source of places.
///
/// Implementations never fail outward: any upstream problem is logged and
/// reported as an empty sequence so the page can show its empty state.
pub trait PlaceStore {
  /// Places for one city (case-insensitive slug), or for every city when
  /// `city` is `None`. An empty slug yields no places.
  fn fetch_places(&self, city: Option<&str>) -> Vec<Place>;
}

/// One page of records as returned by the data source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
  #[serde(default)]
  pub records: Vec<RawRecord>,
}

/// A record in the upstream wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
  pub id: String,
  #[serde(default)]
  pub fields: RawFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawFields {
  pub name: Option<String>,
  pub description: Option<String>,
  pub category: Option<String>,
  pub city: Option<String>,
  pub address: Option<String>,
  /// String, array, or mixed array of comma-joined fragments.
  #[serde(default)]
  pub tags: Value,
  #[serde(default)]
  pub must_visit: Value,
  pub website: Option<String>,
  #[serde(rename = "InstagramURL")]
  pub instagram_url: Option<String>,
  pub location: Option<RawLocation>,
  #[serde(default)]
  pub images: Vec<RawImage>,
  pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
  pub latitude: f64,
  pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
  pub url: Option<String>,
  pub thumbnails: Option<RawThumbnails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawThumbnails {
  pub large: Option<RawThumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawThumbnail {
  pub url: Option<String>,
}

/// Loose truthiness for flags that arrive as booleans, numbers or strings.
fn truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}

/// The image for a card: large thumbnail, then the original image, then a
/// per-category placeholder.
fn image_url(images: &[RawImage], category: Option<&str>) -> String {
  images
    .first()
    .and_then(|image| {
      image
        .thumbnails
        .as_ref()
        .and_then(|t| t.large.as_ref())
        .and_then(|large| large.url.clone())
        .or_else(|| image.url.clone())
    })
    .unwrap_or_else(|| {
      let category = category
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "default".to_string());
      format!("/images/placeholder-{category}.jpg")
    })
}

/// Converts a raw record into a place.
///
/// Missing text fields become empty strings. Returns `None` for records
/// whose category is not EAT, SEE or DO, since the guide cannot file them.
pub fn transform_record(record: RawRecord) -> Option<Place> {
  let RawRecord { id, fields } = record;

  let category = match fields.category.as_deref().map(str::parse::<Category>) {
    Some(Ok(category)) => category,
    _ => {
      warn!(id = %id, category = ?fields.category, "skipping record without a valid category");
      return None;
    }
  };

  let tags = crate::tags::normalize_value(&fields.tags);
  debug!(id = %id, tags = tags.len(), "transformed record");

  Some(Place {
    image_url: Some(image_url(&fields.images, fields.category.as_deref())),
    id,
    name: fields.name.unwrap_or_default(),
    description: fields.description.unwrap_or_default(),
    category,
    city: fields.city.unwrap_or_default(),
    address: fields.address.unwrap_or_default(),
    tags,
    must_visit: truthy(&fields.must_visit),
    location: fields.location.map(|l| GeoPoint {
      lat: l.latitude,
      lng: l.longitude,
    }),
    website: non_empty(fields.website),
    instagram_url: non_empty(fields.instagram_url),
    rating: fields.rating,
  })
}

/// An in-memory store of places, in source order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
  places: Vec<Place>,
}

impl InMemoryStore {
  /// Creates a store from already transformed places.
  pub fn new(places: Vec<Place>) -> Self {
    Self { places }
  }

  /// Transforms raw records, dropping the ones that cannot be filed.
  pub fn from_records(records: Vec<RawRecord>) -> Self {
    let total = records.len();
    let places: Vec<Place> = records.into_iter().filter_map(transform_record).collect();
    if places.len() < total {
      warn!(skipped = total - places.len(), "some records were skipped");
    }
    Self { places }
  }

  /// Parses a page of records from JSON.
  pub fn from_json_str(json: &str) -> Result<Self> {
    let page: RecordPage = serde_json::from_str(json)?;
    Ok(Self::from_records(page.records))
  }

  /// Reads a page of records from a JSON file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let store = Self::from_json_str(&json)?;
    info!(path = %path.display(), places = store.len(), "loaded places");
    Ok(store)
  }

  /// Like [`InMemoryStore::load`], but any failure yields an empty store.
  pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    Self::load(path).unwrap_or_else(|e| {
      error!(path = %path.display(), error = %e, "failed to load places, continuing with none");
      Self::default()
    })
  }

  pub fn len(&self) -> usize {
    self.places.len()
  }

  pub fn is_empty(&self) -> bool {
    self.places.is_empty()
  }
}

impl PlaceStore for InMemoryStore {
  fn fetch_places(&self, city: Option<&str>) -> Vec<Place> {
    let Some(city) = city else {
      return self.places.clone();
    };
    let city = city.trim().to_lowercase();
    if city.is_empty() {
      error!("no city provided to fetch_places");
      return Vec::new();
    }
    let places: Vec<Place> = self
      .places
      .iter()
      .filter(|place| place.city.to_lowercase() == city)
      .cloned()
      .collect();
    debug!(city = %city, places = places.len(), "fetched places");
    places
  }
}
