//! Core data types for the city guide.

use crate::error::GuideError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Type alias for place identifiers.
///
/// Identifiers are opaque strings handed out by the place store and are only
/// guaranteed to be unique within one city's result set.
pub type PlaceId = String;

/// The three kinds of place the guide lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
  /// Restaurants, cafes and bars.
  Eat,
  /// Sights, museums and landmarks.
  See,
  /// Activities.
  Do,
}

impl Category {
  /// Every category in display order.
  pub const ALL: [Category; 3] = [Category::Eat, Category::See, Category::Do];

  /// The canonical wire form (`EAT`, `SEE`, `DO`).
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Eat => "EAT",
      Category::See => "SEE",
      Category::Do => "DO",
    }
  }

  /// Parses the exact wire form only. URL values go through here.
  pub fn from_wire(s: &str) -> Option<Self> {
    Category::ALL.into_iter().find(|category| category.as_str() == s)
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = GuideError;

  /// Parses a category from store data, ignoring surrounding whitespace and
  /// letter case.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::from_wire(&s.trim().to_ascii_uppercase())
      .ok_or_else(|| GuideError::InvalidCategory(s.to_string()))
  }
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub lat: f64,
  pub lng: f64,
}

/// A single curated point of interest.
///
/// Places are immutable once fetched. Text fields default to empty strings and
/// `tags` accepts every shape the upstream source produces (see
/// [`crate::tags`]), so a sparse record still deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
  pub id: PlaceId,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub category: Category,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub address: String,
  /// Trimmed, non-empty tags in source order.
  #[serde(default, deserialize_with = "crate::tags::deserialize")]
  pub tags: Vec<String>,
  #[serde(default)]
  pub must_visit: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<GeoPoint>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instagram_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rating: Option<f64>,
}

impl Place {
  /// Creates a place with only the required fields set.
  pub fn new(id: impl Into<PlaceId>, name: impl Into<String>, category: Category) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      description: String::new(),
      category,
      city: String::new(),
      address: String::new(),
      tags: Vec::new(),
      must_visit: false,
      location: None,
      website: None,
      instagram_url: None,
      image_url: None,
      rating: None,
    }
  }

  /// Sets the description.
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  /// Sets the address.
  pub fn with_address(mut self, address: impl Into<String>) -> Self {
    self.address = address.into();
    self
  }

  /// Sets the city slug.
  pub fn with_city(mut self, city: impl Into<String>) -> Self {
    self.city = city.into();
    self
  }

  /// Replaces the tags, normalizing any comma-joined fragments.
  pub fn with_tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.tags = crate::tags::normalize(tags);
    self
  }

  /// Marks the place as a must-visit.
  pub fn must_visit(mut self, must_visit: bool) -> Self {
    self.must_visit = must_visit;
    self
  }

  /// Sets the location.
  pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
    self.location = Some(GeoPoint { lat, lng });
    self
  }

  /// Normalized ids of this place's tags, in tag order.
  pub fn tag_ids(&self) -> impl Iterator<Item = String> + '_ {
    self.tags.iter().map(|tag| crate::tags::tag_id(tag))
  }

  /// The first `limit` tags for a card preview, plus how many were left out.
  pub fn preview_tags(&self, limit: usize) -> (&[String], usize) {
    let shown = limit.min(self.tags.len());
    (&self.tags[..shown], self.tags.len() - shown)
  }
}

/// The fields the relevance scorer looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoredField {
  Name,
  Description,
  Tags,
  Address,
}

/// A place returned from the search engine, with its relevance score.
///
/// When no free-text search is active every match has a score of 0 and empty
/// breakdowns; ranking only exists for text searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceMatch {
  /// The matched place.
  pub item: Place,
  /// Additive relevance score. Matches with a score of 0 are dropped whenever
  /// a search term is active.
  pub score: u32,
  /// Per-field contribution to `score`.
  #[serde(skip_serializing_if = "HashMap::is_empty", default)]
  pub field_scores: HashMap<ScoredField, u32>,
  /// Which terms and tags produced the score.
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub details: Vec<SearchDetail>,
  /// Position of the place in the input sequence.
  pub id: usize,
}

impl PlaceMatch {
  /// Creates a match with no breakdown.
  pub fn new(item: Place, score: u32, id: usize) -> Self {
    Self {
      id,
      item,
      score,
      field_scores: HashMap::new(),
      details: Vec::new(),
    }
  }

  /// Records a non-zero field contribution and adds it to the total score.
  pub fn add_field_score(&mut self, field: ScoredField, score: u32) {
    if score == 0 {
      return;
    }
    let total = self.field_scores.entry(field).or_insert(0);
    *total = total.saturating_add(score);
    self.score = self.score.saturating_add(score);
  }

  /// Adds a search detail to the match.
  pub fn with_detail(mut self, detail: SearchDetail) -> Self {
    self.details.push(detail);
    self
  }
}

/// Explains why a place matched a text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchDetail {
  /// The search term or some of its sub-terms occur in a text field.
  Text {
    field: ScoredField,
    /// Whether the whole normalized term occurs in the field.
    full_term: bool,
    /// Sub-terms found in the field.
    matched_terms: Vec<String>,
  },
  /// Some of the place's tags contain the term or one of its sub-terms.
  Tag {
    matched_tags: Vec<String>,
    total_tags: usize,
  },
}
