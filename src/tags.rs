//! Tag normalization.
//!
//! Tags reach the guide in several shapes: a single comma-joined string, an
//! array of strings, or an array whose elements are themselves comma-joined.
//! Everything is flattened here, once, into a list of trimmed non-empty
//! strings. The aggregator, filter and scorer only ever see that list.

use crate::error::GuideError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Derives the tag id used in URLs and tag predicates.
///
/// The id is the lowercased, trimmed tag with every whitespace run replaced by
/// a single `-`, so `"Hidden  Gem"` becomes `"hidden-gem"`.
pub fn tag_id(tag: &str) -> String {
  tag
    .trim()
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
}

/// A normalized, non-empty tag id.
///
/// Only [`TagId::new`] builds one, so every id is exactly what [`tag_id`]
/// produces for some tag and survives a trip through the `tags` URL
/// parameter unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagId(String);

impl TagId {
  /// Normalizes `tag` into an id. Returns `None` if nothing is left, or if
  /// the tag is really several comma-joined tags.
  pub fn new(tag: &str) -> Option<Self> {
    let id = tag_id(tag);
    (!id.is_empty() && !id.contains(',')).then_some(TagId(id))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TagId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl TryFrom<String> for TagId {
  type Error = GuideError;

  fn try_from(tag: String) -> Result<Self, Self::Error> {
    TagId::new(&tag).ok_or(GuideError::InvalidTag(tag))
  }
}

impl From<TagId> for String {
  fn from(id: TagId) -> Self {
    id.0
  }
}

/// Splits one comma-joined fragment into trimmed, non-empty tags.
pub fn split_fragment(fragment: &str) -> Vec<String> {
  fragment
    .split(',')
    .map(str::trim)
    .filter(|tag| !tag.is_empty())
    .map(str::to_string)
    .collect()
}

/// Flattens a sequence of fragments, splitting any comma-joined ones.
pub fn normalize<I, S>(fragments: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  fragments
    .into_iter()
    .flat_map(|fragment| split_fragment(fragment.as_ref()))
    .collect()
}

/// Normalizes a loosely typed JSON tag value.
///
/// Strings and arrays are handled as described in the module docs. Nested
/// arrays are flattened, `null` contributes nothing, and any other scalar is
/// taken by its textual form.
pub fn normalize_value(value: &Value) -> Vec<String> {
  match value {
    Value::Null => Vec::new(),
    Value::String(s) => split_fragment(s),
    Value::Array(items) => items.iter().flat_map(normalize_value).collect(),
    other => split_fragment(&other.to_string()),
  }
}

/// `deserialize_with` adapter so a `Vec<String>` field accepts every tag shape.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  Ok(normalize_value(&value))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_tag_id() {
    assert_eq!(tag_id("Hidden Gem"), "hidden-gem");
    assert_eq!(tag_id("  Family \t Friendly "), "family-friendly");
    assert_eq!(tag_id("Rooftop"), "rooftop");
  }

  #[test]
  fn test_tag_id_newtype() {
    assert_eq!(TagId::new(" Hidden  Gem ").unwrap().as_str(), "hidden-gem");
    assert!(TagId::new("").is_none());
    assert!(TagId::new(" \t ").is_none());
    assert!(TagId::new("a,b").is_none());

    let id: TagId = serde_json::from_value(json!("Rooftop Bar")).unwrap();
    assert_eq!(id.to_string(), "rooftop-bar");
    assert!(serde_json::from_value::<TagId>(json!("")).is_err());
  }

  #[test]
  fn test_comma_joined_string() {
    let tags = normalize_value(&json!("Fine Dining, Classic ,, British"));
    assert_eq!(tags, vec!["Fine Dining", "Classic", "British"]);
  }

  #[test]
  fn test_mixed_array() {
    let tags = normalize_value(&json!(["Art, History", "  ", "Culture", null]));
    assert_eq!(tags, vec!["Art", "History", "Culture"]);
  }

  #[test]
  fn test_non_string_scalar() {
    assert_eq!(normalize_value(&json!(42)), vec!["42"]);
    assert!(normalize_value(&Value::Null).is_empty());
  }

  #[test]
  fn test_normalize_fragments() {
    let tags = normalize(["Outdoors,Nature", "Walking"]);
    assert_eq!(tags, vec!["Outdoors", "Nature", "Walking"]);
  }
}
