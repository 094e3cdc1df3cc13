//! City registry and page grouping.

use crate::error::{GuideError, Result};
use crate::types::{Category, PlaceMatch};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Slugs of the cities the guide covers, in menu order.
pub const DEFAULT_CITIES: [&str; 6] = ["london", "tokyo", "paris", "madrid", "leeds", "new-york"];

/// The set of cities pages can be generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityRegistry {
  slugs: Vec<String>,
}

impl Default for CityRegistry {
  fn default() -> Self {
    Self::new(DEFAULT_CITIES)
  }
}

impl CityRegistry {
  pub fn new<I, S>(slugs: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      slugs: slugs.into_iter().map(Into::into).collect(),
    }
  }

  /// Every slug, in order.
  pub fn slugs(&self) -> &[String] {
    &self.slugs
  }

  pub fn contains(&self, slug: &str) -> bool {
    self.slugs.iter().any(|s| s == slug)
  }

  /// Checks a slug from a route, returning the registered slug.
  pub fn resolve(&self, slug: &str) -> Result<&str> {
    self
      .slugs
      .iter()
      .find(|s| *s == slug)
      .map(String::as_str)
      .ok_or_else(|| GuideError::UnknownCity(slug.to_string()))
  }

  pub fn is_empty(&self) -> bool {
    self.slugs.is_empty()
  }
}

/// Title-cases a slug for display: `new-york` becomes `New York`.
pub fn display_name(slug: &str) -> String {
  slug
    .split('-')
    .filter(|word| !word.is_empty())
    .map(|word| {
      let mut graphemes = word.graphemes(true);
      match graphemes.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), graphemes.as_str()),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Results split into per-category page sections, each in result order.
#[derive(Debug, Clone, Default)]
pub struct CategorySections {
  pub eat: Vec<PlaceMatch>,
  pub see: Vec<PlaceMatch>,
  pub do_: Vec<PlaceMatch>,
}

impl CategorySections {
  /// Splits `results` by category.
  pub fn from_results(results: impl IntoIterator<Item = PlaceMatch>) -> Self {
    let mut sections = Self::default();
    for m in results {
      match m.item.category {
        Category::Eat => sections.eat.push(m),
        Category::See => sections.see.push(m),
        Category::Do => sections.do_.push(m),
      }
    }
    sections
  }

  /// The section for one category.
  pub fn get(&self, category: Category) -> &[PlaceMatch] {
    match category {
      Category::Eat => &self.eat,
      Category::See => &self.see,
      Category::Do => &self.do_,
    }
  }

  /// Non-empty sections in display order.
  pub fn non_empty(&self) -> impl Iterator<Item = (Category, &[PlaceMatch])> {
    Category::ALL
      .into_iter()
      .map(move |category| (category, self.get(category)))
      .filter(|(_, section)| !section.is_empty())
  }

  pub fn is_empty(&self) -> bool {
    self.eat.is_empty() && self.see.is_empty() && self.do_.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Place;

  #[test]
  fn test_display_name() {
    assert_eq!(display_name("new-york"), "New York");
    assert_eq!(display_name("london"), "London");
    assert_eq!(display_name("évora"), "Évora");
    assert_eq!(display_name(""), "");
  }

  #[test]
  fn test_resolve() {
    let registry = CityRegistry::default();
    assert_eq!(registry.resolve("leeds").unwrap(), "leeds");
    assert!(matches!(registry.resolve("atlantis"), Err(GuideError::UnknownCity(_))));
    assert_eq!(registry.slugs().len(), 6);
  }

  #[test]
  fn test_sections() {
    let results = vec![
      PlaceMatch::new(Place::new("1", "Park", Category::Do), 0, 0),
      PlaceMatch::new(Place::new("2", "Cafe", Category::Eat), 0, 1),
      PlaceMatch::new(Place::new("3", "Bistro", Category::Eat), 0, 2),
    ];
    let sections = CategorySections::from_results(results);

    assert_eq!(sections.eat.len(), 2);
    assert_eq!(sections.eat[1].item.name, "Bistro");
    let order: Vec<Category> = sections.non_empty().map(|(c, _)| c).collect();
    assert_eq!(order, vec![Category::Eat, Category::Do]);
  }
}
