//! Tag aggregation.
//!
//! Derives the tag vocabulary for filter controls from the places currently
//! loaded. Tags are counted across every place, sorted by frequency and split
//! into a short "common" row and an "additional" overflow list.

use crate::tags::tag_id;
use crate::types::Place;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A tag with its display label and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAggregate {
  /// Lowercase, hyphenated id (see [`tag_id`]).
  pub id: String,
  /// The original spelling of the first occurrence.
  pub label: String,
  /// Number of occurrences across all places. Always at least 1.
  pub count: usize,
}

/// The three views produced by one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBuckets {
  /// Every tag, by descending count, ties in first-seen order.
  pub all_tags: Vec<TagAggregate>,
  /// Pinned tags that are present, then the most frequent repeated tags.
  pub common_tags: Vec<TagAggregate>,
  /// Everything not in `common_tags`, in the same order as `all_tags`.
  pub additional_tags: Vec<TagAggregate>,
}

impl TagBuckets {
  /// Looks a tag up by id.
  pub fn find(&self, id: &str) -> Option<&TagAggregate> {
    self.all_tags.iter().find(|tag| tag.id == id)
  }

  /// Returns `true` if no place carried any tag.
  pub fn is_empty(&self) -> bool {
    self.all_tags.is_empty()
  }
}

/// Tuning for the common/additional split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
  /// Tag ids always promoted into the common row when present.
  #[serde(default = "default_pinned_tags")]
  pub pinned_tags: Vec<String>,
  /// Size the common row is filled up to. Pinned tags count towards it.
  #[serde(default = "default_common_target")]
  pub common_target: usize,
  /// Minimum count for a non-pinned tag to be promoted.
  #[serde(default = "default_min_count")]
  pub min_count: usize,
}

fn default_pinned_tags() -> Vec<String> {
  ["michelin-starred", "rooftop", "hidden-gem", "family-friendly"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_common_target() -> usize {
  5
}

fn default_min_count() -> usize {
  2
}

impl Default for AggregatorConfig {
  fn default() -> Self {
    Self {
      pinned_tags: default_pinned_tags(),
      common_target: default_common_target(),
      min_count: default_min_count(),
    }
  }
}

/// Computes [`TagBuckets`] from a set of places.
///
/// The aggregator holds no state between runs; every call recomputes from
/// scratch and returns fresh collections.
#[derive(Debug, Clone, Default)]
pub struct TagAggregator {
  config: AggregatorConfig,
}

impl TagAggregator {
  /// Creates an aggregator with the given tuning.
  pub fn new(config: AggregatorConfig) -> Self {
    Self { config }
  }

  /// The tuning in use.
  pub fn config(&self) -> &AggregatorConfig {
    &self.config
  }

  /// Counts tags across `places`.
  ///
  /// Every occurrence counts, including repeats on the same place. The result
  /// is sorted by descending count; the sort is stable so equal counts keep
  /// the order in which their tags were first seen.
  pub fn count(&self, places: &[Place]) -> Vec<TagAggregate> {
    let mut tags: Vec<TagAggregate> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for place in places {
      for tag in &place.tags {
        let id = tag_id(tag);
        if id.is_empty() {
          continue;
        }
        match positions.get(&id) {
          Some(&pos) => tags[pos].count += 1,
          None => {
            positions.insert(id.clone(), tags.len());
            tags.push(TagAggregate {
              id,
              label: tag.trim().to_string(),
              count: 1,
            });
          }
        }
      }
    }

    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
  }

  /// Counts tags and partitions them into common and additional buckets.
  pub fn aggregate(&self, places: &[Place]) -> TagBuckets {
    let all_tags = self.count(places);
    let mut selected: HashSet<&str> = HashSet::new();
    let mut common_tags = Vec::new();

    for pinned in &self.config.pinned_tags {
      let pinned = tag_id(pinned);
      if selected.contains(pinned.as_str()) {
        continue;
      }
      if let Some(tag) = all_tags.iter().find(|tag| tag.id == pinned) {
        selected.insert(tag.id.as_str());
        common_tags.push(tag.clone());
      }
    }

    for tag in &all_tags {
      if common_tags.len() >= self.config.common_target {
        break;
      }
      if tag.count >= self.config.min_count && !selected.contains(tag.id.as_str()) {
        selected.insert(tag.id.as_str());
        common_tags.push(tag.clone());
      }
    }

    let additional_tags = all_tags
      .iter()
      .filter(|tag| !selected.contains(tag.id.as_str()))
      .cloned()
      .collect();

    TagBuckets {
      common_tags,
      additional_tags,
      all_tags,
    }
  }
}
