//! The search engine that applies a filter state to a list of places.

use crate::filter::{FilterState, TagMatch};
use crate::rules::ScoreWeights;
use crate::scorer::{RelevanceScorer, Scorer, SearchTerms};
use crate::types::{Place, PlaceMatch};
use tracing::debug;

/// Filters and ranks places for a [`FilterState`].
///
/// A search runs in two steps:
///
/// 1.  **Categorical filtering**: the state's predicates are compiled into an
///     expression (OR within a kind, AND across kinds) and every place that
///     fails it is dropped. With no predicates nothing is dropped.
/// 2.  **Text scoring**: if the trimmed search term is non-empty, each
///     surviving place is scored by the configured [`Scorer`]. Places scoring
///     0 are dropped and the rest are sorted by descending score. The sort is
///     stable, so ties keep their input order.
///
/// Without a search term the filtered places are returned in input order with
/// a score of 0.
///
/// The engine is pure: the output depends only on the places and the state
/// passed in.
///
/// # Examples
///
/// ```rust
/// use cityguide::prelude::*;
///
/// let places = vec![
///     Place::new("1", "Hyde Park", Category::Do).with_tags(["Outdoors", "Nature"]),
///     Place::new("2", "British Museum", Category::See)
///         .with_tags(["History", "Art"])
///         .must_visit(true),
/// ];
///
/// let engine = PlaceSearchEngine::builder().build();
/// let state = FilterState::new().add_filter(FilterPredicate::MustVisit);
///
/// let results = engine.search(&places, &state);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].item.name, "British Museum");
/// ```
pub struct PlaceSearchEngine {
  scorer: Box<dyn Scorer>,
  tag_match: TagMatch,
}

impl Default for PlaceSearchEngine {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl PlaceSearchEngine {
  /// Creates a new `PlaceSearchEngineBuilder` to construct an engine.
  pub fn builder() -> PlaceSearchEngineBuilder {
    PlaceSearchEngineBuilder::new()
  }

  /// How tag predicates are matched.
  pub fn tag_match(&self) -> TagMatch {
    self.tag_match
  }

  /// Step 1 only: the places passing the state's predicates, with their
  /// input positions.
  pub fn filter<'a>(&self, places: &'a [Place], state: &FilterState) -> Vec<(usize, &'a Place)> {
    let expr = state.to_expr();
    places
      .iter()
      .enumerate()
      .filter(|(_, place)| expr.evaluate(place, self.tag_match))
      .collect()
  }

  /// Runs both steps and returns the ordered matches.
  pub fn search(&self, places: &[Place], state: &FilterState) -> Vec<PlaceMatch> {
    let candidates = self.filter(places, state);

    let results: Vec<PlaceMatch> = match SearchTerms::parse(state.search_term()) {
      None => candidates
        .into_iter()
        .map(|(index, place)| PlaceMatch::new(place.clone(), 0, index))
        .collect(),
      Some(terms) => {
        let mut scored: Vec<PlaceMatch> = candidates
          .into_iter()
          .filter_map(|(index, place)| self.scorer.match_place(place, index, &terms))
          .filter(|m| m.score > 0)
          .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
      }
    };

    debug!(
      places = places.len(),
      results = results.len(),
      term = state.search_term(),
      "search complete"
    );
    results
  }
}

/// A builder for creating `PlaceSearchEngine` instances.
///
/// # Examples
///
/// ```
/// use cityguide::prelude::*;
///
/// let engine = PlaceSearchEngine::builder()
///     .weights(ScoreWeights::new().address(4))
///     .tag_match(TagMatch::Substring)
///     .build();
/// assert_eq!(engine.tag_match(), TagMatch::Substring);
/// ```
#[derive(Default)]
pub struct PlaceSearchEngineBuilder {
  scorer: Option<Box<dyn Scorer>>,
  tag_match: TagMatch,
}

impl PlaceSearchEngineBuilder {
  /// Creates a builder with the default scorer and exact tag matching.
  pub fn new() -> Self {
    Self::default()
  }

  /// Uses a [`RelevanceScorer`] with the given weights.
  pub fn weights(mut self, weights: ScoreWeights) -> Self {
    self.scorer = Some(Box::new(RelevanceScorer::new(weights)));
    self
  }

  /// Replaces the scorer entirely.
  pub fn scorer(mut self, scorer: Box<dyn Scorer>) -> Self {
    self.scorer = Some(scorer);
    self
  }

  /// Sets how tag predicates are matched.
  pub fn tag_match(mut self, tag_match: TagMatch) -> Self {
    self.tag_match = tag_match;
    self
  }

  /// Builds the `PlaceSearchEngine`.
  pub fn build(self) -> PlaceSearchEngine {
    PlaceSearchEngine {
      scorer: self
        .scorer
        .unwrap_or_else(|| Box::new(RelevanceScorer::default())),
      tag_match: self.tag_match,
    }
  }
}
