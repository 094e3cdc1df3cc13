//! The `Scorer` trait and the default relevance scorer.

use crate::rules::ScoreWeights;
use crate::types::{Place, PlaceMatch, ScoredField, SearchDetail};

/// A normalized free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
  /// The lowercased, trimmed term.
  pub full: String,
  /// Distinct whitespace-separated pieces of `full`, in order.
  pub parts: Vec<String>,
}

impl SearchTerms {
  /// Normalizes a raw term. Returns `None` if it is blank.
  pub fn parse(raw: &str) -> Option<Self> {
    let full = raw.trim().to_lowercase();
    if full.is_empty() {
      return None;
    }
    let mut parts: Vec<String> = Vec::new();
    for part in full.split_whitespace() {
      if !parts.iter().any(|p| p == part) {
        parts.push(part.to_string());
      }
    }
    Some(Self { full, parts })
  }

  fn parts_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a String> + 'a {
    self.parts.iter().filter(move |part| text.contains(part.as_str()))
  }
}

/// `weight * count`, pinned at `u32::MAX`. Weights come from user config.
fn saturating_times(weight: u32, count: usize) -> u32 {
  weight.saturating_mul(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Scores a place against a text search.
///
/// Implementations return `None` when the place does not match at all, so
/// the engine never sees a zero-score match for an active search.
pub trait Scorer {
  fn match_place(&self, place: &Place, index: usize, terms: &SearchTerms) -> Option<PlaceMatch>;
}

/// Additive substring scorer over name, description, tags and address.
///
/// Matching is case-insensitive substring containment; there is no fuzzy or
/// typo-tolerant matching.
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
  weights: ScoreWeights,
}

impl RelevanceScorer {
  pub fn new(weights: ScoreWeights) -> Self {
    Self { weights }
  }

  pub fn weights(&self) -> &ScoreWeights {
    &self.weights
  }

  /// Scores one text field: whole-term containment plus one award per
  /// contained sub-term.
  fn score_text(
    &self,
    m: &mut PlaceMatch,
    field: ScoredField,
    text: &str,
    terms: &SearchTerms,
    contains: u32,
    subterm: u32,
  ) {
    let text = text.to_lowercase();
    let full_term = text.contains(terms.full.as_str());
    let matched_terms: Vec<String> = terms.parts_in(&text).cloned().collect();

    let mut score: u32 = 0;
    if full_term {
      score = score.saturating_add(contains);
      if field == ScoredField::Name && text == terms.full {
        score = score.saturating_add(self.weights.name_exact);
      }
    }
    score = score.saturating_add(saturating_times(subterm, matched_terms.len()));

    if full_term || !matched_terms.is_empty() {
      m.add_field_score(field, score);
      m.details.push(SearchDetail::Text {
        field,
        full_term,
        matched_terms,
      });
    }
  }
}

impl Scorer for RelevanceScorer {
  fn match_place(&self, place: &Place, index: usize, terms: &SearchTerms) -> Option<PlaceMatch> {
    let w = &self.weights;
    let mut m = PlaceMatch::new(place.clone(), 0, index);

    self.score_text(&mut m, ScoredField::Name, &place.name, terms, w.name_contains, w.name_subterm);
    self.score_text(
      &mut m,
      ScoredField::Description,
      &place.description,
      terms,
      w.description_contains,
      w.description_subterm,
    );

    let matched_tags: Vec<String> = place
      .tags
      .iter()
      .filter(|tag| {
        let tag = tag.to_lowercase();
        tag.contains(terms.full.as_str()) || terms.parts_in(&tag).next().is_some()
      })
      .cloned()
      .collect();
    if !matched_tags.is_empty() {
      m.add_field_score(ScoredField::Tags, saturating_times(w.tag, matched_tags.len()));
      m = m.with_detail(SearchDetail::Tag {
        matched_tags,
        total_tags: place.tags.len(),
      });
    }

    if place.address.to_lowercase().contains(terms.full.as_str()) {
      m.add_field_score(ScoredField::Address, w.address);
      m = m.with_detail(SearchDetail::Text {
        field: ScoredField::Address,
        full_term: true,
        matched_terms: Vec::new(),
      });
    }

    (m.score > 0).then_some(m)
  }
}
