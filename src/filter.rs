//! Filter state and predicate evaluation.
//!
//! [`FilterState`] is what the visitor asked to see: a free-text term plus a
//! set of categorical predicates. Every operation returns a new state; the
//! predicate set is replaced rather than patched.
//!
//! Before a state is applied to places it is compiled into a [`FilterExpr`],
//! a small boolean AST: predicates of the same kind are OR-ed together and the
//! resulting groups are AND-ed.

use crate::tags::{tag_id, TagId};
use crate::types::{Category, Place};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of a predicate, used to group them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
  Category,
  Tag,
  MustVisit,
}

/// One active categorical filter condition.
///
/// `MustVisit` carries no value: when present it means "must-visit only",
/// and absence means the filter is off.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FilterPredicate {
  Category(Category),
  Tag(TagId),
  MustVisit,
}

impl FilterPredicate {
  /// Builds a tag predicate, normalizing `tag` to its id. Returns `None`
  /// for a tag with no id (see [`TagId::new`]).
  pub fn tag(tag: &str) -> Option<Self> {
    TagId::new(tag).map(FilterPredicate::Tag)
  }

  /// Builds a predicate from its kind and textual value.
  ///
  /// Returns `None` for values that cannot form a predicate: anything but
  /// the exact `EAT`, `SEE` or `DO` for a category, an empty tag, or a
  /// must-visit value other than `true`.
  pub fn parse(kind: FilterKind, value: &str) -> Option<Self> {
    match kind {
      FilterKind::Category => Category::from_wire(value).map(FilterPredicate::Category),
      FilterKind::Tag => FilterPredicate::tag(value),
      FilterKind::MustVisit => (value == "true").then_some(FilterPredicate::MustVisit),
    }
  }

  /// The kind of this predicate.
  pub fn kind(&self) -> FilterKind {
    match self {
      FilterPredicate::Category(_) => FilterKind::Category,
      FilterPredicate::Tag(_) => FilterKind::Tag,
      FilterPredicate::MustVisit => FilterKind::MustVisit,
    }
  }

  /// The textual value, as written to the URL.
  pub fn value(&self) -> &str {
    match self {
      FilterPredicate::Category(category) => category.as_str(),
      FilterPredicate::Tag(id) => id.as_str(),
      FilterPredicate::MustVisit => "true",
    }
  }

  /// Tests a single place against this predicate.
  pub fn matches(&self, place: &Place, tag_match: TagMatch) -> bool {
    match self {
      FilterPredicate::Category(category) => place.category == *category,
      FilterPredicate::MustVisit => place.must_visit,
      FilterPredicate::Tag(id) => match tag_match {
        TagMatch::Exact => place.tag_ids().any(|tag| tag == id.as_str()),
        TagMatch::Substring => place
          .tags
          .iter()
          .any(|tag| tag_id(tag).contains(id.as_str()) || tag.to_lowercase().contains(id.as_str())),
      },
    }
  }
}

/// How a tag predicate is compared against a place's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
  /// The predicate id must equal the id of one of the place's tags.
  #[default]
  Exact,
  /// The predicate id may occur anywhere inside a tag id or lowercased label.
  Substring,
}

/// A boolean filter expression over places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
  /// A single predicate.
  Match(FilterPredicate),
  /// True only if every sub-expression is true. Empty is true.
  And(Vec<FilterExpr>),
  /// True if at least one sub-expression is true. Empty is false.
  Or(Vec<FilterExpr>),
}

impl FilterExpr {
  /// Evaluates the expression against a place.
  pub fn evaluate(&self, place: &Place, tag_match: TagMatch) -> bool {
    match self {
      FilterExpr::Match(predicate) => predicate.matches(place, tag_match),
      FilterExpr::And(exprs) => exprs.iter().all(|e| e.evaluate(place, tag_match)),
      FilterExpr::Or(exprs) => exprs.iter().any(|e| e.evaluate(place, tag_match)),
    }
  }
}

/// The search term plus the set of active predicates.
///
/// A given predicate appears at most once. Equality ignores the order in
/// which predicates were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
  search_term: String,
  predicates: BTreeSet<FilterPredicate>,
}

impl FilterState {
  /// An empty state: no term, no predicates.
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a state from a term and any predicates.
  pub fn from_parts<I>(search_term: impl Into<String>, predicates: I) -> Self
  where
    I: IntoIterator<Item = FilterPredicate>,
  {
    Self {
      search_term: search_term.into(),
      predicates: predicates.into_iter().collect(),
    }
  }

  /// The raw, untrimmed search term.
  pub fn search_term(&self) -> &str {
    &self.search_term
  }

  /// Active predicates in canonical order.
  pub fn predicates(&self) -> impl Iterator<Item = &FilterPredicate> {
    self.predicates.iter()
  }

  /// Replaces the search term verbatim.
  #[must_use]
  pub fn set_search_term(self, term: impl Into<String>) -> Self {
    Self {
      search_term: term.into(),
      ..self
    }
  }

  /// Inserts a predicate. Adding one that is already active is a no-op.
  #[must_use]
  pub fn add_filter(self, predicate: FilterPredicate) -> Self {
    let mut predicates = self.predicates;
    predicates.insert(predicate);
    Self {
      search_term: self.search_term,
      predicates,
    }
  }

  /// Removes a predicate. Removing one that is not active is a no-op.
  #[must_use]
  pub fn remove_filter(self, predicate: &FilterPredicate) -> Self {
    let predicates = self
      .predicates
      .iter()
      .filter(|p| *p != predicate)
      .cloned()
      .collect();
    Self { predicates, ..self }
  }

  /// Removes the predicate if active, otherwise adds it.
  #[must_use]
  pub fn toggle_filter(self, predicate: FilterPredicate) -> Self {
    if self.is_active(&predicate) {
      self.remove_filter(&predicate)
    } else {
      self.add_filter(predicate)
    }
  }

  /// Drops every predicate and the search term together.
  #[must_use]
  pub fn clear_filters(self) -> Self {
    Self::default()
  }

  /// Returns `true` if the predicate is active.
  pub fn is_active(&self, predicate: &FilterPredicate) -> bool {
    self.predicates.contains(predicate)
  }

  /// Returns `true` if any predicate is active.
  pub fn has_active_filters(&self) -> bool {
    !self.predicates.is_empty()
  }

  /// Returns `true` if neither a predicate nor a non-blank term is set.
  pub fn is_empty(&self) -> bool {
    self.predicates.is_empty() && self.search_term.trim().is_empty()
  }

  /// Values of the active predicates of one kind, in canonical order.
  pub fn values(&self, kind: FilterKind) -> Vec<&str> {
    self
      .predicates
      .iter()
      .filter(|p| p.kind() == kind)
      .map(FilterPredicate::value)
      .collect()
  }

  /// Whether the must-visit predicate is active.
  pub fn must_visit(&self) -> bool {
    self.predicates.contains(&FilterPredicate::MustVisit)
  }

  /// Compiles the predicates into an expression: OR within a kind, AND
  /// across kinds. With no predicates the expression accepts everything.
  pub fn to_expr(&self) -> FilterExpr {
    let mut groups = Vec::new();
    for kind in [FilterKind::Category, FilterKind::Tag, FilterKind::MustVisit] {
      let group: Vec<FilterExpr> = self
        .predicates
        .iter()
        .filter(|p| p.kind() == kind)
        .cloned()
        .map(FilterExpr::Match)
        .collect();
      if !group.is_empty() {
        groups.push(FilterExpr::Or(group));
      }
    }
    FilterExpr::And(groups)
  }
}
