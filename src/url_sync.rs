//! Keeps the filter state and the page URL in step.
//!
//! The URL query string is the shareable encoding of a [`FilterState`]:
//!
//! | param       | value                               |
//! |-------------|-------------------------------------|
//! | `q`         | free text                           |
//! | `category`  | comma-separated `EAT`, `SEE`, `DO`  |
//! | `tags`      | comma-separated tag ids             |
//! | `mustVisit` | literal `true`                      |
//!
//! Mapping happens in one direction per event. [`UrlSync::load`] parses the
//! URL into a state when a page is mounted or the visitor navigates;
//! [`UrlSync::write`] serializes the state back after every change and
//! replaces the current history entry. A URL the synchronizer wrote itself is
//! never parsed back in as a navigation.

use crate::filter::{FilterKind, FilterPredicate, FilterState};
use crate::query_string::QueryParams;
use tracing::debug;

/// Query parameter holding the search term.
pub const PARAM_QUERY: &str = "q";
/// Query parameter holding category predicates.
pub const PARAM_CATEGORY: &str = "category";
/// Query parameter holding tag predicates.
pub const PARAM_TAGS: &str = "tags";
/// Query parameter holding the must-visit predicate.
pub const PARAM_MUST_VISIT: &str = "mustVisit";

/// A navigable URL split into path, query and fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
  pub path: String,
  pub query: QueryParams,
  pub fragment: Option<String>,
}

impl Location {
  /// Splits an href such as `/london?q=tea#eat`.
  pub fn parse(href: &str) -> Self {
    let (rest, fragment) = match href.split_once('#') {
      Some((rest, fragment)) => (rest, Some(fragment.to_string())),
      None => (href, None),
    };
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    Self {
      path: path.to_string(),
      query: QueryParams::parse(query),
      fragment,
    }
  }

  /// Reassembles the href. The `?` is omitted when there are no parameters.
  pub fn href(&self) -> String {
    let mut href = self.path.clone();
    if !self.query.is_empty() {
      href.push('?');
      href.push_str(&self.query.to_string());
    }
    if let Some(fragment) = &self.fragment {
      href.push('#');
      href.push_str(fragment);
    }
    href
  }
}

/// Parses the recognized parameters into a filter state.
///
/// Values that cannot form a predicate are dropped without error. Other
/// parameters are ignored here and left in place by [`write_state`].
pub fn parse_state(params: &QueryParams) -> FilterState {
  let search_term = params.get(PARAM_QUERY).unwrap_or_default();
  let mut predicates = Vec::new();

  for (param, kind) in [(PARAM_CATEGORY, FilterKind::Category), (PARAM_TAGS, FilterKind::Tag)] {
    let Some(list) = params.get(param) else {
      continue;
    };
    for value in list.split(',') {
      match FilterPredicate::parse(kind, value) {
        Some(predicate) => predicates.push(predicate),
        None => debug!(param, value, "ignoring unrecognized filter value"),
      }
    }
  }

  match params.get(PARAM_MUST_VISIT) {
    Some("true") => predicates.push(FilterPredicate::MustVisit),
    Some(other) => debug!(value = other, "ignoring non-boolean mustVisit value"),
    None => {}
  }

  FilterState::from_parts(search_term, predicates)
}

/// Rewrites the recognized parameters of `params` from `state`.
///
/// Empty groups delete their parameter; unrelated parameters are untouched.
pub fn write_state(state: &FilterState, params: &mut QueryParams) {
  if state.search_term().is_empty() {
    params.delete(PARAM_QUERY);
  } else {
    params.set(PARAM_QUERY, state.search_term());
  }

  for (param, kind) in [(PARAM_CATEGORY, FilterKind::Category), (PARAM_TAGS, FilterKind::Tag)] {
    let values = state.values(kind);
    if values.is_empty() {
      params.delete(param);
    } else {
      params.set(param, values.join(","));
    }
  }

  if state.must_visit() {
    params.set(PARAM_MUST_VISIT, "true");
  } else {
    params.delete(PARAM_MUST_VISIT);
  }
}

/// The browser history, as far as the synchronizer needs it.
pub trait Navigator {
  /// Replaces the current history entry without adding a new one.
  fn replace(&mut self, href: &str);
}

/// An in-memory history stack.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
  entries: Vec<String>,
  index: usize,
}

impl MemoryNavigator {
  /// Creates a history with a single entry.
  pub fn new(href: impl Into<String>) -> Self {
    Self {
      entries: vec![href.into()],
      index: 0,
    }
  }

  /// The current entry.
  pub fn current(&self) -> &str {
    &self.entries[self.index]
  }

  /// Navigates to a new entry, discarding any forward entries.
  pub fn push(&mut self, href: impl Into<String>) {
    self.entries.truncate(self.index + 1);
    self.entries.push(href.into());
    self.index = self.entries.len() - 1;
  }

  /// Moves back one entry, returning the new current href.
  pub fn back(&mut self) -> Option<&str> {
    if self.index == 0 {
      return None;
    }
    self.index -= 1;
    Some(self.current())
  }

  /// Moves forward one entry, returning the new current href.
  pub fn forward(&mut self) -> Option<&str> {
    if self.index + 1 >= self.entries.len() {
      return None;
    }
    self.index += 1;
    Some(self.current())
  }

  /// Number of entries in the history.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl Navigator for MemoryNavigator {
  fn replace(&mut self, href: &str) {
    self.entries[self.index] = href.to_string();
  }
}

/// Two-way binding between a [`FilterState`] and a [`Location`].
#[derive(Debug, Clone)]
pub struct UrlSync {
  location: Location,
  last_written: Option<String>,
}

impl UrlSync {
  /// Binds to the URL the page was loaded with.
  pub fn new(location: Location) -> Self {
    Self {
      location,
      last_written: None,
    }
  }

  /// The URL as last read or written.
  pub fn location(&self) -> &Location {
    &self.location
  }

  /// Load direction: the state encoded in the current URL.
  pub fn load(&self) -> FilterState {
    parse_state(&self.location.query)
  }

  /// Write direction: encodes `state` into the URL and replaces the current
  /// history entry. Returns `false` if the URL was already up to date.
  pub fn write<N: Navigator + ?Sized>(&mut self, state: &FilterState, navigator: &mut N) -> bool {
    let before = self.location.href();
    write_state(state, &mut self.location.query);
    let href = self.location.href();
    if href == before && self.last_written.is_some() {
      return false;
    }
    navigator.replace(&href);
    self.last_written = Some(href);
    true
  }

  /// Handles a navigation event such as back/forward.
  ///
  /// Returns the state to adopt, or `None` if `href` is the URL this
  /// synchronizer just wrote and must not be read back.
  pub fn observe(&mut self, href: &str) -> Option<FilterState> {
    if self.last_written.as_deref() == Some(href) {
      return None;
    }
    debug!(href, "loading filter state from navigation");
    self.location = Location::parse(href);
    self.last_written = None;
    Some(self.load())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Category;

  #[test]
  fn test_location_roundtrip() {
    let location = Location::parse("/london?q=tea&x=1#eat");
    assert_eq!(location.path, "/london");
    assert_eq!(location.query.get("x"), Some("1"));
    assert_eq!(location.fragment.as_deref(), Some("eat"));
    assert_eq!(location.href(), "/london?q=tea&x=1#eat");
    assert_eq!(Location::parse("/paris").href(), "/paris");
  }

  #[test]
  fn test_parse_all_params() {
    let params = QueryParams::parse("q=cafe&category=EAT,DO&tags=rooftop,hidden-gem&mustVisit=true");
    let state = parse_state(&params);

    assert_eq!(state.search_term(), "cafe");
    assert!(state.is_active(&FilterPredicate::Category(Category::Eat)));
    assert!(state.is_active(&FilterPredicate::Category(Category::Do)));
    assert!(state.is_active(&FilterPredicate::tag("rooftop").unwrap()));
    assert!(state.is_active(&FilterPredicate::tag("hidden-gem").unwrap()));
    assert!(state.must_visit());
  }

  #[test]
  fn test_parse_drops_malformed_values() {
    let params = QueryParams::parse("category=EAT,BAR,&tags=,&mustVisit=1");
    let state = parse_state(&params);

    assert_eq!(state.predicates().count(), 1);
    assert!(state.is_active(&FilterPredicate::Category(Category::Eat)));
    assert!(!state.must_visit());
  }

  #[test]
  fn test_category_values_are_exact() {
    let state = parse_state(&QueryParams::parse("category=eat,SEE,%20DO"));
    assert_eq!(state.values(FilterKind::Category), vec!["SEE"]);
  }

  #[test]
  fn test_every_tag_predicate_round_trips() {
    let raw = ["Hidden Gem", "rooftop", "  Family \t Friendly ", "café terrace", "50% off", "a+b"];
    for tag in raw {
      let state = FilterState::new().add_filter(FilterPredicate::tag(tag).unwrap());
      let mut params = QueryParams::new();
      write_state(&state, &mut params);
      assert_eq!(parse_state(&QueryParams::parse(&params.to_string())), state, "{tag}");
    }

    let all = raw
      .iter()
      .filter_map(|tag| FilterPredicate::tag(tag))
      .fold(FilterState::new(), FilterState::add_filter);
    let mut params = QueryParams::new();
    write_state(&all, &mut params);
    assert_eq!(parse_state(&QueryParams::parse(&params.to_string())), all);
  }

  #[test]
  fn test_absent_params_give_empty_state() {
    let state = parse_state(&QueryParams::parse("utm_source=mail"));
    assert_eq!(state, FilterState::new());
  }

  #[test]
  fn test_write_preserves_unknown_params() {
    let mut params = QueryParams::parse("utm_source=mail&q=old&mustVisit=true");
    let state = FilterState::new()
      .add_filter(FilterPredicate::Category(Category::See))
      .add_filter(FilterPredicate::tag("art").unwrap());

    write_state(&state, &mut params);
    assert_eq!(params.to_string(), "utm_source=mail&category=SEE&tags=art");
  }

  #[test]
  fn test_round_trip() {
    let state = FilterState::new()
      .set_search_term("cafe")
      .add_filter(FilterPredicate::Category(Category::Eat))
      .add_filter(FilterPredicate::MustVisit);

    let mut params = QueryParams::new();
    write_state(&state, &mut params);
    let reparsed = parse_state(&QueryParams::parse(&params.to_string()));
    assert_eq!(reparsed, state);
  }

  #[test]
  fn test_write_replaces_history_entry() {
    let mut navigator = MemoryNavigator::new("/london");
    let mut sync = UrlSync::new(Location::parse("/london"));

    let state = FilterState::new().set_search_term("m");
    assert!(sync.write(&state, &mut navigator));
    let state = state.set_search_term("museum");
    assert!(sync.write(&state, &mut navigator));

    assert_eq!(navigator.len(), 1);
    assert_eq!(navigator.current(), "/london?q=museum");
    assert!(!sync.write(&state, &mut navigator));
  }

  #[test]
  fn test_own_write_is_not_reloaded() {
    let mut navigator = MemoryNavigator::new("/london");
    let mut sync = UrlSync::new(Location::parse("/london"));
    let state = FilterState::new().add_filter(FilterPredicate::MustVisit);
    sync.write(&state, &mut navigator);

    assert_eq!(sync.observe("/london?mustVisit=true"), None);
    let external = sync.observe("/london?category=DO").unwrap();
    assert!(external.is_active(&FilterPredicate::Category(Category::Do)));
    assert!(!external.must_visit());
  }
}
