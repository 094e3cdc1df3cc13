//! The search session: the one owner of a page's filter state.
//!
//! A session ties the pieces together for a single page view. It holds the
//! places for the current city, the [`FilterState`], the URL binding, and the
//! cached results and tag buckets. Every filter control reads state from the
//! session and changes it only through the session's operations; there is no
//! other path to a mutable `FilterState`.
//!
//! Time is passed in explicitly. Keystrokes and recomputation are debounced,
//! and [`SearchSession::tick`] delivers whatever has become due.

use crate::aggregate::{TagAggregator, TagBuckets};
use crate::config::GuideConfig;
use crate::debounce::Debouncer;
use crate::engine::PlaceSearchEngine;
use crate::filter::{FilterPredicate, FilterState};
use crate::types::{Place, PlaceMatch};
use crate::url_sync::{Location, Navigator, UrlSync};
use std::time::Instant;
use tracing::{debug, info};

pub struct SearchSession<N: Navigator> {
  engine: PlaceSearchEngine,
  aggregator: TagAggregator,
  navigator: N,
  sync: UrlSync,
  state: FilterState,
  /// Text in the search box, ahead of `state` while a keystroke is pending.
  input: String,
  city: Option<String>,
  places: Vec<Place>,
  /// Bumped whenever `places` is replaced.
  generation: u64,
  tags: TagBuckets,
  results: Vec<PlaceMatch>,
  recomputations: u64,
  pending_input: Debouncer<String>,
  pending_recompute: Debouncer<u64>,
}

impl<N: Navigator> SearchSession<N> {
  /// Mounts a page: reads the filter state from `href` and computes the
  /// initial results and tag buckets for `places`.
  pub fn mount(
    config: &GuideConfig,
    navigator: N,
    href: &str,
    city: Option<String>,
    places: Vec<Place>,
  ) -> Self {
    let sync = UrlSync::new(Location::parse(href));
    let state = sync.load();
    let engine = PlaceSearchEngine::builder()
      .weights(config.scoring)
      .tag_match(config.search.tag_match)
      .build();
    let delay = config.search.debounce();

    let mut session = Self {
      engine,
      aggregator: TagAggregator::new(config.aggregator.clone()),
      navigator,
      sync,
      input: state.search_term().to_string(),
      state,
      city,
      places,
      generation: 0,
      tags: TagBuckets::default(),
      results: Vec::new(),
      recomputations: 0,
      pending_input: Debouncer::new(delay),
      pending_recompute: Debouncer::new(delay),
    };
    session.tags = session.aggregator.aggregate(&session.places);
    session.recompute_now();
    info!(city = ?session.city, places = session.places.len(), "search session mounted");
    session
  }

  pub fn state(&self) -> &FilterState {
    &self.state
  }

  /// Current contents of the search box.
  pub fn input(&self) -> &str {
    &self.input
  }

  /// Results for the latest applied state.
  pub fn results(&self) -> &[PlaceMatch] {
    &self.results
  }

  pub fn tags(&self) -> &TagBuckets {
    &self.tags
  }

  pub fn places(&self) -> &[Place] {
    &self.places
  }

  pub fn city(&self) -> Option<&str> {
    self.city.as_deref()
  }

  pub fn location(&self) -> &Location {
    self.sync.location()
  }

  pub fn navigator(&self) -> &N {
    &self.navigator
  }

  /// How many times results have been recomputed.
  pub fn recomputations(&self) -> u64 {
    self.recomputations
  }

  /// Returns `true` while a keystroke or recomputation is waiting.
  pub fn is_pending(&self) -> bool {
    self.pending_input.is_pending() || self.pending_recompute.is_pending()
  }

  /// Records a keystroke. The term is applied once typing pauses.
  pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
    self.input = text.into();
    self.pending_input.schedule(self.input.clone(), now);
  }

  /// Replaces the search term right away.
  pub fn set_search_term(&mut self, term: impl Into<String>, now: Instant) {
    let term = term.into();
    self.pending_input.cancel();
    self.input = term.clone();
    let next = self.state.clone().set_search_term(term);
    self.apply(next, now);
  }

  pub fn add_filter(&mut self, predicate: FilterPredicate, now: Instant) {
    let next = self.state.clone().add_filter(predicate);
    self.apply(next, now);
  }

  pub fn remove_filter(&mut self, predicate: &FilterPredicate, now: Instant) {
    let next = self.state.clone().remove_filter(predicate);
    self.apply(next, now);
  }

  pub fn toggle_filter(&mut self, predicate: FilterPredicate, now: Instant) {
    let next = self.state.clone().toggle_filter(predicate);
    self.apply(next, now);
  }

  /// Clears predicates, the search term and any pending keystroke.
  pub fn clear_filters(&mut self, now: Instant) {
    self.pending_input.cancel();
    self.input.clear();
    let next = self.state.clone().clear_filters();
    self.apply(next, now);
  }

  /// Delivers due work. Returns `true` if the results were recomputed.
  pub fn tick(&mut self, now: Instant) -> bool {
    if let Some(term) = self.pending_input.poll(now) {
      let next = self.state.clone().set_search_term(term);
      self.apply(next, now);
    }
    match self.pending_recompute.poll(now) {
      Some(generation) if generation == self.generation => {
        self.recompute_now();
        true
      }
      Some(generation) => {
        debug!(generation, current = self.generation, "dropping stale recomputation");
        false
      }
      None => false,
    }
  }

  /// Applies any pending keystroke and recomputes immediately.
  pub fn flush(&mut self, now: Instant) {
    if let Some(term) = self.pending_input.flush() {
      let next = self.state.clone().set_search_term(term);
      self.apply(next, now);
    }
    if self.pending_recompute.flush().is_some() {
      self.recompute_now();
    }
  }

  /// Switches to another city's places. Pending work for the old places is
  /// discarded and results are recomputed at once.
  pub fn change_city(&mut self, city: Option<String>, places: Vec<Place>) {
    if self.pending_recompute.cancel() {
      debug!(city = ?self.city, "cancelled recomputation for previous city");
    }
    self.generation += 1;
    self.city = city;
    self.places = places;
    self.tags = self.aggregator.aggregate(&self.places);
    self.recompute_now();
    info!(city = ?self.city, places = self.places.len(), "city changed");
  }

  /// Handles a back/forward navigation. URLs this session wrote itself are
  /// ignored. Returns `true` if the state was reloaded.
  pub fn on_navigation(&mut self, href: &str) -> bool {
    let Some(state) = self.sync.observe(href) else {
      return false;
    };
    self.pending_input.cancel();
    self.input = state.search_term().to_string();
    self.state = state;
    self.recompute_now();
    true
  }

  /// Tears the session down, dropping pending work.
  pub fn leave(&mut self) {
    self.pending_input.cancel();
    self.pending_recompute.cancel();
    debug!(city = ?self.city, "search session left");
  }

  /// Installs a new state, mirrors it into the URL and schedules a
  /// recomputation. Unchanged states are ignored.
  fn apply(&mut self, next: FilterState, now: Instant) {
    if next == self.state {
      return;
    }
    self.state = next;
    self.sync.write(&self.state, &mut self.navigator);
    self.pending_recompute.schedule(self.generation, now);
  }

  fn recompute_now(&mut self) {
    self.pending_recompute.cancel();
    self.results = self.engine.search(&self.places, &self.state);
    self.recomputations += 1;
  }
}
