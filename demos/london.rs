//! Walks through a search session for the London guide.
//!
//! Run with `RUST_LOG=cityguide=debug` to see the engine's logging.

use cityguide::prelude::*;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Sample places for the demo.
pub fn london_places() -> Vec<Place> {
  vec![
    Place::new("london1", "The Ivy", Category::Eat)
      .with_description("Classic British dining in the heart of the West End.")
      .with_address("1-5 West Street, London WC2H 9NQ")
      .with_tags(["Fine Dining", "Classic", "British"])
      .must_visit(true),
    Place::new("london2", "British Museum", Category::See)
      .with_description("A museum of human history, art and culture.")
      .with_address("Great Russell St, London WC1B 3DG")
      .with_tags(["History", "Art", "Culture", "Free"])
      .must_visit(true),
    Place::new("london3", "Hyde Park", Category::Do)
      .with_description("One of the largest parks in London.")
      .with_tags(["Outdoors", "Nature", "Walking", "Free"]),
    Place::new("london4", "Sky Garden", Category::See)
      .with_description("Public garden at the top of the Walkie Talkie.")
      .with_tags(["Rooftop", "Views", "Free"]),
    Place::new("london5", "Borough Market", Category::Eat)
      .with_description("Food market with street food and fresh produce.")
      .with_tags(["Market", "Street Food", "Hidden Gem"]),
  ]
  .into_iter()
  .map(|place| place.with_city("london"))
  .collect()
}

fn print_results<N: Navigator>(session: &SearchSession<N>) {
  let sections = CategorySections::from_results(session.results().to_vec());
  for (category, matches) in sections.non_empty() {
    println!("  [{category}]");
    for result in matches {
      let (preview, remaining) = result.item.preview_tags(3);
      let more = if remaining > 0 {
        format!(" +{remaining}")
      } else {
        String::new()
      };
      println!(
        "    {} (score: {}) {}{}",
        result.item.name,
        result.score,
        preview.join(", "),
        more
      );
      for detail in &result.details {
        match detail {
          SearchDetail::Text {
            field,
            full_term,
            matched_terms,
          } => {
            println!(
              "      - {field:?}: full={full_term} terms={}",
              matched_terms.join(", ")
            );
          }
          SearchDetail::Tag { matched_tags, .. } => {
            println!("      - tags: {}", matched_tags.join(", "));
          }
        }
      }
    }
  }
  println!();
}

fn main() -> Result<(), GuideError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = GuideConfig::resolve(None)?;
  let city = config.cities.resolve("london")?.to_string();
  let store = InMemoryStore::new(london_places());

  println!("=== {} ===\n", display_name(&city));

  let start = Instant::now();
  let mut session = SearchSession::mount(
    &config,
    MemoryNavigator::new("/london"),
    "/london",
    Some(city.clone()),
    store.fetch_places(Some(city.as_str())),
  );

  let tags = session.tags();
  let common: Vec<&str> = tags.common_tags.iter().map(|t| t.label.as_str()).collect();
  println!("Common tags: {}", common.join(", "));
  println!("More tags: {}\n", tags.additional_tags.len());

  println!("Everything:");
  print_results(&session);

  println!("Typing \"museum\":");
  session.type_search("museum", start);
  let mut now = start;
  while session.is_pending() {
    now += Duration::from_millis(100);
    session.tick(now);
  }
  println!("  url: {}", session.navigator().current());
  print_results(&session);

  println!("Clearing, then must-visit only:");
  session.clear_filters(now);
  session.toggle_filter(FilterPredicate::MustVisit, now);
  session.flush(now);
  println!("  url: {}", session.navigator().current());
  print_results(&session);

  println!("Free places via the tag filter:");
  session.clear_filters(now);
  if let Some(free) = FilterPredicate::tag("Free") {
    session.add_filter(free, now);
  }
  session.flush(now);
  println!("  url: {}", session.navigator().current());
  print_results(&session);

  println!("Recomputed {} times", session.recomputations());
  session.leave();
  Ok(())
}
