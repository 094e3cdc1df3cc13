use cityguide::prelude::*;
use serde_json::json;
use std::time::{Duration, Instant};

fn hyde_park() -> Place {
  Place::new("london3", "Hyde Park", Category::Do).with_tags(["Outdoors", "Nature"])
}

fn british_museum() -> Place {
  Place::new("london2", "British Museum", Category::See)
    .with_tags(["History", "Art"])
    .must_visit(true)
}

fn names(results: &[PlaceMatch]) -> Vec<&str> {
  results.iter().map(|m| m.item.name.as_str()).collect()
}

#[test]
fn test_must_visit_only() {
  let places = vec![hyde_park(), british_museum()];
  let state = FilterState::new().add_filter(FilterPredicate::MustVisit);

  let results = PlaceSearchEngine::default().search(&places, &state);
  assert_eq!(names(&results), vec!["British Museum"]);
}

#[test]
fn test_category_and_tag_compose() {
  let places = vec![
    Place::new("a", "A", Category::Eat).with_tags(["rooftop"]),
    Place::new("b", "B", Category::See).with_tags(["rooftop"]),
    Place::new("c", "C", Category::Eat).with_tags(["hidden-gem"]),
  ];
  let state = FilterState::new()
    .add_filter(FilterPredicate::Category(Category::Eat))
    .add_filter(FilterPredicate::tag("rooftop").unwrap());

  let results = PlaceSearchEngine::default().search(&places, &state);
  assert_eq!(names(&results), vec!["A"]);
}

#[test]
fn test_name_hit_outranks_tag_hit() {
  let places = vec![
    Place::new("1", "Camden Lock", Category::Do).with_tags(["museum-district"]),
    Place::new("2", "British Museum", Category::See),
  ];
  let state = FilterState::new().set_search_term("museum");

  let results = PlaceSearchEngine::default().search(&places, &state);
  assert_eq!(names(&results), vec!["British Museum", "Camden Lock"]);
  assert!(results[0].score > results[1].score);
}

#[test]
fn test_no_match_is_empty() {
  let places = vec![hyde_park(), british_museum()];
  let state = FilterState::new().set_search_term("xyz123notfound");
  assert!(PlaceSearchEngine::default().search(&places, &state).is_empty());
}

#[test]
fn test_state_survives_the_url() {
  let state = FilterState::new()
    .set_search_term("cafe")
    .add_filter(FilterPredicate::Category(Category::Eat))
    .add_filter(FilterPredicate::MustVisit);

  let mut location = Location::parse("/london?ref=newsletter");
  write_state(&state, &mut location.query);
  let href = location.href();

  let reloaded = parse_state(&Location::parse(&href).query);
  assert_eq!(reloaded, state);
  assert_eq!(Location::parse(&href).query.get("ref"), Some("newsletter"));
}

#[test]
fn test_store_to_session() {
  let page = json!({
    "records": [
      {
        "id": "rec1",
        "fields": {
          "Name": "Hyde Park",
          "Category": "DO",
          "City": "London",
          "Tags": "Outdoors, Nature, Rooftop"
        }
      },
      {
        "id": "rec2",
        "fields": {
          "Name": "Sky Garden",
          "Category": "SEE",
          "City": "London",
          "Tags": ["Rooftop", "Views, Free"],
          "MustVisit": true
        }
      },
      {
        "id": "rec3",
        "fields": { "Name": "Louvre", "Category": "SEE", "City": "Paris" }
      }
    ]
  });
  let store = InMemoryStore::from_json_str(&page.to_string()).unwrap();
  let places = store.fetch_places(Some("london"));
  assert_eq!(places.len(), 2);

  let config = GuideConfig::default();
  let start = Instant::now();
  let mut session = SearchSession::mount(
    &config,
    MemoryNavigator::new("/london?tags=rooftop"),
    "/london?tags=rooftop",
    Some("london".to_string()),
    places,
  );

  assert_eq!(names(session.results()), vec!["Hyde Park", "Sky Garden"]);
  assert_eq!(session.tags().common_tags[0].id, "rooftop");
  assert_eq!(session.tags().common_tags.len(), 1);
  assert_eq!(session.tags().find("views").map(|t| t.count), Some(1));

  session.toggle_filter(FilterPredicate::Category(Category::See), start);
  session.tick(start + config.search.debounce());
  assert_eq!(names(session.results()), vec!["Sky Garden"]);
  assert_eq!(session.navigator().current(), "/london?tags=rooftop&category=SEE");

  session.toggle_filter(FilterPredicate::tag("rooftop").unwrap(), start + Duration::from_secs(1));
  session.flush(start + Duration::from_secs(1));
  assert_eq!(names(session.results()), vec!["Sky Garden"]);
  assert_eq!(session.navigator().current(), "/london?category=SEE");

  session.clear_filters(start + Duration::from_secs(2));
  session.flush(start + Duration::from_secs(2));
  assert_eq!(session.results().len(), 2);
  assert_eq!(session.navigator().current(), "/london");
}
