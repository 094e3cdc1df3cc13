use cityguide::prelude::*;

/// Scores places only by how close their rating is to five stars.
struct RatingScorer;

impl Scorer for RatingScorer {
  fn match_place(&self, place: &Place, index: usize, terms: &SearchTerms) -> Option<PlaceMatch> {
    if !place.name.to_lowercase().contains(terms.full.as_str()) {
      return None;
    }
    let score = (place.rating.unwrap_or(0.0) * 10.0) as u32;
    (score > 0).then(|| PlaceMatch::new(place.clone(), score, index))
  }
}

fn rated(id: &str, name: &str, rating: Option<f64>) -> Place {
  let mut place = Place::new(id, name, Category::Eat);
  place.rating = rating;
  place
}

#[test]
fn test_custom_scorer() {
  let places = vec![
    rated("1", "Pizza Pilgrims", Some(4.1)),
    rated("2", "Franco Manca Pizza", Some(4.6)),
    rated("3", "Pizza Express", None),
    rated("4", "Dishoom", Some(4.9)),
  ];

  let engine = PlaceSearchEngine::builder()
    .scorer(Box::new(RatingScorer))
    .build();

  let state = FilterState::new().set_search_term("pizza");
  let results = engine.search(&places, &state);

  assert_eq!(results.len(), 2);
  assert_eq!(results[0].item.name, "Franco Manca Pizza");
  assert_eq!(results[1].item.name, "Pizza Pilgrims");
}

#[test]
fn test_custom_scorer_still_filters_first() {
  let mut places = vec![
    rated("1", "Pizza Pilgrims", Some(4.1)),
    rated("2", "Pizza Museum", Some(4.8)),
  ];
  places[1].category = Category::See;

  let engine = PlaceSearchEngine::builder()
    .scorer(Box::new(RatingScorer))
    .build();

  let state = FilterState::new()
    .set_search_term("pizza")
    .add_filter(FilterPredicate::Category(Category::Eat));
  let results = engine.search(&places, &state);

  assert_eq!(results.len(), 1);
  assert_eq!(results[0].item.name, "Pizza Pilgrims");
}
