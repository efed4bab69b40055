//! Place recommendation pipeline
//!
//! Turns a trip and user options into a ranked, deduplicated, category-balanced
//! list of places. The stages here are pure; the collaborator calls (text
//! generation, geocoding) and orchestration live in `planora-agent`.
//!
//! 1. **Prompt Builder** (`prompt`) - trip context + options → instruction text
//! 2. **Response Parser** (`parser`) - delimited reply → candidates
//! 3. **Filter/Score/Rank Engine** (`ranking`) - hard filters, composite score, ordering
//! 4. **Category Balancing** (`balance`) - slot allocation, dedup by name, backfill

pub mod balance;
pub mod options;
pub mod parser;
pub mod prompt;
pub mod ranking;

use serde::{Deserialize, Serialize};

pub use balance::{balance_categories, slot_allocation};
pub use options::{CategoryScope, PriceRange, RecommendationOptions, SortBy};
pub use parser::parse_response;
pub use prompt::{build_prompt, PromptContext, SYSTEM_INSTRUCTION};
pub use ranking::{
    apply_sort_mode, is_must_visit, rank_candidates, Exclusion, RankingEngine, RankingWeights,
};

use crate::domain::place::{Candidate, PlaceCategory};

/// Literal separator between entries in the collaborator's reply
pub const ENTRY_DELIMITER: &str = "---";

/// Places requested per category
pub const RECOMMENDATIONS_PER_CATEGORY: usize = 10;

pub const DEFAULT_MIN_RATING: f64 = 3.5;
pub const DEFAULT_MAX_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 50;

/// Rating floor for the top-rated-only option
pub const TOP_RATED_THRESHOLD: f64 = 4.5;

/// Name keywords that mark an attraction as a must-visit landmark
pub const MUST_VISIT_KEYWORDS: [&str; 14] = [
    "mahal",
    "palace",
    "fort",
    "temple",
    "mosque",
    "church",
    "cathedral",
    "monument",
    "memorial",
    "museum",
    "heritage",
    "historic",
    "tower",
    "gate",
];

/// Share of the output limit per category, in percent
pub const CATEGORY_SHARE_PERCENT: [(PlaceCategory, usize); 3] = [
    (PlaceCategory::Attraction, 35),
    (PlaceCategory::Restaurant, 35),
    (PlaceCategory::Accommodation, 30),
];

pub const DEFAULT_RANKING_WEIGHTS: RankingWeights = RankingWeights {
    rating_multiplier: 1.5,
    must_visit_bonus: 30.0,
    must_visit_distance_base: 25.0,
    must_visit_distance_decay: 0.4,
    distance_base: 20.0,
    distance_decay: 1.2,
    hidden_gem_bonus: 5.0,
    top_rated_bonus: 3.0,
    preference_cap: 10.0,
};

/// What the caller receives for one recommendation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub places: Vec<Candidate>,
    pub message: String,
}

impl RecommendationResponse {
    pub fn found(places: Vec<Candidate>, destination: &str) -> Self {
        let message = format!(
            "Found {} recommendation{} for {destination}",
            places.len(),
            if places.len() == 1 { "" } else { "s" }
        );
        Self { places, message }
    }

    pub fn empty(destination: &str) -> Self {
        Self {
            places: Vec::new(),
            message: format!(
                "No recommendations found for {destination}. Try widening the search radius, \
lowering the minimum rating, or relaxing the price range."
            ),
        }
    }
}
