//! Hard filters, composite scoring and ordering of geocoded candidates

use std::cmp::Ordering;

use super::options::{RecommendationOptions, SortBy};
use super::{DEFAULT_RANKING_WEIGHTS, MUST_VISIT_KEYWORDS, TOP_RATED_THRESHOLD};
use crate::domain::place::{Candidate, PlaceCategory, MUST_VISIT_BADGE};
use crate::domain::trip::TripContext;

/// Weights for the composite recommendation score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    /// Multiplier applied to the raw rating (default: 1.5)
    pub rating_multiplier: f64,
    /// Flat bonus for must-visit landmarks (default: 30)
    pub must_visit_bonus: f64,
    /// Distance term for must-visit landmarks: `max(0, base - d * decay)`
    pub must_visit_distance_base: f64,
    pub must_visit_distance_decay: f64,
    /// Distance term for regular places: `max(0, base - d * decay)`
    pub distance_base: f64,
    pub distance_decay: f64,
    /// Bonus for flagged hidden gems when requested (default: 5)
    pub hidden_gem_bonus: f64,
    /// Bonus for 4.5+ places when top-rated-only is on (default: 3)
    pub top_rated_bonus: f64,
    /// Cap on the user-preference term `weight / 2` (default: 10)
    pub preference_cap: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        DEFAULT_RANKING_WEIGHTS
    }
}

/// Why a candidate failed the hard filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    BelowMinRating,
    NotTopRated,
    OutsidePriceRange,
    OutsideRadius,
}

/// Landmark attractions matched by name keyword.
pub fn is_must_visit(candidate: &Candidate) -> bool {
    if candidate.category != PlaceCategory::Attraction {
        return false;
    }
    let name = candidate.name.to_lowercase();
    MUST_VISIT_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    weights: RankingWeights,
}

impl RankingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// First failing hard filter, if any. Only the radius filter has a must-visit exemption.
    pub fn exclusion(
        &self,
        candidate: &Candidate,
        options: &RecommendationOptions,
        must_visit: bool,
    ) -> Option<Exclusion> {
        if candidate.rating < options.min_rating {
            return Some(Exclusion::BelowMinRating);
        }

        if options.top_rated_only && candidate.rating < TOP_RATED_THRESHOLD {
            return Some(Exclusion::NotTopRated);
        }

        if let Some(range) = options.active_price_range() {
            if !range.contains(candidate.price_level) {
                return Some(Exclusion::OutsidePriceRange);
            }
        }

        if !must_visit {
            if let Some(distance) = candidate.distance_from_center {
                if distance > options.max_radius {
                    return Some(Exclusion::OutsideRadius);
                }
            }
        }

        None
    }

    /// Composite score, unrounded. Unknown distance contributes no distance term.
    pub fn score(
        &self,
        candidate: &Candidate,
        options: &RecommendationOptions,
        trip: &TripContext,
        must_visit: bool,
    ) -> f64 {
        let weights = &self.weights;
        let mut score = candidate.rating * weights.rating_multiplier;

        if must_visit {
            score += weights.must_visit_bonus;
            if let Some(distance) = candidate.distance_from_center {
                score += (weights.must_visit_distance_base
                    - distance * weights.must_visit_distance_decay)
                    .max(0.0);
            }
        } else if let Some(distance) = candidate.distance_from_center {
            score += (weights.distance_base - distance * weights.distance_decay).max(0.0);
        }

        if options.show_hidden_gems && candidate.is_hidden_gem == Some(true) {
            score += weights.hidden_gem_bonus;
        }

        if options.top_rated_only && candidate.rating >= TOP_RATED_THRESHOLD {
            score += weights.top_rated_bonus;
        }

        if let Some(weight) = trip.preference_weight(candidate.category) {
            score += (weight / 2.0).min(weights.preference_cap);
        }

        score
    }

    /// Filter, score and order candidates. `bestMatch` keeps must-visit places
    /// ahead of regular ones; `rating` and `distance` re-sort the merged list.
    pub fn rank(
        &self,
        candidates: Vec<Candidate>,
        options: &RecommendationOptions,
        trip: &TripContext,
    ) -> Vec<Candidate> {
        let mut must_visit = Vec::new();
        let mut regular = Vec::new();

        for mut candidate in candidates {
            let landmark = is_must_visit(&candidate);
            if self.exclusion(&candidate, options, landmark).is_some() {
                continue;
            }

            let score = self.score(&candidate, options, trip, landmark);
            candidate.recommendation_score = Some(round_to_tenth(score));
            if landmark {
                candidate.badges = vec![MUST_VISIT_BADGE.to_string()];
                must_visit.push(candidate);
            } else {
                regular.push(candidate);
            }
        }

        sort_by_score(&mut must_visit);
        sort_by_score(&mut regular);
        must_visit.extend(regular);

        apply_sort_mode(&mut must_visit, options.sort_by);
        must_visit
    }
}

/// Rank with default weights.
pub fn rank_candidates(
    candidates: Vec<Candidate>,
    options: &RecommendationOptions,
    trip: &TripContext,
) -> Vec<Candidate> {
    RankingEngine::new().rank(candidates, options, trip)
}

/// Re-sort a merged list for the `rating` and `distance` modes; `bestMatch` leaves it as is.
pub fn apply_sort_mode(candidates: &mut [Candidate], sort_by: SortBy) {
    match sort_by {
        SortBy::BestMatch => {}
        SortBy::Rating => {
            candidates.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        }
        SortBy::Distance => {
            candidates.sort_by(|a, b| {
                let left = a.distance_from_center.unwrap_or(f64::INFINITY);
                let right = b.distance_from_center.unwrap_or(f64::INFINITY);
                left.partial_cmp(&right).unwrap_or(Ordering::Equal)
            });
        }
    }
}

fn sort_by_score(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        let left = a.recommendation_score.unwrap_or(0.0);
        let right = b.recommendation_score.unwrap_or(0.0);
        right.partial_cmp(&left).unwrap_or(Ordering::Equal)
    });
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
