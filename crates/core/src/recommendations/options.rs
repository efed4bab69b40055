//! User-tunable options for one recommendation request

use serde::{Deserialize, Serialize};

use super::{DEFAULT_LIMIT, DEFAULT_MAX_RADIUS_KM, DEFAULT_MIN_RATING, MAX_LIMIT};
use crate::domain::place::PlaceCategory;
use crate::errors::DomainError;

/// Final ordering key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Must-visit group first, then by recommendation score
    #[default]
    #[serde(alias = "score")]
    BestMatch,
    /// Raw rating, descending
    Rating,
    /// Distance from center, ascending
    Distance,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bestmatch" | "best_match" | "score" => Ok(Self::BestMatch),
            "rating" => Ok(Self::Rating),
            "distance" => Ok(Self::Distance),
            other => {
                Err(format!("unsupported sort mode `{other}` (expected bestMatch|rating|distance)"))
            }
        }
    }
}

/// Which categories a request covers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryScope {
    #[default]
    All,
    Restaurant,
    Attraction,
    Accommodation,
}

impl CategoryScope {
    pub fn categories(&self) -> Vec<PlaceCategory> {
        match self {
            Self::All => PlaceCategory::ALL.to_vec(),
            Self::Restaurant => vec![PlaceCategory::Restaurant],
            Self::Attraction => vec![PlaceCategory::Attraction],
            Self::Accommodation => vec![PlaceCategory::Accommodation],
        }
    }
}

impl std::str::FromStr for CategoryScope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Ok(match value.parse::<PlaceCategory>()? {
            PlaceCategory::Restaurant => Self::Restaurant,
            PlaceCategory::Attraction => Self::Attraction,
            PlaceCategory::Accommodation => Self::Accommodation,
        })
    }
}

/// Inclusive price band on the 1-5 scale; a missing bound is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub min: Option<u8>,
    #[serde(default)]
    pub max: Option<u8>,
}

impl PriceRange {
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, price_level: u8) -> bool {
        self.min.map_or(true, |min| price_level >= min)
            && self.max.map_or(true, |max| price_level <= max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationOptions {
    /// Candidates rated below this are excluded
    pub min_rating: f64,
    /// Radius in km; must-visit places are exempt
    pub max_radius: f64,
    pub sort_by: SortBy,
    pub show_hidden_gems: bool,
    /// Restrict to rating >= 4.5
    pub top_rated_only: bool,
    pub price_range: Option<PriceRange>,
    pub category: CategoryScope,
    /// Target total after category balancing
    pub limit: usize,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            min_rating: DEFAULT_MIN_RATING,
            max_radius: DEFAULT_MAX_RADIUS_KM,
            sort_by: SortBy::BestMatch,
            show_hidden_gems: false,
            top_rated_only: false,
            price_range: None,
            category: CategoryScope::All,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl RecommendationOptions {
    pub fn active_price_range(&self) -> Option<PriceRange> {
        self.price_range.filter(PriceRange::is_set)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(DomainError::InvalidOptions(format!(
                "limit must be in range 1..={MAX_LIMIT}"
            )));
        }

        if !(0.0..=5.0).contains(&self.min_rating) {
            return Err(DomainError::InvalidOptions(
                "minRating must be in range 0..=5".to_string(),
            ));
        }

        if !self.max_radius.is_finite() || self.max_radius <= 0.0 {
            return Err(DomainError::InvalidOptions(
                "maxRadius must be a positive number of kilometres".to_string(),
            ));
        }

        if let Some(range) = self.price_range {
            let in_scale = |bound: Option<u8>| bound.map_or(true, |value| (1..=5).contains(&value));
            if !in_scale(range.min) || !in_scale(range.max) {
                return Err(DomainError::InvalidOptions(
                    "priceRange bounds must be in range 1..=5".to_string(),
                ));
            }
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(DomainError::InvalidOptions(
                        "priceRange.min must not exceed priceRange.max".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}
