use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

pub const MUST_VISIT_BADGE: &str = "Must Visit";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Restaurant,
    Attraction,
    Accommodation,
}

impl PlaceCategory {
    /// Balancing order: attractions first, then restaurants, then accommodations.
    pub const ALL: [PlaceCategory; 3] =
        [PlaceCategory::Attraction, PlaceCategory::Restaurant, PlaceCategory::Accommodation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Attraction => "attraction",
            Self::Accommodation => "accommodation",
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurants",
            Self::Attraction => "tourist attractions",
            Self::Accommodation => "hotels and accommodations",
        }
    }
}

impl std::fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlaceCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restaurant" | "restaurants" => Ok(Self::Restaurant),
            "attraction" | "attractions" => Ok(Self::Attraction),
            "accommodation" | "accommodations" | "hotel" | "hotels" => Ok(Self::Accommodation),
            other => Err(format!(
                "unsupported place category `{other}` (expected restaurant|attraction|accommodation)"
            )),
        }
    }
}

/// GeoJSON-style point; `coordinates` is `[lon, lat]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLocation {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl PointLocation {
    pub fn from_point(point: GeoPoint) -> Self {
        Self { kind: "Point".to_string(), coordinates: [point.lon, point.lat] }
    }

    pub fn as_point(&self) -> GeoPoint {
        GeoPoint { lat: self.coordinates[1], lon: self.coordinates[0] }
    }
}

/// A place record moving through the recommendation pipeline. Fields fill in
/// as stages run: parsing, then geocoding, then ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub category: PlaceCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub rating: f64,
    pub price_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PointLocation>,
    #[serde(default)]
    pub is_approximate_location: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_center: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden_gem: Option<bool>,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_score: Option<f64>,
}

impl Candidate {
    pub const DEFAULT_RATING: f64 = 4.0;
    pub const DEFAULT_PRICE_LEVEL: u8 = 2;

    pub fn new(name: impl Into<String>, category: PlaceCategory) -> Self {
        Self {
            name: name.into(),
            category,
            description: String::new(),
            address_hint: None,
            address: None,
            rating: Self::DEFAULT_RATING,
            price_level: Self::DEFAULT_PRICE_LEVEL,
            cuisine: None,
            best_time: None,
            amenities: Vec::new(),
            location: None,
            is_approximate_location: false,
            distance_from_center: None,
            is_hidden_gem: None,
            badges: Vec::new(),
            recommendation_score: None,
        }
    }

    /// Normalized deduplication key: two candidates with the same key are the same place.
    pub fn dedup_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    pub fn coordinates(&self) -> Option<GeoPoint> {
        self.location.as_ref().map(PointLocation::as_point)
    }
}
