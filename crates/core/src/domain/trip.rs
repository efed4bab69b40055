use serde::{Deserialize, Serialize};

use crate::domain::place::PlaceCategory;
use crate::geo::GeoPoint;

/// Read-only trip context for one recommendation request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripContext {
    pub destination: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub preferences: Vec<CategoryPreference>,
    /// Stored trip coordinates; used as the center without a geocoding call.
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryPreference {
    pub category: String,
    pub weight: f64,
}

impl TripContext {
    pub fn new(destination: impl Into<String>) -> Self {
        Self { destination: destination.into(), ..Self::default() }
    }

    /// `destination, country` when the country is known.
    pub fn display_destination(&self) -> String {
        match self.country.as_deref().map(str::trim).filter(|country| !country.is_empty()) {
            Some(country) => format!("{}, {country}", self.destination.trim()),
            None => self.destination.trim().to_string(),
        }
    }

    pub fn top_categories(&self) -> Vec<&str> {
        self.preferences.iter().map(|preference| preference.category.as_str()).collect()
    }

    pub fn preference_weight(&self, category: PlaceCategory) -> Option<f64> {
        self.preferences
            .iter()
            .find(|preference| preference.category.eq_ignore_ascii_case(category.as_str()))
            .map(|preference| preference.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryPreference, TripContext};
    use crate::domain::place::PlaceCategory;

    #[test]
    fn display_destination_appends_country_only_when_present() {
        let mut trip = TripContext::new("Paris");
        assert_eq!(trip.display_destination(), "Paris");

        trip.country = Some("  ".to_string());
        assert_eq!(trip.display_destination(), "Paris");

        trip.country = Some("France".to_string());
        assert_eq!(trip.display_destination(), "Paris, France");
    }

    #[test]
    fn preference_weight_matches_category_case_insensitively() {
        let mut trip = TripContext::new("Agra");
        trip.preferences =
            vec![CategoryPreference { category: "Attraction".to_string(), weight: 14.0 }];

        assert_eq!(trip.preference_weight(PlaceCategory::Attraction), Some(14.0));
        assert_eq!(trip.preference_weight(PlaceCategory::Restaurant), None);
    }

    #[test]
    fn deserializes_camel_case_payload_with_missing_optionals() {
        let trip: TripContext = serde_json::from_str(
            r#"{"destination":"Kyoto","durationDays":4,"coordinates":{"lat":35.01,"lon":135.77}}"#,
        )
        .expect("trip should deserialize");

        assert_eq!(trip.duration_days, Some(4));
        assert!(trip.preferences.is_empty());
        assert!(trip.coordinates.is_some());
    }
}
