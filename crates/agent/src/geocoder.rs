use std::time::Duration;

use async_trait::async_trait;
use planora_core::config::GeocoderConfig;
use planora_core::domain::place::{Candidate, PointLocation};
use planora_core::domain::trip::TripContext;
use planora_core::errors::{ApplicationError, DomainError};
use planora_core::geo::GeoPoint;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeMatch {
    pub lat: f64,
    pub lon: f64,
    pub formatted: String,
}

impl GeocodeMatch {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service has no match for the query.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeMatch>, ApplicationError>;
}

/// Nominatim-compatible `/search` client.
pub struct NominatimGeocoder {
    client: Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                ApplicationError::Configuration(format!(
                    "failed to build geocoder http client: {error}"
                ))
            })?;

        Ok(Self { client, search_url: format!("{}/search", config.base_url.trim_end_matches('/')) })
    }

    fn search_url(&self, query: &str) -> Result<Url, ApplicationError> {
        let params = [("q", query), ("format", "json"), ("limit", "1")];
        Url::parse_with_params(&self.search_url, &params).map_err(|error| {
            ApplicationError::Configuration(format!("invalid geocoder.base_url: {error}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimPlace {
    fn into_match(self) -> Result<GeocodeMatch, ApplicationError> {
        let lat = self.lat.trim().parse::<f64>();
        let lon = self.lon.trim().parse::<f64>();
        match (lat, lon) {
            (Ok(lat), Ok(lon)) if lat.is_finite() && lon.is_finite() => {
                Ok(GeocodeMatch { lat, lon, formatted: self.display_name })
            }
            _ => Err(ApplicationError::Integration(format!(
                "geocoder returned unusable coordinates `{}`, `{}`",
                self.lat, self.lon
            ))),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeMatch>, ApplicationError> {
        let url = self.search_url(query)?;
        let response = self.client.get(url).send().await.map_err(|error| {
            ApplicationError::Integration(format!("geocoder request failed: {error}"))
        })?;

        if !response.status().is_success() {
            return Err(ApplicationError::Integration(format!(
                "geocoder returned {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|error| {
            ApplicationError::Integration(format!("failed to decode geocoder response: {error}"))
        })?;

        places.into_iter().next().map(NominatimPlace::into_match).transpose()
    }
}

/// `name, addressHint, destination`, skipping empty parts.
pub fn candidate_query(candidate: &Candidate, destination: &str) -> String {
    [Some(candidate.name.as_str()), candidate.address_hint.as_deref(), Some(destination)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Attach an address, coordinates and distance to every candidate. Failures of
/// any kind fall back to the center point; the output has one entry per input.
pub async fn geocode_candidates(
    geocoder: &dyn Geocoder,
    candidates: Vec<Candidate>,
    destination: &str,
    center: GeoPoint,
) -> Vec<Candidate> {
    let mut located = Vec::with_capacity(candidates.len());

    for mut candidate in candidates {
        let query = candidate_query(&candidate, destination);

        match geocoder.geocode(&query).await {
            Ok(Some(found)) => {
                candidate.address = Some(found.formatted.clone());
                candidate.location = Some(PointLocation::from_point(found.point()));
                candidate.is_approximate_location = false;
            }
            outcome => {
                let reason = match outcome {
                    Err(error) => error.to_string(),
                    _ => "no match".to_string(),
                };
                debug!(
                    event_name = "recommendations.geocode.fallback",
                    place = %candidate.name,
                    reason = %reason,
                    "using trip center for place location"
                );

                let hint = candidate
                    .address_hint
                    .as_deref()
                    .map(str::trim)
                    .filter(|hint| !hint.is_empty())
                    .unwrap_or(destination)
                    .to_string();
                candidate.address = Some(hint);
                candidate.location = Some(PointLocation::from_point(center));
                candidate.is_approximate_location = true;
            }
        }

        candidate.distance_from_center =
            candidate.coordinates().map(|point| center.distance_km(&point));
        located.push(candidate);
    }

    located
}

/// Stored trip coordinates, else a geocode of `destination[, country]`.
pub async fn resolve_center(
    geocoder: &dyn Geocoder,
    trip: &TripContext,
) -> Result<GeoPoint, ApplicationError> {
    if let Some(point) = trip.coordinates {
        return Ok(point);
    }

    let query = trip.display_destination();
    match geocoder.geocode(&query).await {
        Ok(Some(found)) => Ok(found.point()),
        Ok(None) => Err(DomainError::CenterUnresolved { destination: query }.into()),
        Err(error) => {
            debug!(
                event_name = "recommendations.center.geocode_failed",
                destination = %query,
                error = %error,
                "center geocoding failed"
            );
            Err(DomainError::CenterUnresolved { destination: query }.into())
        }
    }
}
