use std::sync::Arc;

use planora_core::config::{AppConfig, LlmConfig};
use planora_core::domain::place::{Candidate, PlaceCategory};
use planora_core::domain::trip::TripContext;
use planora_core::errors::{ApplicationError, DomainError};
use planora_core::geo::GeoPoint;
use planora_core::recommendations::{
    apply_sort_mode, balance_categories, build_prompt, parse_response, PromptContext,
    RankingEngine, RecommendationOptions, RecommendationResponse, SYSTEM_INSTRUCTION,
};
use tracing::{info, warn};

use crate::geocoder::{geocode_candidates, resolve_center, Geocoder, NominatimGeocoder};
use crate::llm::{ChatCompletionClient, GenerationRequest, TextGenerator};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self { temperature: 0.7, max_tokens: 2000 }
    }
}

impl From<&LlmConfig> for GenerationSettings {
    fn from(config: &LlmConfig) -> Self {
        Self { temperature: config.temperature, max_tokens: config.max_tokens }
    }
}

/// Runs the whole recommendation pipeline for one request. Holds only shared,
/// immutable collaborators, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct RecommendationRuntime {
    generator: Arc<dyn TextGenerator>,
    geocoder: Arc<dyn Geocoder>,
    ranking: RankingEngine,
    settings: GenerationSettings,
}

impl RecommendationRuntime {
    pub fn new(generator: Arc<dyn TextGenerator>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            generator,
            geocoder,
            ranking: RankingEngine::new(),
            settings: GenerationSettings::default(),
        }
    }

    /// HTTP collaborators built from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let generator = ChatCompletionClient::from_config(&config.llm)?;
        let geocoder = NominatimGeocoder::from_config(&config.geocoder)?;
        Ok(Self::new(Arc::new(generator), Arc::new(geocoder))
            .with_settings(GenerationSettings::from(&config.llm)))
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn recommend(
        &self,
        trip: &TripContext,
        options: &RecommendationOptions,
        correlation_id: &str,
    ) -> Result<RecommendationResponse, ApplicationError> {
        options.validate()?;
        if trip.destination.trim().is_empty() {
            let error = DomainError::InvalidTrip("destination must not be empty".to_string());
            return Err(error.into());
        }

        let destination = trip.display_destination();
        let center = resolve_center(self.geocoder.as_ref(), trip).await?;
        info!(
            event_name = "recommendations.center.resolved",
            correlation_id,
            destination = %destination,
            lat = center.lat,
            lon = center.lon,
            "trip center resolved"
        );

        let mut ranked = Vec::new();
        for category in options.category.categories() {
            let candidates = self
                .recommend_category(category, trip, options, &destination, center, correlation_id)
                .await?;
            ranked.push((category, candidates));
        }

        let mut places = balance_categories(ranked, options.limit);
        apply_sort_mode(&mut places, options.sort_by);

        info!(
            event_name = "recommendations.request.completed",
            correlation_id,
            destination = %destination,
            place_count = places.len(),
            "recommendation request completed"
        );

        if places.is_empty() {
            return Ok(RecommendationResponse::empty(&destination));
        }
        Ok(RecommendationResponse::found(places, &destination))
    }

    async fn recommend_category(
        &self,
        category: PlaceCategory,
        trip: &TripContext,
        options: &RecommendationOptions,
        destination: &str,
        center: GeoPoint,
        correlation_id: &str,
    ) -> Result<Vec<Candidate>, ApplicationError> {
        let prompt = build_prompt(category, destination, &PromptContext::new(trip, options));
        let request = GenerationRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let text = match self.generator.generate(request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(
                    event_name = "recommendations.category.generation_failed",
                    correlation_id,
                    category = %category,
                    reason = "empty response",
                    "category produced no candidates"
                );
                return Ok(Vec::new());
            }
            Err(error) if error.is_configuration() => return Err(error),
            Err(error) => {
                warn!(
                    event_name = "recommendations.category.generation_failed",
                    correlation_id,
                    category = %category,
                    reason = %error,
                    "category produced no candidates"
                );
                return Ok(Vec::new());
            }
        };

        let parsed = parse_response(&text, category);
        let parsed_count = parsed.len();
        let located = geocode_candidates(self.geocoder.as_ref(), parsed, destination, center).await;
        let ranked = self.ranking.rank(located, options, trip);

        info!(
            event_name = "recommendations.category.ranked",
            correlation_id,
            category = %category,
            parsed_count,
            kept_count = ranked.len(),
            "category ranked"
        );

        Ok(ranked)
    }
}
