use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use planora_agent::geocoder::{GeocodeMatch, Geocoder};
use planora_agent::llm::{GenerationRequest, TextGenerator};
use planora_agent::runtime::RecommendationRuntime;
use planora_cli::commands::{config, doctor, recommend};
use planora_cli::RecommendArgs;
use planora_core::domain::trip::TripContext;
use planora_core::errors::ApplicationError;
use planora_core::recommendations::{CategoryScope, RecommendationOptions, SortBy};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn config_reports_sources_and_redacts_api_key() {
    let vars = [("PLANORA_LLM_MODEL", "llama-3.1-8b-instant"), ("GROQ_API_KEY", "gsk_live_secret")];
    with_env(&vars, || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        assert!(result
            .output
            .contains("- llm.model = llama-3.1-8b-instant (source: env (PLANORA_LLM_MODEL))"));
        assert!(result.output.contains("- llm.api_key = gsk_*** (source: env (GROQ_API_KEY))"));
        assert!(result.output.contains("- server.port = 3000 (source: default)"));
        assert!(!result.output.contains("live_secret"));
    });
}

#[test]
fn config_returns_config_failure_on_invalid_override() {
    with_env(&[("PLANORA_LLM_TEMPERATURE", "warm")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_with_credentials() {
    with_env(&[("PLANORA_LLM_API_KEY", "gsk_test")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected all doctor checks to pass");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        assert_eq!(payload["checks"].as_array().map(Vec::len), Some(3));
    });
}

#[test]
fn doctor_fails_without_credentials() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][1]["name"], "llm_credentials");
        assert_eq!(payload["checks"][1]["status"], "fail");
    });
}

#[test]
fn recommend_without_credentials_is_a_config_failure() {
    let dir = TempDir::new().expect("temp dir");
    let trip_path = write_trip(
        &dir,
        r#"{"destination":"Paris","country":"France","coordinates":{"lat":48.8566,"lon":2.3522}}"#,
    );

    with_env(&[], || {
        let result = recommend::run(&args(trip_path.clone()));
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["error_class"], "configuration");
    });
}

#[test]
fn recommend_rejects_unreadable_trip_and_bad_flags() {
    let dir = TempDir::new().expect("temp dir");

    with_env(&[("PLANORA_LLM_API_KEY", "gsk_test")], || {
        let missing = recommend::run(&args(dir.path().join("missing.json")));
        assert_eq!(missing.exit_code, 1);
        assert_eq!(parse_payload(&missing.output)["error_class"], "invalid_input");
    });

    let mut bad_limit = args(dir.path().join("trip.json"));
    bad_limit.limit = Some(0);
    assert!(recommend::build_options(&bad_limit).is_err());

    let mut bad_category = args(dir.path().join("trip.json"));
    bad_category.category = Some("museums-and-more".to_string());
    assert!(recommend::build_options(&bad_category).is_err());
}

#[test]
fn flags_map_onto_options() {
    let mut flags = args(PathBuf::from("trip.json"));
    flags.category = Some("hotels".to_string());
    flags.sort_by = Some("distance".to_string());
    flags.price_max = Some(3);
    flags.top_rated = true;

    let options = recommend::build_options(&flags).expect("valid flags");

    assert_eq!(options.category, CategoryScope::Accommodation);
    assert_eq!(options.sort_by, SortBy::Distance);
    assert_eq!(options.price_range.and_then(|range| range.max), Some(3));
    assert!(options.top_rated_only);
    assert_eq!(options.limit, 20);
}

#[tokio::test]
async fn execute_prints_recommendation_json() {
    let recommender = RecommendationRuntime::new(
        Arc::new(FixedGenerator {
            reply: "NAME: Pastéis de Belém\nRATING: 4.7\nPRICE: $\nLOCATION: Belém\n---\n\
                    NAME: Time Out Market\nRATING: 4.4\nPRICE: 2"
                .to_string(),
        }),
        Arc::new(CenterOnlyGeocoder),
    );
    let options = RecommendationOptions {
        category: CategoryScope::Restaurant,
        ..RecommendationOptions::default()
    };

    let result = recommend::execute(&recommender, &lisbon(), &options).await;

    assert_eq!(result.exit_code, 0);
    let payload = parse_payload(&result.output);
    assert_eq!(payload["message"], "Found 2 recommendations for Lisbon, Portugal");
    assert_eq!(payload["places"][0]["name"], "Pastéis de Belém");
    assert_eq!(payload["places"][0]["isApproximateLocation"], true);
    assert_eq!(payload["places"][0]["location"]["coordinates"][0], -9.1393);
}

#[tokio::test]
async fn execute_maps_unresolved_center_to_runtime_failure() {
    let recommender = RecommendationRuntime::new(
        Arc::new(FixedGenerator { reply: String::new() }),
        Arc::new(CenterOnlyGeocoder),
    );

    let result = recommend::execute(
        &recommender,
        &TripContext::new("Atlantis"),
        &RecommendationOptions::default(),
    )
    .await;

    assert_eq!(result.exit_code, 1);
    assert_eq!(parse_payload(&result.output)["error_class"], "invalid_request");
}

struct FixedGenerator {
    reply: String,
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, ApplicationError> {
        Ok(self.reply.clone())
    }
}

/// Knows only Lisbon itself; every place lookup misses.
struct CenterOnlyGeocoder;

#[async_trait]
impl Geocoder for CenterOnlyGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeMatch>, ApplicationError> {
        if query == "Lisbon, Portugal" {
            return Ok(Some(GeocodeMatch {
                lat: 38.7223,
                lon: -9.1393,
                formatted: "Lisboa, Portugal".to_string(),
            }));
        }
        Ok(None)
    }
}

fn lisbon() -> TripContext {
    let mut trip = TripContext::new("Lisbon");
    trip.country = Some("Portugal".to_string());
    trip
}

fn args(trip: PathBuf) -> RecommendArgs {
    RecommendArgs {
        trip,
        category: None,
        limit: None,
        min_rating: None,
        max_radius: None,
        sort_by: None,
        hidden_gems: false,
        top_rated: false,
        price_min: None,
        price_max: None,
    }
}

fn write_trip(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("trip.json");
    fs::write(&path, contents).expect("trip file should be written");
    path
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PLANORA_LLM_PROVIDER",
        "PLANORA_LLM_API_KEY",
        "GROQ_API_KEY",
        "PLANORA_LLM_BASE_URL",
        "PLANORA_LLM_MODEL",
        "PLANORA_LLM_TIMEOUT_SECS",
        "PLANORA_LLM_TEMPERATURE",
        "PLANORA_LLM_MAX_TOKENS",
        "PLANORA_GEOCODER_BASE_URL",
        "PLANORA_GEOCODER_USER_AGENT",
        "PLANORA_GEOCODER_TIMEOUT_SECS",
        "PLANORA_SERVER_BIND_ADDRESS",
        "PLANORA_SERVER_PORT",
        "PLANORA_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "PLANORA_LOGGING_LEVEL",
        "PLANORA_LOGGING_FORMAT",
        "PLANORA_LOG_LEVEL",
        "PLANORA_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
