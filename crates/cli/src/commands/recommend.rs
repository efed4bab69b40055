use std::fs;
use std::path::Path;

use planora_agent::runtime::RecommendationRuntime;
use planora_core::config::{AppConfig, LoadOptions, LogFormat};
use planora_core::domain::trip::TripContext;
use planora_core::errors::ApplicationError;
use planora_core::recommendations::{PriceRange, RecommendationOptions};

use super::{CommandResult, EXIT_CONFIG_FAILURE, EXIT_RUNTIME_FAILURE};
use crate::RecommendArgs;

const CORRELATION_ID: &str = "cli";

pub fn run(args: &RecommendArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG_FAILURE,
            )
        }
    };
    init_logging(&config);

    let trip = match read_trip(&args.trip) {
        Ok(trip) => trip,
        Err(message) => {
            return CommandResult::failure(
                "recommend",
                "invalid_input",
                message,
                EXIT_RUNTIME_FAILURE,
            )
        }
    };
    let options = match build_options(args) {
        Ok(options) => options,
        Err(message) => {
            return CommandResult::failure(
                "recommend",
                "invalid_input",
                message,
                EXIT_RUNTIME_FAILURE,
            )
        }
    };

    let recommender = match RecommendationRuntime::from_config(&config) {
        Ok(recommender) => recommender,
        Err(error) => return application_failure(error),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME_FAILURE,
            )
        }
    };

    runtime.block_on(execute(&recommender, &trip, &options))
}

pub async fn execute(
    recommender: &RecommendationRuntime,
    trip: &TripContext,
    options: &RecommendationOptions,
) -> CommandResult {
    match recommender.recommend(trip, options, CORRELATION_ID).await {
        Ok(response) => CommandResult::json("recommend", 0, &response),
        Err(error) => application_failure(error),
    }
}

pub fn read_trip(path: &Path) -> Result<TripContext, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read trip file `{}`: {error}", path.display()))?;
    let trip: TripContext = serde_json::from_str(&raw)
        .map_err(|error| format!("could not parse trip file `{}`: {error}", path.display()))?;

    if trip.destination.trim().is_empty() {
        return Err(format!("trip file `{}` has an empty destination", path.display()));
    }
    Ok(trip)
}

/// Defaults overridden by whichever flags were given.
pub fn build_options(args: &RecommendArgs) -> Result<RecommendationOptions, String> {
    let mut options = RecommendationOptions::default();

    if let Some(category) = &args.category {
        options.category = category.parse()?;
    }
    if let Some(sort_by) = &args.sort_by {
        options.sort_by = sort_by.parse()?;
    }
    if let Some(limit) = args.limit {
        options.limit = limit;
    }
    if let Some(min_rating) = args.min_rating {
        options.min_rating = min_rating;
    }
    if let Some(max_radius) = args.max_radius {
        options.max_radius = max_radius;
    }
    if args.price_min.is_some() || args.price_max.is_some() {
        options.price_range = Some(PriceRange { min: args.price_min, max: args.price_max });
    }
    options.show_hidden_gems = args.hidden_gems;
    options.top_rated_only = args.top_rated;

    options.validate().map_err(|error| error.to_string())?;
    Ok(options)
}

fn application_failure(error: ApplicationError) -> CommandResult {
    let (error_class, exit_code) = match &error {
        ApplicationError::Configuration(_) => ("configuration", EXIT_CONFIG_FAILURE),
        ApplicationError::Domain(_) => ("invalid_request", EXIT_RUNTIME_FAILURE),
        ApplicationError::Integration(_) => ("integration", EXIT_RUNTIME_FAILURE),
    };
    CommandResult::failure("recommend", error_class, error.to_string(), exit_code)
}

/// Logs go to stderr so stdout stays a single JSON payload.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
