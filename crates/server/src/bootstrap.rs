use planora_agent::runtime::RecommendationRuntime;
use planora_core::config::AppConfig;
use planora_core::errors::ApplicationError;
use thiserror::Error;
use tracing::{info, warn};

pub struct Application {
    pub config: AppConfig,
    pub runtime: RecommendationRuntime,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("collaborator client setup failed: {0}")]
    Collaborators(#[source] ApplicationError),
}

/// Builds the collaborator clients for an already loaded config.
pub fn bootstrap(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let runtime =
        RecommendationRuntime::from_config(&config).map_err(BootstrapError::Collaborators)?;
    info!(
        event_name = "system.bootstrap.collaborators_ready",
        correlation_id = "bootstrap",
        llm_provider = ?config.llm.provider,
        llm_model = %config.llm.model,
        geocoder = %config.geocoder.base_url,
        "collaborator clients initialized"
    );

    if let Some(message) = config.llm.missing_credentials() {
        warn!(
            event_name = "system.bootstrap.llm_credentials_missing",
            correlation_id = "bootstrap",
            detail = %message,
            "recommendation requests will fail until llm credentials are configured"
        );
    }

    Ok(Application { config, runtime })
}
