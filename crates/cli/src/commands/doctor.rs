use planora_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

use super::{CommandResult, EXIT_CONFIG_FAILURE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report =
        build_report(AppConfig::load(LoadOptions::default()).map_err(|error| error.to_string()));
    let exit_code =
        if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_CONFIG_FAILURE };

    if json_output {
        return CommandResult::json("doctor", exit_code, &report);
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report(loaded: Result<AppConfig, String>) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_llm_credentials(&config));
            checks.push(check_geocoder_endpoint(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error,
            });
            for name in ["llm_credentials", "geocoder_endpoint"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_llm_credentials(config: &AppConfig) -> DoctorCheck {
    match config.llm.missing_credentials() {
        None => DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Pass,
            details: format!(
                "{:?} provider ready at `{}` with model `{}`",
                config.llm.provider,
                config.llm.effective_base_url(),
                config.llm.model
            ),
        },
        Some(message) => {
            DoctorCheck { name: "llm_credentials", status: CheckStatus::Fail, details: message }
        }
    }
}

fn check_geocoder_endpoint(config: &AppConfig) -> DoctorCheck {
    let search_url = format!("{}/search", config.geocoder.base_url.trim_end_matches('/'));
    match check_url_shape(&search_url) {
        Ok(()) => DoctorCheck {
            name: "geocoder_endpoint",
            status: CheckStatus::Pass,
            details: format!(
                "searching `{search_url}` as `{}` (timeout {}s)",
                config.geocoder.user_agent, config.geocoder.timeout_secs
            ),
        },
        Err(details) => {
            DoctorCheck { name: "geocoder_endpoint", status: CheckStatus::Fail, details }
        }
    }
}

/// Shape check only; doctor never calls the geocoder.
fn check_url_shape(url: &str) -> Result<(), String> {
    let Some((_, rest)) = url.split_once("://") else {
        return Err(format!("`{url}` has no scheme"));
    };
    let host = rest.split(['/', '?']).next().unwrap_or_default();
    if host.is_empty() || host.starts_with(':') {
        return Err(format!("`{url}` has no host"));
    }
    Ok(())
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
