use std::net::ToSocketAddrs;
use std::sync::Arc;

use citabot_agent::actions::{ACTION_CANCEL, ACTION_LIST, ACTION_RESERVE};
use citabot_agent::runtime::ActionRuntime;
use citabot_core::config::{AppConfig, LoadOptions};
use citabot_core::registry::AppointmentRegistry;
use serde::Serialize;

use crate::commands::{CommandResult, EXIT_CONFIG_VALIDATION};

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

/// Runs every readiness check; any failure exits with the config validation code.
pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code =
        if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_CONFIG_VALIDATION };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_listen_address(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "listen_address",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }
    checks.push(check_action_registration());

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_listen_address(config: &AppConfig) -> DoctorCheck {
    let address = config.server.listen_address();
    match address.to_socket_addrs() {
        Ok(mut resolved) => match resolved.next() {
            Some(socket) => DoctorCheck {
                name: "listen_address",
                status: CheckStatus::Pass,
                details: format!("`{address}` resolves to `{socket}`"),
            },
            None => DoctorCheck {
                name: "listen_address",
                status: CheckStatus::Fail,
                details: format!("`{address}` did not resolve to any socket address"),
            },
        },
        Err(error) => DoctorCheck {
            name: "listen_address",
            status: CheckStatus::Fail,
            details: format!("`{address}` is not a valid socket address: {error}"),
        },
    }
}

fn check_action_registration() -> DoctorCheck {
    let runtime =
        ActionRuntime::with_appointment_actions(Arc::new(AppointmentRegistry::default()));
    let names = runtime.action_names();
    let missing = [ACTION_CANCEL, ACTION_LIST, ACTION_RESERVE]
        .into_iter()
        .filter(|expected| !names.contains(expected))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        DoctorCheck {
            name: "action_registration",
            status: CheckStatus::Pass,
            details: format!("registered: {}", names.join(", ")),
        }
    } else {
        DoctorCheck {
            name: "action_registration",
            status: CheckStatus::Fail,
            details: format!("missing actions: {}", missing.join(", ")),
        }
    }
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

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use citabot_core::config::AppConfig;

    use super::{check_action_registration, check_listen_address, CheckStatus};

    #[test]
    fn default_listen_address_resolves() {
        let check = check_listen_address(&AppConfig::default());
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[test]
    fn appointment_actions_are_registered() {
        let check = check_action_registration();
        assert_eq!(check.status, CheckStatus::Pass);
        assert!(check.details.contains("action_reservar_cita"));
    }
}
