use std::env;
use std::sync::{Mutex, OnceLock};

use citabot_cli::commands::{actions, config, doctor, run, smoke};
use serde_json::Value;

#[test]
fn actions_lists_every_registered_action() {
    with_env(&[], || {
        let result = actions::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "actions");
        assert_eq!(payload["status"], "ok");
        assert_eq!(
            payload["message"],
            "action_cancelar_cita\naction_consultar_citas\naction_reservar_cita"
        );
    });
}

#[test]
fn run_reserve_returns_confirmation() {
    with_env(&[], || {
        let slots = vec![
            "nombre=Ana".to_string(),
            "fecha=2025-12-01".to_string(),
            "especialidad=Cardiología".to_string(),
        ];
        let result = run::run("action_reservar_cita", &slots);
        assert_eq!(result.exit_code, 0, "expected reservation to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "run");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().expect("message should be text");
        assert!(message.starts_with("Cita reservada exitosamente:\nID: 1\n"));
        assert!(message.contains("Paciente: Ana"));
    });
}

#[test]
fn run_reserve_without_slots_reports_missing_data() {
    with_env(&[], || {
        let result = run::run("action_reservar_cita", &[]);
        assert_eq!(result.exit_code, 0, "missing data is a normal reply");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["message"], "Faltan datos para completar la reserva.");
    });
}

#[test]
fn run_cancel_on_fresh_registry_reports_nothing_to_cancel() {
    with_env(&[], || {
        let result = run::run("action_cancelar_cita", &[]);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["message"], "No hay citas para cancelar.");
    });
}

#[test]
fn run_unknown_action_returns_unknown_action_code() {
    with_env(&[], || {
        let result = run::run("action_saludar", &[]);
        assert_eq!(result.exit_code, 4, "expected unknown action exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "unknown_action");
    });
}

#[test]
fn run_malformed_slot_returns_invalid_argument_code() {
    with_env(&[], || {
        let result = run::run("action_reservar_cita", &["nombre".to_string()]);
        assert_eq!(result.exit_code, 3, "expected invalid argument exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_slot");
    });
}

#[test]
fn smoke_passes_every_scenario_with_default_config() {
    with_env(&[], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 0, "expected smoke success: {}", result.output);

        let (summary, report) = split_report(&result.output);
        assert!(summary.starts_with("smoke: 6/6 checks passed"));
        assert_eq!(report["status"], "pass");

        let names = report["checks"]
            .as_array()
            .expect("checks should be an array")
            .iter()
            .map(|check| check["name"].as_str().unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "config_validation",
                "reserve_complete",
                "reserve_missing_data",
                "cancel_latest",
                "cancel_empty",
                "list_in_order",
            ]
        );
    });
}

#[test]
fn smoke_fails_and_skips_scenarios_on_invalid_config() {
    with_env(&[("CITABOT_LOG_LEVEL", "bogus")], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 6, "expected smoke failure code");

        let (_, report) = split_report(&result.output);
        assert_eq!(report["status"], "fail");
        assert_eq!(report["checks"][0]["name"], "config_validation");
        assert_eq!(report["checks"][0]["status"], "fail");
        assert_eq!(report["checks"][1]["status"], "skipped");
    });
}

#[test]
fn doctor_json_reports_all_checks_passing() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0);
        let report: Value =
            serde_json::from_str(&result.output).expect("doctor output should be json");

        assert_eq!(report["overall_status"], "pass");
        assert_eq!(report["checks"].as_array().map(Vec::len), Some(3));
    });
}

#[test]
fn doctor_reports_invalid_port_override() {
    with_env(&[("CITABOT_SERVER_PORT", "not-a-port")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let output = result.output;
        assert!(output.starts_with("doctor: one or more readiness checks failed"));
        assert!(output.contains("[fail] config_validation"));
        assert!(output.contains("[skip] listen_address"));
    });
}

#[test]
fn config_attributes_env_overrides() {
    with_env(&[("CITABOT_SERVER_PORT", "6060")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("server.port = 6060"));
        assert!(result.output.contains("env (CITABOT_SERVER_PORT)"));
    });
}

#[test]
fn config_ignores_blank_env_values_as_source() {
    with_env(&[("CITABOT_SERVER_PORT", "  ")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("- server.port = 5055 (source: default)"));
    });
}

#[test]
fn config_returns_validation_code_on_bad_level() {
    with_env(&[("CITABOT_LOGGING_LEVEL", "loud")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output.trim()).expect("command output should be json")
}

fn split_report(output: &str) -> (&str, Value) {
    let (summary, machine) = output.split_once('\n').expect("summary and report lines");
    (summary, serde_json::from_str(machine).expect("report line should be json"))
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CITABOT_SERVER_BIND_ADDRESS",
        "CITABOT_SERVER_PORT",
        "CITABOT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "CITABOT_LOGGING_LEVEL",
        "CITABOT_LOGGING_FORMAT",
        "CITABOT_LOG_LEVEL",
        "CITABOT_LOG_FORMAT",
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
