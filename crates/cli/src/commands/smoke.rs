use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDateTime;
use citabot_agent::actions::{ACTION_CANCEL, ACTION_LIST, ACTION_RESERVE};
use citabot_agent::replies;
use citabot_agent::runtime::{new_correlation_id, ActionRuntime};
use citabot_agent::slots::SlotSnapshot;
use citabot_core::config::{AppConfig, LoadOptions};
use citabot_core::domain::appointment::REGISTERED_AT_FORMAT;
use citabot_core::registry::AppointmentRegistry;
use serde::Serialize;
use tokio::runtime::Runtime;

use crate::commands::{CommandResult, EXIT_SMOKE_FAILURE};

const SCENARIOS: [&str; 5] = [
    "reserve_complete",
    "reserve_missing_data",
    "cancel_latest",
    "cancel_empty",
    "list_in_order",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, _config)) => checks.push(SmokeCheck {
            name: "config_validation",
            status: SmokeStatus::Pass,
            elapsed_ms,
            message: "configuration loaded and validated".to_string(),
        }),
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.extend(SCENARIOS.into_iter().map(skipped));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "async_runtime",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.extend(SCENARIOS.into_iter().map(skipped));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let harness = Harness::new(runtime);
    checks.push(scenario("reserve_complete", || harness.reserve_complete()));
    checks.push(scenario("reserve_missing_data", || harness.reserve_missing_data()));
    checks.push(scenario("cancel_latest", || harness.cancel_latest()));
    checks.push(scenario("cancel_empty", || harness.cancel_empty()));
    checks.push(scenario("list_in_order", || harness.list_in_order()));

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

/// Drives the actions the same way the webhook does, against one in-memory registry.
struct Harness {
    runtime: Runtime,
    registry: Arc<AppointmentRegistry>,
    actions: ActionRuntime,
}

impl Harness {
    fn new(runtime: Runtime) -> Self {
        let registry = Arc::new(AppointmentRegistry::default());
        let actions = ActionRuntime::with_appointment_actions(Arc::clone(&registry));
        Self { runtime, registry, actions }
    }

    fn dispatch(&self, action_name: &str, slots: &SlotSnapshot) -> Result<String, String> {
        let correlation_id = new_correlation_id();
        let response = self
            .runtime
            .block_on(self.actions.dispatch(action_name, slots, &correlation_id))
            .map_err(|error| error.to_string())?;

        let mut texts = response.responses.into_iter().map(|message| message.text);
        match (texts.next(), texts.next()) {
            (Some(text), None) => Ok(text),
            _ => Err(format!("`{action_name}` should emit exactly one message")),
        }
    }

    fn reserve(&self, name: &str, date: &str, specialty: &str) -> Result<String, String> {
        let slots = SlotSnapshot::new()
            .with_slot("nombre", name)
            .with_slot("fecha", date)
            .with_slot("especialidad", specialty);
        self.dispatch(ACTION_RESERVE, &slots)
    }

    fn reserve_complete(&self) -> Result<String, String> {
        let text = self.reserve("Ana", "2025-12-01", "Cardiología")?;
        for expected in ["ID: 1", "Paciente: Ana", "Especialidad: Cardiología", "Fecha: 2025-12-01"]
        {
            ensure(text.contains(expected), format!("confirmation is missing `{expected}`"))?;
        }
        ensure(self.registry.len() == 1, "registry should hold one appointment")?;
        Ok("reservation confirmed with id 1".to_string())
    }

    fn reserve_missing_data(&self) -> Result<String, String> {
        let before = self.registry.list_all();
        let slots = SlotSnapshot::new()
            .with_slot("fecha", "2025-12-01")
            .with_slot("especialidad", "Cardiología");

        let text = self.dispatch(ACTION_RESERVE, &slots)?;
        ensure(text == replies::MISSING_DATA, format!("unexpected reply `{text}`"))?;
        ensure(self.registry.list_all() == before, "registry changed on incomplete data")?;
        Ok("incomplete reservation rejected".to_string())
    }

    fn cancel_latest(&self) -> Result<String, String> {
        let text = self.dispatch(ACTION_CANCEL, &SlotSnapshot::new())?;
        ensure(
            text.contains("ID: 1") && text.contains("Paciente: Ana"),
            format!("unexpected reply `{text}`"),
        )?;
        ensure(self.registry.is_empty(), "registry should be empty after cancelling")?;
        Ok("latest appointment cancelled".to_string())
    }

    fn cancel_empty(&self) -> Result<String, String> {
        let text = self.dispatch(ACTION_CANCEL, &SlotSnapshot::new())?;
        ensure(text == replies::NOTHING_TO_CANCEL, format!("unexpected reply `{text}`"))?;
        Ok("empty registry reported".to_string())
    }

    fn list_in_order(&self) -> Result<String, String> {
        self.reserve("Ana", "2025-12-01", "Cardiología")?;
        self.reserve("Luis", "2025-12-02", "Dermatología")?;

        let text = self.dispatch(ACTION_LIST, &SlotSnapshot::new())?;
        let ana = text.find("Paciente: Ana").ok_or("listing is missing Ana")?;
        let luis = text.find("Paciente: Luis").ok_or("listing is missing Luis")?;
        ensure(ana < luis, "appointments are not in insertion order")?;

        let timestamps = text
            .lines()
            .filter_map(|line| line.strip_prefix("Registrada: "))
            .collect::<Vec<_>>();
        ensure(timestamps.len() == 2, "listing should carry two timestamps")?;
        for timestamp in timestamps {
            NaiveDateTime::parse_from_str(timestamp, REGISTERED_AT_FORMAT)
                .map_err(|error| format!("timestamp `{timestamp}` is malformed: {error}"))?;
        }
        Ok("two appointments listed in insertion order".to_string())
    }
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(message.into())
    }
}

fn scenario(name: &'static str, check: impl FnOnce() -> Result<String, String>) -> SmokeCheck {
    match timed_check(check) {
        Ok((elapsed_ms, message)) => {
            SmokeCheck { name, status: SmokeStatus::Pass, elapsed_ms, message }
        }
        Err((elapsed_ms, message)) => {
            SmokeCheck { name, status: SmokeStatus::Fail, elapsed_ms, message }
        }
    }
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due to previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status != SmokeStatus::Pass);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult {
        exit_code: if failed { EXIT_SMOKE_FAILURE } else { 0 },
        output: format!("{human}\n{machine}"),
    }
}
