pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "citabot",
    about = "Citabot operator CLI",
    long_about = "Inspect configuration, check readiness, and exercise the appointment actions in-process.",
    after_help = "Examples:\n  citabot doctor --json\n  citabot run action_reservar_cita --slot nombre=Ana --slot fecha=2025-12-01 --slot especialidad=Cardiología\n  citabot smoke"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List the action names the action server registers")]
    Actions,
    #[command(about = "Dispatch one action against a fresh in-memory registry")]
    Run {
        #[arg(help = "Action name, e.g. action_reservar_cita")]
        action: String,
        #[arg(long = "slot", value_name = "KEY=VALUE", help = "Conversation slot value")]
        slots: Vec<String>,
    },
    #[command(about = "Run the reserve/cancel/list scenarios end to end with per-check timing")]
    Smoke,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, listen address, and action registration")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Actions => commands::actions::run(),
        Command::Run { action, slots } => commands::run::run(&action, &slots),
        Command::Smoke => commands::smoke::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
