//! `shipbot` – mission controller entry point.
//!
//! This binary is the ignition switch for a mission run. It:
//!
//! 1. Loads `~/.shipbot/config.toml` (if present) and applies `SHIPBOT_*`
//!    environment overrides.
//! 2. Bootstraps the actuator record files so the firmware has something to
//!    take ownership of.
//! 3. Waits for the firmware to claim every actuator record (the startup
//!    handshake), honoring **Ctrl-C** as a clean abort.
//! 4. Builds the mission from the file named on the command line and
//!    executes it task by task.

mod config;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use shipbot_runtime::{Mission, MissionConfig, wait_for_sync};
use shipbot_store::DeviceStore;
use shipbot_types::log::MissionLog;
use tracing::{error, warn};

/// Record fields each actuator is bootstrapped with, keyed by the
/// configured hardware ids.
fn bootstrap_fields(config: &MissionConfig) -> Vec<(String, &'static [&'static str])> {
    vec![
        (config.hardware.drive_id.clone(), &["x", "y"] as &[&str]),
        (config.hardware.depth_stepper_id.clone(), &["position"]),
        (config.hardware.height_stepper_id.clone(), &["position"]),
        (config.hardware.arm_id.clone(), &["fixed", "rotator"]),
    ]
}

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set SHIPBOT_LOG_FORMAT=json to emit newline-delimited JSON logs
    // suitable for log aggregators. The status log file is separate and
    // always written in its own line format.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("SHIPBOT_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Mission file argument ─────────────────────────────────────────────
    let Some(mission_arg) = std::env::args().nth(1) else {
        eprintln!("{}", "usage: shipbot <mission-file>".bold());
        return ExitCode::from(2);
    };
    let mission_path = Path::new(&mission_arg).to_path_buf();
    if !mission_path.is_file() {
        error!(path = %mission_path.display(), "mission file not found");
        eprintln!(
            "{}: mission file {} does not exist",
            "error".red().bold(),
            mission_path.display().to_string().bold()
        );
        return ExitCode::FAILURE;
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let mission_config = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg.into_mission_config()
        }
        Ok(None) => {
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg.into_mission_config()
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            MissionConfig::default()
        }
    };

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "Ctrl-C received, aborting mission.".yellow().bold());
        cancel_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler; Ctrl-C will kill the process outright");
    }

    // ── Firmware handshake ────────────────────────────────────────────────
    let log = MissionLog::new(mission_config.status_log.clone());
    let store = DeviceStore::new(mission_config.devices_root.clone(), log);
    for (id, fields) in bootstrap_fields(&mission_config) {
        if let Err(e) = store.bootstrap_actuator(&id, fields) {
            error!(device = %id, error = %e, "failed to bootstrap actuator record");
            eprintln!("{}: could not bootstrap actuator '{}': {}", "error".red().bold(), id, e);
            return ExitCode::FAILURE;
        }
    }

    println!("  {}", "WAITING FOR SYNC".bold().cyan());
    if !wait_for_sync(
        &store,
        &mission_config.actuator_ids(),
        mission_config.handshake_poll,
        &cancel,
    ) {
        println!("  {}", "Handshake aborted.".yellow());
        return ExitCode::FAILURE;
    }
    println!("  {}", "SYNC ACQUIRED".bold().green());

    // ── Mission run ───────────────────────────────────────────────────────
    let mut mission = Mission::new(&mission_path, &mission_config);
    println!(
        "  Mission loaded: {} device(s), time limit {} sec.",
        mission.device_count().to_string().bold(),
        mission.time_limit().to_string().bold()
    );
    mission.execute();
    println!("  {}", "Mission complete.".bold().green());
    println!(
        "  Status log written to {}",
        mission.log().path().display().to_string().bold()
    );

    ExitCode::SUCCESS
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"   _____ __    _      __          __ "#.bold().cyan());
    println!("{}", r#"  / ___// /_  (_)___ / /_  ____  / /_"#.bold().cyan());
    println!("{}", r#"  \__ \/ __ \/ / __ \/ __ \/ __ \/ __/"#.bold().cyan());
    println!("{}", r#" ___/ / / / / / /_/ / /_/ / /_/ / /_ "#.bold().cyan());
    println!("{}", r#"/____/_/ /_/_/ .___/_.___/\____/\__/ "#.bold().cyan());
    println!("{}", r#"            /_/                      "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "Shipbot".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Shipboard mission controller");
    println!();
}
