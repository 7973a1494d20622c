// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! `dormchef` operations CLI: database migration, demo seeding, password
//! hashing and config/OpenAPI inspection.

use clap::{error::ErrorKind, Parser, Subcommand};
use dormchef_api::openapi_v1_spec;
use dormchef_model::{ExitCode, WeekOf};
use dormchef_server::{hash_password, ServerConfig};
use dormchef_store::{
    configure_connection, migrate, schema_version, seed_demo_data, Database, DEMO_PASSWORD,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;
use tracing::info;

pub const CRATE_NAME: &str = "dormchef-cli";

#[derive(Parser)]
#[command(name = "dormchef")]
#[command(about = "DormChef operations CLI")]
#[command(version)]
struct Cli {
    /// Single-line JSON on stdout and JSON errors on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema.
    Migrate {
        /// Defaults to DORMCHEF_DB_PATH.
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Load the demo accounts, recipes and this week's plan.
    Seed {
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print the stored form of a password.
    HashPassword {
        password: String,
        /// Defaults to DORMCHEF_PASSWORD_ROUNDS.
        #[arg(long)]
        rounds: Option<u32>,
    },
    /// Print the effective server configuration (secret omitted).
    PrintConfig,
    /// Print the OpenAPI document.
    Openapi,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct MachineError {
    code: String,
    message: String,
    #[serde(default)]
    details: BTreeMap<String, String>,
}

impl MachineError {
    fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: &str, detail: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message).with_detail("error", detail),
        }
    }

    fn validation(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("validation_error", message),
        }
    }

    fn dependency(message: String) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", &message),
        }
    }

    fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}

fn print_json(value: &Value, compact: bool) -> Result<(), CliError> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| CliError::internal(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError::usage(
                    "invalid command line arguments",
                    &err.to_string(),
                ))
            }
        },
    };
    init_logging();
    let config = ServerConfig::from_env();
    let compact = cli.json;

    match cli.command {
        Commands::Migrate { db } => {
            let path = db.unwrap_or_else(|| config.db_path.clone());
            let (from, to) = run_migrate(&path)?;
            print_json(&json!({
                "db": path.display().to_string(),
                "from_version": from,
                "to_version": to,
            }), compact)
        }
        Commands::Seed { db } => {
            let path = db.unwrap_or_else(|| config.db_path.clone());
            run_seed(&path, config.password_rounds, compact)
        }
        Commands::HashPassword { password, rounds } => {
            if password.is_empty() {
                return Err(CliError::validation("password must not be empty"));
            }
            let rounds = rounds.unwrap_or(config.password_rounds);
            if rounds == 0 {
                return Err(CliError::validation("rounds must be positive"));
            }
            println!("{}", hash_password(&password, rounds));
            Ok(())
        }
        Commands::PrintConfig => {
            let value = serde_json::to_value(&config).map_err(|e| CliError::internal(e.to_string()))?;
            print_json(&value, compact)
        }
        Commands::Openapi => print_json(&openapi_v1_spec(), compact),
    }
}

/// Returns the schema version before and after migrating.
fn run_migrate(path: &Path) -> Result<(i64, i64), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::dependency(format!("create {}: {e}", parent.display())))?;
    }
    let mut conn = Connection::open(path)
        .map_err(|e| CliError::dependency(format!("open {}: {e}", path.display())))?;
    configure_connection(&conn).map_err(|e| CliError::internal(e.to_string()))?;
    let from = migrate(&mut conn).map_err(|e| CliError::internal(e.to_string()))?;
    let to = schema_version(&conn).map_err(|e| CliError::internal(e.to_string()))?;
    info!(db = %path.display(), from, to, "schema migrated");
    Ok((from, to))
}

fn run_seed(path: &Path, rounds: u32, compact: bool) -> Result<(), CliError> {
    let db = Database::open(path)
        .map_err(|e| CliError::dependency(format!("open {}: {e}", path.display())))?;
    let hash = hash_password(DEMO_PASSWORD, rounds);
    let report = db
        .with_conn(|conn| seed_demo_data(conn, &hash, WeekOf::current()))
        .map_err(|e| CliError::internal(e.to_string()))?;
    print_json(&json!({
        "db": path.display().to_string(),
        "skipped": report.skipped,
        "users": report.users,
        "follows": report.follows,
        "recipes": report.recipes,
        "plan_items": report.plan_items,
        "likes": report.likes,
    }), compact)
}
