use anyhow::{Context, Result};
use chunkload::{
    config::{self, LoaderConfig},
    process::RuleProfile,
    report::Notice,
    sink::MySqlSink,
    Loader,
};
use clap::Parser;
use figment::providers::Serialized;
use serde::Serialize;
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Load a CSV file into a MySQL table, chunk by chunk.
#[derive(Debug, Parser)]
#[command(name = "chunkload", version)]
struct Cli {
    /// TOML config file (defaults to ./chunkload.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

/// Command-line values layered over the config file and environment.
#[derive(Debug, clap::Args, Serialize)]
struct Overrides {
    /// CSV file to load
    #[arg(long = "source")]
    #[serde(skip_serializing_if = "Option::is_none")]
    source_path: Option<PathBuf>,

    /// Target table
    #[arg(long = "table")]
    #[serde(skip_serializing_if = "Option::is_none")]
    table_name: Option<String>,

    /// Records per chunk
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk_size: Option<usize>,

    /// Built-in column rule profile
    #[arg(long, value_parser = parse_profile)]
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<RuleProfile>,

    /// Skip the final row count
    #[arg(long = "no-verify", action = clap::ArgAction::SetFalse)]
    #[serde(skip)]
    verify: bool,
}

fn init_logging() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("initializing logging")
}

fn parse_profile(s: &str) -> std::result::Result<RuleProfile, String> {
    match s {
        "audit" => Ok(RuleProfile::Audit),
        "passthrough" => Ok(RuleProfile::Passthrough),
        other => Err(format!("unknown profile {:?} (audit, passthrough)", other)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    init_logging()?;

    let cli = Cli::parse();

    // ─── 2) layered config: defaults → file → env → flags ───────────
    let mut figment = LoaderConfig::figment(cli.config.as_deref())
        .merge(Serialized::defaults(&cli.overrides));
    if !cli.overrides.verify {
        figment = figment.merge(Serialized::default("verify_count", false));
    }
    let config = match config::require_file(cli.config.as_deref())
        .and_then(|_| LoaderConfig::from_figment(&figment))
    {
        Ok(c) => c,
        Err(e) => {
            error!("invalid configuration: {}", e);
            println!("{}", Notice::ConfigError(e.to_string()));
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(
        source = %config.source_path.display(),
        table = %config.table_name,
        chunk_size = config.chunk_size,
        profile = ?config.profile,
        "startup"
    );

    // ─── 3) run ──────────────────────────────────────────────────────
    let sink = match MySqlSink::new(&config.connection_string, &config.table_name) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            println!("{}", Notice::from_error(&e, &config.source_path));
            return Ok(ExitCode::FAILURE);
        }
    };
    let mut loader = Loader::new(config, sink);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = loader.run(&mut out).await;
    out.flush().context("flushing notices to stdout")?;

    info!(rows = report.rows, chunks = report.chunks, "all done");
    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
