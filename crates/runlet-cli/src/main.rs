use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use runlet_core::executors::availability::probe;
use runlet_core::{ConfigLoader, ExecutionScheduler, ExecutorConfig, Language};
use std::path::PathBuf;
use std::sync::Arc;

mod input;
mod report;
mod signal;

#[derive(Parser, Debug)]
#[clap(name = "runlet", author, version, about = "Run code snippets under bounded concurrency and deadlines")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, help = "YAML configuration file")]
    config: Option<PathBuf>,

    #[clap(long, short, default_value = "warn")]
    log_level: String,

    #[clap(long, help = "Overall per-request deadline in seconds")]
    timeout: Option<u64>,

    #[clap(long, help = "Maximum number of concurrent executions")]
    max_workers: Option<usize>,

    #[clap(long, help = "Deadline applied around each interpreter process, in seconds")]
    runner_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute files (or stdin) and print one JSON result per line
    Run {
        #[clap(long, short, help = "Language tag (python3, nodejs); inferred from extension if omitted")]
        language: Option<String>,

        #[clap(help = "Source files; code is read from stdin when none are given")]
        files: Vec<PathBuf>,
    },
    /// Report which interpreter runtimes are available
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only results.
    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .target(env_logger::Target::Stderr)
        .init();

    let config = resolve_config(&cli).await?;

    match cli.command {
        Commands::Run { language, files } => run(config, language, files).await,
        Commands::Probe => run_probe(&config).await,
    }
}

async fn resolve_config(cli: &Cli) -> Result<ExecutorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from file: {}", path.display());
            ConfigLoader::from_file(path).await?
        }
        None => ConfigLoader::from_env()?,
    };

    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    if let Some(max_workers) = cli.max_workers {
        config.max_workers = max_workers;
    }
    if let Some(runner_timeout) = cli.runner_timeout {
        config.runner_timeout = runner_timeout;
    }
    config.validate()?;
    Ok(config)
}

async fn run(config: ExecutorConfig, language: Option<String>, files: Vec<PathBuf>) -> Result<()> {
    let requests = if files.is_empty() {
        vec![input::request_from_stdin(language.as_deref()).await?]
    } else {
        input::requests_from_files(&files, language.as_deref()).await?
    };

    let scheduler = Arc::new(ExecutionScheduler::new(config).await?);

    let results = tokio::select! {
        results = report::execute_all(scheduler.clone(), requests) => results,
        _ = signal::shutdown_signal() => {
            eprintln!("Interrupted, waiting for running executions to finish...");
            scheduler.shutdown().await;
            std::process::exit(130);
        }
    };

    let report = report::render(&results)?;
    for line in &report.lines {
        println!("{}", line);
    }

    if report.exit_code != 0 {
        std::process::exit(report.exit_code);
    }
    Ok(())
}

async fn run_probe(config: &ExecutorConfig) -> Result<()> {
    let mut report = serde_json::Map::new();
    for language in Language::ALL {
        let binary = config.interpreters.binary_for(language);
        let available = probe(binary).await;
        report.insert(
            language.tag().to_string(),
            serde_json::json!({ "binary": binary, "available": available }),
        );
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
