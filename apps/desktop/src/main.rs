use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, resolve_base_url},
    steps::StepSimulator,
    ClientSettings, HttpQueryService, LifecycleState, RequestController,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod session;

use render::{render_health, render_stage, render_state};

#[derive(Parser, Debug)]
#[command(name = "ragq", about = "Ask questions against the contract compliance RAG service")]
struct Args {
    /// Query service origin, e.g. http://127.0.0.1:8000
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    step_interval_ms: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask one question and print the result.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Probe the service health endpoint.
    Health,
    /// Interactive session (the default).
    Repl,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = apply_args(load_settings()?, &args)?;
    tracing::debug!(base_url = %settings.base_url, timeout_secs = settings.timeout.as_secs(), "settings resolved");

    let service = Arc::new(HttpQueryService::new(settings.base_url.clone()));
    match args.command.unwrap_or(Command::Repl) {
        Command::Ask { question } => ask(service, &settings, &question.join(" ")).await,
        Command::Health => health(&service).await,
        Command::Repl => {
            session::run(service, &settings).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_args(mut settings: ClientSettings, args: &Args) -> Result<ClientSettings> {
    if let Some(base_url) = &args.base_url {
        settings.base_url = resolve_base_url(base_url)?;
    }
    if let Some(secs) = args.timeout_secs {
        settings.timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = args.step_interval_ms {
        settings.step_interval = Duration::from_millis(ms);
    }
    Ok(settings)
}

async fn ask(
    service: Arc<HttpQueryService>,
    settings: &ClientSettings,
    question: &str,
) -> Result<ExitCode> {
    let controller = RequestController::new(service, settings);
    let simulator = StepSimulator::spawn(controller.subscribe(), settings.step_interval);
    let mut states = controller.subscribe();
    let mut stages = simulator.subscribe();

    if !controller.submit(question) {
        bail!("question must not be blank");
    }

    loop {
        tokio::select! {
            changed = states.changed() => {
                changed?;
                let state = states.borrow_and_update().clone();
                match state {
                    LifecycleState::Succeeded(_) => {
                        println!("{}", render_state(&state));
                        return Ok(ExitCode::SUCCESS);
                    }
                    LifecycleState::Failed(_) => {
                        println!("{}", render_state(&state));
                        return Ok(ExitCode::FAILURE);
                    }
                    LifecycleState::Idle | LifecycleState::Pending { .. } => {}
                }
            }
            Ok(()) = stages.changed() => {
                let index = *stages.borrow_and_update();
                if controller.state().is_pending() {
                    eprintln!("{}", render_stage(index));
                }
            }
            _ = tokio::signal::ctrl_c() => controller.cancel(),
        }
    }
}

async fn health(service: &HttpQueryService) -> Result<ExitCode> {
    match service.health().await {
        Ok(health) => {
            println!("{}", render_health(&health));
            Ok(if health.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(err) => {
            eprintln!("Health check failed: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
