//! Interactive loop: stdin commands in, rendered lifecycle states out.

use std::sync::Arc;

use anyhow::{Context, Result};
use client_core::{steps::StepSimulator, ClientSettings, HttpQueryService, RequestController};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

use crate::{
    commands::{parse_command, SessionCommand, HELP_TEXT},
    render::{render_health, render_stage, render_state, render_welcome},
};

pub async fn run(service: Arc<HttpQueryService>, settings: &ClientSettings) -> Result<()> {
    let controller = RequestController::new(service.clone(), settings);
    let simulator = StepSimulator::spawn(controller.subscribe(), settings.step_interval);
    let mut states = controller.subscribe();
    let mut stages = simulator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Health checks run off-loop so a slow endpoint never blocks input.
    let (health_tx, mut health_rx) = mpsc::channel(1);
    let mut health_running = false;

    println!("{}", render_welcome());
    println!("Connected to {}", service.base_url());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    controller.clear();
                    break;
                };
                let Some(command) = parse_command(&line) else {
                    continue;
                };
                debug!(command = command.name(), "session: command received");

                match command {
                    SessionCommand::Submit(text) => {
                        if !controller.submit(&text) {
                            println!("A question is already pending. Use :cancel or :replace <question>.");
                        }
                    }
                    SessionCommand::Replace(text) => {
                        if !controller.supersede(&text) {
                            println!("Usage: :replace <question>");
                        }
                    }
                    SessionCommand::Cancel => {
                        if controller.is_in_flight() {
                            controller.cancel();
                        } else {
                            println!("Nothing to cancel.");
                        }
                    }
                    SessionCommand::Clear => controller.clear(),
                    SessionCommand::Health if health_running => {
                        println!("A health check is already running.");
                    }
                    SessionCommand::Health => {
                        health_running = true;
                        let service = Arc::clone(&service);
                        let health_tx = health_tx.clone();
                        tokio::spawn(async move {
                            let _ = health_tx.send(service.health().await).await;
                        });
                    }
                    SessionCommand::Help => println!("{HELP_TEXT}"),
                    SessionCommand::Quit => {
                        controller.clear();
                        break;
                    }
                    SessionCommand::Unknown(raw) => {
                        println!("Unknown command '{raw}'. Type :help for commands.");
                    }
                }
            }
            Some(outcome) = health_rx.recv() => {
                health_running = false;
                match outcome {
                    Ok(health) => println!("{}", render_health(&health)),
                    Err(err) => println!("Health check failed: {err}"),
                }
            }
            Ok(()) = states.changed() => {
                let state = states.borrow_and_update().clone();
                println!("{}", render_state(&state));
            }
            Ok(()) = stages.changed() => {
                let index = *stages.borrow_and_update();
                if controller.state().is_pending() {
                    println!("{}", render_stage(index));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if controller.is_in_flight() {
                    controller.cancel();
                } else {
                    break;
                }
            }
        }
    }

    Ok(())
}
