//! Console session runner for the coplay turn protocol.
//!
//! Wires the pieces together: loads configuration from the environment,
//! renders the system instruction from templates, builds the starting
//! world for the chosen variant, and drives the turn engine from a
//! console loop. Ava's turns come from an LLM backend over HTTP; Ben's
//! come from stdin.
//!
//! # Architecture
//!
//! ```text
//! stdin --> Turn Engine --> LLM Backend --> Validator --> World --> stdout
//! ```
//!
//! Every session is one process; all state dies with it.

mod config;
mod console;
mod error;
mod llm;
mod prompt;

use coplay_core::{EngineConfig, EngineError, TurnEngine};
use coplay_types::HumanIntent;
use coplay_world::starting;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{RunnerConfig, Variant};
use crate::llm::LlmBackend;
use crate::prompt::PromptEngine;

/// Application entry point.
///
/// Initializes logging, loads configuration, checks the LLM backend,
/// then runs the session loop until the engine ends or Ben quits.
///
/// # Errors
///
/// Returns an error if initialization fails; session-level failures
/// are logged and end the loop instead.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("coplay-runner starting");

    let config = RunnerConfig::from_env()?;
    info!(
        variant = ?config.variant,
        templates_dir = config.templates_dir,
        request_timeout_ms = config.request_timeout.as_millis(),
        "configuration loaded"
    );

    let prompts = PromptEngine::new(&config.templates_dir)?;
    info!(templates_dir = config.templates_dir, "prompt templates loaded");

    let backend = LlmBackend::from_config(&config.backend, config.request_timeout)?;
    backend.health_check().await?;
    info!(
        backend = backend.name(),
        model = config.backend.model,
        "LLM backend ready"
    );

    // Build the starting world and the matching engine defaults.
    let (world, mut engine_config) = match config.variant {
        Variant::Grid => {
            let world = if config.with_human {
                starting::coplay_grid(config.grid_width, config.grid_height)
            } else {
                starting::solo_grid(config.grid_width, config.grid_height)
            };
            (world, EngineConfig::grid())
        }
        Variant::Lifesim => (starting::lifesim_world(), EngineConfig::graph()),
    };
    if let Some(max_turns) = config.max_turns {
        engine_config = engine_config.with_max_turns(max_turns);
    }
    if let Some(cap) = config.max_retries {
        engine_config = engine_config.with_retry_cap(cap);
    }

    let context = serde_json::json!({
        "mode": match config.variant {
            Variant::Grid => "grid",
            Variant::Lifesim => "graph",
        },
        "width": config.grid_width,
        "height": config.grid_height,
        "with_human": config.with_human && config.variant == Variant::Grid,
        "identity": world.identity(),
    });
    let system_instruction = prompts.system_prompt(&context)?;

    let mut engine = TurnEngine::new(backend, world, engine_config, system_instruction);
    info!(max_turns = engine_config.max_turns, "session starting");
    println!("Session started. Empty line passes, q quits, free text hints Ava.");

    // One loop iteration per round: Ben first, then Ava.
    while !engine.is_ended() {
        let human = match console::read_intent(config.variant)? {
            Some(HumanIntent::Quit) => {
                engine.quit();
                break;
            }
            Some(HumanIntent::Hint(text)) => {
                engine.hint(&text);
                None
            }
            Some(HumanIntent::Act(intent)) => Some(intent),
            None => None,
        };

        match engine.step(human).await {
            Ok(report) => console::render(&report, &engine.snapshot()),
            Err(EngineError::RetryBudgetExhausted { attempts }) => {
                warn!(attempts, "no valid turn this round, continuing");
            }
            Err(e) => {
                error!(error = %e, "session aborted");
                break;
            }
        }
    }

    info!(turns = engine.turns_taken(), "session over");
    Ok(())
}
