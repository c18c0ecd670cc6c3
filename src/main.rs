//! Application entry point for the Voice Flight Agent.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (default on first run, then saved).
//! 3. Open the flight database and seed it if empty.
//! 4. Build the query generator and the console voice.
//! 5. Create the tokio runtime (multi-thread, 2 workers).
//! 6. Drive the [`DialogueController`] until the user quits or stdin closes.

use std::sync::Arc;

use anyhow::Context;
use voice_flight_agent::{
    config::AppConfig,
    dialogue::{new_shared_state, DialogueContext, DialogueController, Stage, StepOutcome},
    llm::{ApiQueryGenerator, QueryGenerator},
    progress::progress_lines,
    results::render_table,
    store::{FlightStore, SqliteFlightStore},
    voice::{ConsoleVoice, VoiceIo},
};

// ---------------------------------------------------------------------------
// Driver loop
// ---------------------------------------------------------------------------

/// Ask the user to press Enter; `false` on `q` or closed input.
async fn confirm_action(console: &Arc<ConsoleVoice>, prompt: &'static str) -> bool {
    let console = Arc::clone(console);
    match tokio::task::spawn_blocking(move || console.read_line(prompt)).await {
        Ok(Ok(line)) => !matches!(line.trim().to_lowercase().as_str(), "q" | "quit" | "exit"),
        Ok(Err(e)) => {
            log::info!("voice: {e}");
            false
        }
        Err(e) => {
            log::error!("driver: input task failed: {e}");
            false
        }
    }
}

fn print_outcome(ctx: &DialogueContext) {
    println!();
    if let Some(query) = &ctx.query_text {
        println!("Generated query: {query}");
    }
    match ctx.stage {
        Stage::Error => {
            let message = ctx.last_error.as_deref().unwrap_or("An unknown error occurred.");
            println!("An error occurred: {message}");
        }
        _ => print!("{}", render_table(&ctx.result_rows)),
    }
    println!();
}

async fn drive(controller: DialogueController, console: Arc<ConsoleVoice>) {
    loop {
        let before = controller.snapshot();
        match controller.step().await {
            StepOutcome::Advanced(_) => {
                for line in progress_lines(&before, &controller.snapshot()) {
                    println!("  {line}");
                }
            }
            StepOutcome::Busy => tokio::task::yield_now().await,
            StepOutcome::AwaitingStart => {
                if !confirm_action(&console, "Press Enter to start booking (q to quit): ").await {
                    break;
                }
                controller.start();
            }
            StepOutcome::Finished(_) => {
                print_outcome(&controller.snapshot());
                if !confirm_action(&console, "Press Enter to start a new search (q to quit): ")
                    .await
                {
                    break;
                }
                controller.request_reset().await;
                controller.start();
            }
            StepOutcome::Disconnected(stage) => {
                log::info!("driver: input closed in {stage}, exiting");
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice Flight Agent starting up");

    // 2. Configuration
    let first_run = AppConfig::is_first_run();
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if first_run {
        match config.save() {
            Ok(()) => log::info!("Wrote default settings"),
            Err(e) => log::warn!("Could not write default settings: {e}"),
        }
    }

    // 3. Flight database
    let db_path = config.store.database_path();
    let store = SqliteFlightStore::from_config(&config.store)
        .with_context(|| format!("opening flight database {}", db_path.display()))?;
    let inserted = store
        .ensure_populated()
        .context("populating flight database")?;
    if inserted == 0 {
        log::info!("store: using existing data in {}", db_path.display());
    }
    let store: Arc<dyn FlightStore> = Arc::new(store);

    // 4. Collaborators
    if !config.llm.enabled {
        log::warn!("llm: query generation is disabled; searches will fail");
    }
    let generator: Arc<dyn QueryGenerator> = Arc::new(ApiQueryGenerator::from_config(&config.llm));
    let console = Arc::new(ConsoleVoice::from_config(&config.voice));
    let voice: Arc<dyn VoiceIo> = console.clone();

    // 5. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 6. Conversation
    let controller = DialogueController::new(new_shared_state(), voice, generator, store);
    rt.block_on(drive(controller, console));

    log::info!("Voice Flight Agent shutting down");
    Ok(())
}
