//! CoLore terminal entry point.

use std::error::Error;
use std::sync::Arc;

use colore_core::clock::SystemClock;
use colore_core::generation::TextGenerator;
use colore_core::rng::SystemRng;
use colore_core::storage::Storage;
use colore_game::domain::store::GameStore;
use colore_game::narrator::{CannedNarrator, OllamaNarrator};
use colore_narration::NarrationController;
use colore_play::command::Command;
use colore_play::config::PlayConfig;
use colore_play::speech::ProcessSynthesizer;
use colore_play::storage::FileStorage;
use colore_play::table::{Response, Table};
use colore_translation::application::fallback::FallbackTranslator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they never interleave with the story on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PlayConfig::from_env();
    tracing::info!(?config, "Starting CoLore");

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.state_dir));
    let store = GameStore::new(
        Arc::new(SystemClock),
        Arc::clone(&storage),
        config.system_prefers_dark,
    );

    let synthesizer = Arc::new(ProcessSynthesizer::new(config.speech_command.as_deref()));
    let generator: Arc<dyn TextGenerator> = if config.offline {
        Arc::new(CannedNarrator::new(Box::new(SystemRng::new())))
    } else {
        Arc::new(OllamaNarrator::new(&config.ollama_base_url, &config.ollama_model))
    };

    let mut table = Table::new(
        store,
        NarrationController::new(synthesizer),
        generator,
        Arc::new(FallbackTranslator::public()),
        storage,
    )
    .with_narration_delay(config.narration_delay);

    println!("Welcome to CoLore. Add players with /add NAME, or type /help.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                };
                match table.execute(command).await {
                    Ok(Response::Quit) => break,
                    Ok(Response::Info(text)) => println!("{text}"),
                    Ok(Response::Silent) => {}
                    Err(e) => eprintln!("{e}"),
                }
            }
            event = table.next_event() => {
                if let Some(text) = table.handle_event(event).await {
                    println!("{text}");
                }
            }
        }
    }

    Ok(())
}
