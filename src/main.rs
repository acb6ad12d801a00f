//! Wayfinder CLI binary entry point.

use std::io;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wayfinder::cli::{run_loop, Cli, TerminalPrompt};
use wayfinder::config::AdvisorConfig;
use wayfinder::graph::TravelGraph;
use wayfinder::memory::InMemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wayfinder=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse_args();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let Some(hint) = hint_for(e.as_ref()) {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AdvisorConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config)?;
    config.acquire_api_key(&TerminalPrompt)?;

    let graph = TravelGraph::from_config(&config, Arc::new(InMemoryStore::new()))?;
    let thread_id = config.thread_id.clone();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_loop(stdin.lock(), &mut stdout, |text| {
        let graph = &graph;
        let thread_id = thread_id.as_str();
        async move { graph.invoke(thread_id, &text).await }
    })
    .await?;

    Ok(())
}

fn hint_for(error: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    use wayfinder::error::{RecoverySuggestion, WayfinderError};

    match error.downcast_ref::<WayfinderError>()?.recovery_suggestion() {
        RecoverySuggestion::CheckCredentials => {
            Some("Set GOOGLE_API_KEY (or GEMINI_API_KEY), or enter a key when prompted.")
        }
        RecoverySuggestion::CheckConfiguration => {
            Some("Check the command-line flags, WAYFINDER_* variables and the config file.")
        }
        _ => None,
    }
}
