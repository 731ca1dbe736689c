//! Text Studio - text generation service that always answers
//!
//! Runs the HTTP server by default, or a single generation from the command line.

use anyhow::Context;
use std::env;
use std::process;
use text_studio::{
    server::{self, AppState},
    Generation, GenerationOrchestrator, GenerationRequest, RequestedProvider, ServiceConfig,
    StudioError,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the library
    if let Err(e) = text_studio::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("--help") | Some("-h") | Some("help") => {
            print_help();
            Ok(())
        }
        Some("--version") | Some("-V") => {
            println!("text-studio {}", text_studio::VERSION);
            Ok(())
        }
        None | Some("serve") => run_server().await,
        Some("generate") => {
            if let Err(e) = run_generate(&args[1..]).await {
                match e.downcast_ref::<StudioError>() {
                    Some(err) => eprintln!("{}", err.user_message()),
                    None => eprintln!("❌ Error: {:#}", e),
                }
                process::exit(1);
            }
            Ok(())
        }
        Some(other) => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("Run 'text-studio --help' for usage.");
            process::exit(2);
        }
    }
}

/// Serve the HTTP API until ctrl-c
async fn run_server() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let orchestrator = GenerationOrchestrator::from_config(&config)?;

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(providers = ?orchestrator.ready_providers(), "Providers ready");
    server::serve(listener, AppState::new(orchestrator), shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Could not listen for ctrl-c; shutting down");
    }
}

/// Run the chain once and print the text
async fn run_generate(args: &[String]) -> anyhow::Result<()> {
    let mut provider = RequestedProvider::default();
    let mut max_length = 100;
    let mut temperature = 0.7;
    let mut words = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--provider" | "-p" => {
                let value = iter.next().context("--provider needs a value")?;
                provider = serde_json::from_value(serde_json::Value::String(value.clone()))
                    .context("invalid provider")?;
            }
            "--max-length" | "-n" => {
                let value = iter.next().context("--max-length needs a value")?;
                max_length = value.parse().context("invalid --max-length")?;
            }
            "--temperature" | "-t" => {
                let value = iter.next().context("--temperature needs a value")?;
                temperature = value.parse().context("invalid --temperature")?;
            }
            _ => words.push(arg.as_str()),
        }
    }

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let orchestrator = GenerationOrchestrator::from_config(&config)?;
    let request = GenerationRequest::new(words.join(" "), max_length, temperature, provider)?;

    match orchestrator.generate(&request).await {
        Generation::Completed(report) => {
            println!("{}", report.result.generated_text);
            if let Some(notice) = &report.notice {
                eprintln!("⚠️  {}", notice.message);
            }
            eprintln!("Answered by {} ({})", report.result.model_info.name, report.provider());
        }
        Generation::DeferToLocal => {
            println!("The application will use the local model as requested.");
        }
    }
    Ok(())
}

/// Print help information
fn print_help() {
    println!("Text Studio - text generation that always answers");
    println!("═══════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    text-studio [serve]");
    println!("    text-studio generate [OPTIONS] <PROMPT>...");
    println!();
    println!("OPTIONS (generate):");
    println!("    -p, --provider <NAME>      openai, huggingface or local (default: huggingface)");
    println!("    -n, --max-length <TOKENS>  Token budget (default: 100)");
    println!("    -t, --temperature <T>      Sampling temperature in [0, 1] (default: 0.7)");
    println!();
    println!("ENDPOINTS:");
    println!("    POST /api/text-generation  Generate text");
    println!("    POST /api/openai           Same, with the OpenAI provider forced");
    println!("    GET  /api/health           Status, ready providers and counters");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    PORT                   Listen port (default: 3001)");
    println!("    BIND_ADDRESS           Listen address (default: 0.0.0.0)");
    println!("    OPENAI_API_KEY         OpenAI API key (sk-...)");
    println!("    OPENAI_MODEL           OpenAI model (default: gpt-3.5-turbo)");
    println!("    OPENAI_BASE_URL        OpenAI-compatible endpoint");
    println!("    HUGGINGFACE_API_KEY    Hugging Face token (optional)");
    println!("    HUGGINGFACE_MODEL      Default inference model (default: gpt2)");
    println!("    HUGGINGFACE_BASE_URL   Inference endpoint");
    println!("    HUGGINGFACE_ENABLED    Set to false to skip hosted inference");
    println!("    DICTIONARY_BASE_URL    Dictionary endpoint");
    println!("    DICTIONARY_ENABLED     Set to false to skip dictionary lookups");
    println!("    PROVIDER_TIMEOUT_SECS  Per-provider timeout (default: 10)");
    println!("    TEMPLATE_DELAY_MS      Pause before template output (default: 0)");
    println!("    TEMPLATE_SEED          Seed for reproducible template output");
    println!("    RUST_LOG               Log filter (default: info)");
}
