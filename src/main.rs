//! Rust QA Judge CLI
//!
//! Answers questions with a generative model and evaluates the answers with
//! ROUGE/BLEU metrics and an LLM-as-a-Judge.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_qa_judge::{
    Config, Evaluator, Question,
    config::Environment,
    console::run_console,
    display::{Report, answer_text},
    llm::LlmClient,
    logging::init_tracing,
    server::{self, AppState},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Rust QA Judge - answer evaluation with ROUGE/BLEU and an LLM-as-a-Judge
#[derive(Parser)]
#[command(name = "qa-judge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level or filter directives (e.g. "warn", "rust_qa_judge=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask questions in an interactive loop
    Interactive,

    /// Answer and evaluate a single question
    Ask {
        /// The question to answer
        question: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Test the connection to every candidate model
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json)
        .context("Failed to initialize logging")?;

    match cli.command {
        Commands::Serve { host, port } => cmd_serve(host, port).await,
        Commands::Interactive => cmd_interactive().await,
        Commands::Ask { question, json } => cmd_ask(question, json).await,
        Commands::Test => cmd_test().await,
    }
}

async fn cmd_serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let evaluator = match Evaluator::connect(&config).await {
        Ok(evaluator) => Some(Arc::new(evaluator)),
        Err(e) => {
            error!(error = %e, "evaluator initialization failed");
            if config.server.environment == Environment::Development {
                eprintln!("Ensure LLM_API_KEY (or GEMINI_API_KEY) is set in your .env file");
            }
            None
        }
    };

    let state = AppState::new(evaluator, config.server.environment);
    server::serve(state, &config.server)
        .await
        .context("Server failed")?;

    Ok(())
}

async fn cmd_interactive() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let evaluator = match Evaluator::connect(&config).await {
        Ok(evaluator) => evaluator,
        Err(e) => {
            println!("Initialization failed: {}", e);
            return Ok(());
        }
    };

    run_console(&evaluator, std::io::stdin().lock(), std::io::stdout())
        .await
        .context("Console I/O failed")?;

    Ok(())
}

async fn cmd_ask(question: String, json: bool) -> Result<()> {
    let question = Question::new(&question).context("Invalid question")?;

    let config = Config::load().context("Failed to load configuration")?;
    let evaluator = Evaluator::connect(&config)
        .await
        .context("Failed to initialize evaluator")?;

    let start = Instant::now();
    let outcome = evaluator.ask(&question).await;
    let elapsed = start.elapsed();

    if json {
        let mut body = serde_json::json!({
            "question": outcome.question.as_str(),
            "answer": answer_text(&outcome.answer),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        match &outcome.evaluation {
            Some(evaluation) => body["evaluation"] = serde_json::to_value(evaluation)?,
            None => body["error"] = "Answer generation failed".into(),
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("Question: {}", outcome.question);
    println!("Using model: {}", evaluator.model());
    println!("\nAnswer:");
    println!("{}", "─".repeat(60));
    println!("{}", answer_text(&outcome.answer));
    println!("{}", "─".repeat(60));

    match &outcome.evaluation {
        Some(evaluation) => print!("{}", Report(evaluation)),
        None => println!("Answer generation failed; nothing to evaluate."),
    }
    println!("\nCompleted in {:.2?}", elapsed);

    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing LLM connection...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  Provider:  {}", config.llm.provider);
    println!("  API Base:  {}", config.llm.effective_api_base());
    println!("  Models:    {}", config.llm.models.join(", "));
    let key_prefix: String = config.llm.api_key.chars().take(8).collect();
    println!("  API Key:   {}...", key_prefix);
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm.clone());

    println!("Sending test requests...");
    let mut any_ok = false;
    for model in &config.llm.models {
        match client.test_connection(model).await {
            Ok(()) => {
                any_ok = true;
                println!("  {:<28} ok", model);
            }
            Err(e) => println!("  {:<28} failed: {}", model, e),
        }
    }

    println!();
    if any_ok {
        println!("Connection successful!");
    } else {
        println!("No model answered.");
    }

    Ok(())
}
