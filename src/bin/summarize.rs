//! One-shot command line runner: prompt for a URL, print its summary, exit.

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;
use url_summarizer::{config::Config, summarizer::Summarizer};

#[tokio::main]
async fn main() {
    // Keep diagnostics off the interactive transcript unless asked for.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    // Errors are printed, not signaled through the exit status.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let summarizer = Summarizer::new(&config);

    print!("Enter URL to summarize: ");
    let _ = io::stdout().flush();

    let mut url = String::new();
    if io::stdin().lock().read_line(&mut url).is_err() {
        println!("Error: failed to read from standard input");
        return;
    }
    let url = url.trim();

    // No URL validation on this path: the input goes to the agent as given.
    println!("Processing...");
    let summary = summarizer.summarize_text(url).await;

    println!("\nSummary:\n{}", summary);
}
