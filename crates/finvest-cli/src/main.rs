//! Command-line interface for the research workflow
//!
//! Runs a single query with `--query`, or an interactive prompt loop when
//! no query is given. API keys come from the environment.

use clap::Parser;
use finvest_agent::{FinvestConfig, WorkflowController};
use std::io::{BufRead, Write};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "finvest")]
#[command(about = "Financial research reports for supported Indian companies", long_about = None)]
struct Args {
    /// Query to analyze; starts an interactive session when omitted
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    finvest_utils::init_tracing();

    let args = Args::parse();
    let config = FinvestConfig::builder().with_env_keys().build()?;
    let controller = WorkflowController::from_config(config)?;

    if let Some(query) = args.query {
        info!("Running one-shot query");
        let report = controller.analyze(&query).await;
        println!("{report}");
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("\nEnter your query (or 'quit' to exit): ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();

        if matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        if query.is_empty() {
            println!("Please enter a valid query.");
            continue;
        }

        println!("\nAnalyzing: {query}");
        let report = controller.analyze(query).await;
        println!("\n{report}");
    }

    Ok(())
}
