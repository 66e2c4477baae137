use clap::{Parser, Subcommand};
use serde_json::Value;

use voteboard::http::page;

#[derive(Parser)]
#[command(name = "voteboard-cli")]
#[command(about = "Management CLI for the voteboard service", long_about = None)]
struct Cli {
    /// Base URL of the voting surface.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Base URL of the ops endpoint.
    #[arg(short, long, default_value = "http://localhost:9090")]
    ops_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current tallies
    Tallies,
    /// Cast a vote for the given button label
    Vote { button: String },
    /// Reset both tallies to zero
    Reset,
    /// Check service health and readiness
    Status,
    /// Dump the raw Prometheus metrics
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Tallies => {
            let res = client.get(&cli.url).send().await?;
            print_tallies(res).await?;
        }
        Commands::Vote { button } => {
            let res = client
                .post(&cli.url)
                .form(&[("vote", button.as_str())])
                .send()
                .await?;
            print_tallies(res).await?;
        }
        Commands::Reset => {
            let res = client
                .post(&cli.url)
                .form(&[("vote", "reset")])
                .send()
                .await?;
            print_tallies(res).await?;
        }
        Commands::Status => {
            let res = client
                .get(format!("{}/healthz", cli.ops_url))
                .send()
                .await?;
            print_json(res).await?;
            let res = client
                .get(format!("{}/readyz", cli.ops_url))
                .send()
                .await?;
            print_json(res).await?;
        }
        Commands::Metrics => {
            let res = client
                .get(format!("{}/metrics", cli.ops_url))
                .send()
                .await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: ops endpoint returned status {}", status);
                return Ok(());
            }
            println!("{}", res.text().await?);
        }
    }

    Ok(())
}

async fn print_tallies(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let html = res.text().await?;
    match page::extract_tallies(&html) {
        Some((value1, value2)) => {
            println!("tally1: {}", value1);
            println!("tally2: {}", value2);
        }
        None => eprintln!("Error: could not find tallies in the response page"),
    }
    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    println!("{} {}", status.as_u16(), serde_json::to_string_pretty(&json)?);
    Ok(())
}
