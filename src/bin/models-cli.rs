use clap::{Parser, Subcommand};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "models-cli")]
#[command(about = "Client for the in-memory model server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all model keys
    List,
    /// Show one model
    Get { id: String },
    /// Create a model from a JSON document
    Create { json: String },
    /// Replace (or create) the model at a key
    Update { id: String, json: String },
    /// Delete a model
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::List => client.get(format!("{}/models", base)).send().await?,
        Commands::Get { id } => client.get(format!("{}/models/{}", base, id)).send().await?,
        Commands::Create { json } => {
            let body: Value = serde_json::from_str(&json)?;
            client.post(format!("{}/models", base)).json(&body).send().await?
        }
        Commands::Update { id, json } => {
            let body: Value = serde_json::from_str(&json)?;
            client.put(format!("{}/models/{}", base, id)).json(&body).send().await?
        }
        Commands::Delete { id } => client.delete(format!("{}/models/{}", base, id)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        return Ok(());
    }

    println!("{}", status);
    if let Some(location) = res.headers().get(LOCATION).and_then(|v| v.to_str().ok()) {
        println!("Location: {}", location);
    }

    let is_json = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        let json: Value = res.json().await?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        let text = res.text().await?;
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}
