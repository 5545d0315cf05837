use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "location-cli")]
#[command(about = "Query and feed a running location capture service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a location
    Capture {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        accuracy: Option<f64>,
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Show today's records, or one day's with --date YYYY-MM-DD
    Logs {
        #[arg(long)]
        date: Option<String>,
    },
    /// Show records from every day
    All,
    /// List days that have records
    Days,
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Capture { lat, lon, accuracy, timestamp } => {
            let mut query = vec![("lat", lat.to_string()), ("lon", lon.to_string())];
            if let Some(accuracy) = accuracy {
                query.push(("accuracy", accuracy.to_string()));
            }
            if let Some(timestamp) = timestamp {
                query.push(("timestamp", timestamp));
            }
            client.get(format!("{}/capture", base)).query(&query)
        }
        Commands::Logs { date } => {
            let request = client.get(format!("{}/logs", base));
            match date {
                Some(date) => request.query(&[("date", date)]),
                None => request,
            }
        }
        Commands::All => client.get(format!("{}/logs/all", base)),
        Commands::Days => client.get(format!("{}/logs/days", base)),
        Commands::Health => client.get(format!("{}/health", base)),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => {
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Ok(json) => {
            eprintln!("Error: service returned status {}", status);
            eprintln!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: service returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}
