//! Client shell: a minimal screen showing the configured API endpoint and
//! whether the backend behind it is reachable.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

/// What-to-eat client shell.
#[derive(Debug, Parser)]
#[command(name = "what-to-eat-client", about = "Show the configured API endpoint")]
struct Args {
    /// Base URL of the backend API.
    #[arg(long, env = "API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Skip the liveness probe and only print the configuration.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    println!("what to eat");
    println!("-----------");
    println!("API URL: {}", args.api_url);

    if args.offline {
        return ExitCode::SUCCESS;
    }

    match probe(&args.api_url).await {
        Ok(status) if status.is_success() => {
            println!("backend: reachable ({status})");
            ExitCode::SUCCESS
        }
        Ok(status) => {
            println!("backend: responded with {status}");
            ExitCode::FAILURE
        }
        Err(error) => {
            println!("backend: unreachable ({error})");
            ExitCode::FAILURE
        }
    }
}

async fn probe(api_url: &str) -> Result<reqwest::StatusCode, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let url = format!("{}/health/live", api_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    Ok(response.status())
}
