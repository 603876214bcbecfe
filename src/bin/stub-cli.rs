use std::collections::HashMap;

use clap::{Parser, Subcommand};

use stub_server::RouteSpec;

#[derive(Parser)]
#[command(name = "stub-cli")]
#[command(about = "Control-plane client for a running stub server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8008")]
    url: String,

    #[arg(long, default_value = "/_control/handlers")]
    control_path: String,

    #[arg(long, default_value = "/readyz")]
    readiness_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the readiness endpoint
    Ready,
    /// Register a canned-response route
    Register {
        #[arg(short, long)]
        method: String,

        #[arg(short, long)]
        path: String,

        #[arg(short, long)]
        status: Option<u16>,

        #[arg(short, long, default_value = "")]
        body: String,

        /// Response header as name=value (repeatable)
        #[arg(long = "header", value_parser = parse_pair)]
        headers: Vec<(String, String)>,

        /// Required query parameter as name=value (repeatable)
        #[arg(long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Ready => {
            let res = client.get(format!("{}{}", base, cli.readiness_path)).send().await?;
            print_response(res).await?;
        }
        Commands::Register {
            method,
            path,
            status,
            body,
            headers,
            query,
        } => {
            let spec = RouteSpec {
                method,
                path,
                query: query.into_iter().collect::<HashMap<_, _>>(),
                status,
                body,
                headers: headers.into_iter().collect::<HashMap<_, _>>(),
            };
            let res = client
                .post(format!("{}{}", base, cli.control_path))
                .json(&spec)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if status.is_success() {
        println!("{} {}", status, text);
    } else {
        eprintln!("Error: stub server returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }
    Ok(())
}
