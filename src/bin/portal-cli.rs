use std::path::PathBuf;

use clap::{Parser, Subcommand};

use member_portal::config::{load_config, ClientConfig};
use member_portal::lifecycle;
use member_portal::navigation::NavigationOutcome;
use member_portal::observability::logging;
use member_portal::routing::{Params, Router};

#[derive(Parser)]
#[command(name = "portal-cli")]
#[command(about = "Inspect the member portal route table and navigate against a backend", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List route names and their path templates
    Routes,
    /// Resolve a location such as /events/42?tab=info
    Resolve { location: String },
    /// Build the location for a named route
    Href {
        name: String,
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Navigate to a named route against the configured backend
    Navigate {
        name: String,
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    logging::init(&config.observability);

    match cli.command {
        Commands::Routes => {
            let router = Router::compile(&config.routes)?;
            for route in router.routes() {
                println!("{:<28} {}", route.name, route.pattern.template());
            }
        }
        Commands::Resolve { location } => {
            let router = Router::compile(&config.routes)?;
            match router.match_path(&location) {
                Some(route) => println!("{}", serde_json::to_string_pretty(&route)?),
                None => {
                    eprintln!("Error: no route matches '{location}'");
                    std::process::exit(1);
                }
            }
        }
        Commands::Href { name, params } => {
            let router = Router::compile(&config.routes)?;
            let params: Params = params.into_iter().collect();
            println!("{}", router.match_name(&name, &params)?.href());
        }
        Commands::Navigate { name, params } => {
            let portal = lifecycle::start(&config)?;
            let params: Params = params.into_iter().collect();
            let outcome = portal.navigator.navigate(&name, &params).await?;

            let state = portal.navigator.store().snapshot();
            println!("{}", serde_json::to_string_pretty(&state.summary())?);
            match outcome {
                NavigationOutcome::Committed(_) | NavigationOutcome::Superseded => {}
                NavigationOutcome::NotFound(location) => {
                    eprintln!("Error: no route matches '{location}'");
                    std::process::exit(1);
                }
                NavigationOutcome::Failed(error) => {
                    eprintln!("Error: {error}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
