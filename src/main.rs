//! dservice-cli
//!
//! Resolves a domain's `dservice` record and talks to the discovered
//! backend. Discovery and connectivity failures are rendered on stderr with
//! a hint on how to recover.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::Method;

use dservice_client::blockchain::{BlockchainError, LazyEnsResolver};
use dservice_client::config::{load_config, ClientConfig};
use dservice_client::observability::{logging, metrics};
use dservice_client::{ChainContext, DServiceClient, DiscoveryError, FetchError, RequestOptions};

#[derive(Parser)]
#[command(name = "dservice-cli")]
#[command(about = "Discover and query a dservice backend", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Domain to resolve (overrides the config file).
    #[arg(short, long)]
    domain: Option<String>,

    /// Static endpoint; skips on-chain discovery.
    #[arg(long)]
    api_endpoint: Option<String>,

    /// JSON-RPC URL used for ENS lookups.
    #[arg(long)]
    rpc_url: Option<String>,

    #[arg(long)]
    chain_id: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the finalized endpoint set
    Endpoints,
    /// Fetch a path and print the response
    Get {
        path: String,
        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: Method,
        /// Request body
        #[arg(long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(domain = %config.domain, "dservice-cli starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render_failure(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    if let Some(domain) = &cli.domain {
        config.domain = domain.clone();
    }
    if let Some(endpoint) = &cli.api_endpoint {
        config.api_endpoint = Some(endpoint.clone());
    }
    if let Some(rpc_url) = &cli.rpc_url {
        config.ens.rpc_url = rpc_url.clone();
    }
    if let Some(chain_id) = cli.chain_id {
        config.ens.chain_id = chain_id;
    }

    // Flags may have changed validated fields.
    dservice_client::config::validation::validate_config(&config)
        .map_err(dservice_client::config::ConfigError::Validation)?;
    Ok(config)
}

async fn run(command: Commands, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = DServiceClient::from_config(config)?;
    // Not connected until discovery consults it; a static endpoint never does.
    let resolver = LazyEnsResolver::new(config.ens.clone());

    let mut context = ChainContext::default().with_chain_id(config.ens.chain_id);
    if let Some(resolver_address) = &config.ens.resolver_override {
        context = context.with_resolver(resolver_address.parse()?);
    }

    let endpoints = client.init(&resolver, context).await?;

    match command {
        Commands::Endpoints => {
            for endpoint in endpoints.iter() {
                println!("{}", endpoint);
            }
        }
        Commands::Get { path, method, data } => {
            let mut options = RequestOptions::method(method);
            if let Some(body) = data {
                options = options.with_body(body);
            }

            let response = client.fetch(&path, options).await?;
            let status = response.status();
            let text = response.text().await?;

            eprintln!("{}", status);
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
                Err(_) => println!("{}", text),
            }
        }
    }

    Ok(())
}

fn render_failure(error: &(dyn std::error::Error + 'static)) {
    eprintln!("error: {}", error);

    let hint = if let Some(e) = error.downcast_ref::<DiscoveryError>() {
        Some(discovery_hint(e))
    } else if let Some(e) = error.downcast_ref::<FetchError>() {
        match e {
            FetchError::Discovery(d) => Some(discovery_hint(d)),
            FetchError::AllEndpointsFailed { .. } | FetchError::DeadlineExceeded { .. } => Some(
                "every backend was unreachable; retry later or pass --api-endpoint to use a known-good server",
            ),
            _ => None,
        }
    } else {
        None
    };

    if let Some(hint) = hint {
        eprintln!("hint: {}", hint);
    }
}

fn discovery_hint(error: &DiscoveryError) -> &'static str {
    match error {
        DiscoveryError::NoResolver { .. } => {
            "the domain has no resolver on this chain; check --chain-id or pass --api-endpoint"
        }
        DiscoveryError::EmptyRecord { .. } | DiscoveryError::NoEndpoints { .. } => {
            "publish newline-separated URLs in the domain's `dservice` text record, or pass --api-endpoint"
        }
        DiscoveryError::Interrupted { .. } => "discovery was interrupted; run the command again",
        DiscoveryError::Lookup(BlockchainError::ChainMismatch { .. }) => {
            "the RPC node serves a different chain; make --rpc-url and --chain-id agree"
        }
        DiscoveryError::Lookup(_) => "the name lookup failed; check --rpc-url or pass --api-endpoint",
    }
}
