use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pseudo712::{config, server, App, VerifyRequest};

#[derive(Debug, Parser)]
#[command(
    name = "pseudo712",
    version,
    about = "pseudo712: contract calldata to EIP-712 typed data for clear signing"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Listen address (e.g. 127.0.0.1:3000)
        #[arg(long)]
        listen: Option<String>,
    },
    /// Convert a single call and print the typed-data document
    Convert {
        /// Address of the called contract
        #[arg(long)]
        contract: String,

        /// Hex-encoded calldata, selector included
        #[arg(long)]
        calldata: String,

        /// ABI JSON file; fetched from the configured resolver when omitted
        #[arg(long)]
        abi: Option<PathBuf>,

        /// Domain chain id (overrides config)
        #[arg(long)]
        chain_id: Option<u64>,

        /// Also print the EIP-712 signing digest
        #[arg(long)]
        digest: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load();
    let app = App::from_config(&config)?;

    match args.command {
        Command::Serve { listen } => {
            let listen = listen.unwrap_or_else(|| config.server.listen.clone());
            server::serve(Arc::new(app), &listen).await
        }
        Command::Convert {
            contract,
            calldata,
            abi,
            chain_id,
            digest,
        } => {
            let abi = abi.map(|path| read_abi(&path)).transpose()?;
            let request = VerifyRequest {
                contract_address: Some(contract),
                transaction_data: Some(calldata),
                abi,
                chain_id,
                ..Default::default()
            };

            let document = app.verify_transaction(request).await?;
            println!("{}", document.to_json_pretty()?);
            if digest {
                println!("digest: {}", document.signing_hash()?);
            }
            Ok(())
        }
    }
}

fn read_abi(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ABI file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("ABI file {} is not valid JSON", path.display()))
}
