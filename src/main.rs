//! Application entrypoint and state wiring.

use anyhow::{Context, Result};
use clap::Parser;

use hashchain_node::cli::{Cli, Commands, ServeArgs, VerifyArgs};
use hashchain_node::routes::{self, AppState, ValidateResp};
use hashchain_node::{import, is_block_valid, logging, Chain};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format);

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Verify(args) => verify(args),
        Commands::Demo => demo(),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let chain = Chain::new();
    tracing::info!(genesis_timestamp = chain.genesis().timestamp(), "chain initialised");

    let app = routes::router(AppState::new(chain));
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app).await.context("server error")
}

fn verify(args: VerifyArgs) -> Result<()> {
    let blocks = import::load_chain(&args.path)?;
    tracing::info!(path = %args.path.display(), blocks = blocks.len(), "loaded chain");

    let resp = ValidateResp::from_errors(hashchain_node::audit_raw_chain(&blocks));
    println!("{}", serde_json::to_string_pretty(&resp)?);
    if !resp.ok {
        anyhow::bail!("chain at {} is invalid", args.path.display());
    }
    Ok(())
}

fn demo() -> Result<()> {
    let mut chain = Chain::new();
    let genesis = chain.genesis().clone();
    let first = chain.create_new_block("first")?;
    let second = chain.create_new_block("second")?;

    println!("{}", is_block_valid(&first, &genesis));
    println!("{}", is_block_valid(&second, &first));
    println!("{}", serde_json::to_string_pretty(chain.blocks())?);
    Ok(())
}
