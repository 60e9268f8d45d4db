//! Volume booster CLI
//!
//! Command-line interface for the BNB Chain token volume booster.

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use volume_booster::bundler::{load_bundle, TransactionBundler};
use volume_booster::{
    report, Config, Error, KeyMaterial, Result, SessionHandle, TokenLauncher, TokenMetadata,
    VenueRouter, VolumeSession, WalletPool,
};

#[derive(Parser)]
#[command(name = "volume-bot")]
#[command(about = "Token volume booster for four.meme and PancakeSwap")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file (defaults to environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show chain, wallets with balances and configuration
    Status,

    /// Run the randomized buy/sell loop for a token
    Volume {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Stop after this many minutes (runs until Ctrl+C if omitted)
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Launch a token on the four.meme bonding curve
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        symbol: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        logo_url: Option<String>,

        #[arg(long)]
        twitter: Option<String>,

        #[arg(long)]
        telegram: Option<String>,

        #[arg(long)]
        website: Option<String>,

        /// Index of the creating wallet in PRIVATE_KEYS
        #[arg(long, default_value_t = 0)]
        wallet: usize,
    },

    /// Execute a JSON bundle of transactions in order from one wallet
    Bundle {
        /// JSON array of {to, data, value, gasLimit}
        #[arg(short, long)]
        file: PathBuf,

        /// Validate and estimate gas only
        #[arg(long)]
        dry_run: bool,

        /// Index of the sending wallet in PRIVATE_KEYS
        #[arg(long, default_value_t = 0)]
        wallet: usize,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Status => run_status(&config).await,
        Commands::Volume { token, duration } => run_volume(&config, &token, duration).await,
        Commands::Create {
            name,
            symbol,
            description,
            logo_url,
            twitter,
            telegram,
            website,
            wallet,
        } => {
            let metadata = TokenMetadata {
                name,
                symbol,
                description,
                logo_url,
                twitter,
                telegram,
                website,
            };
            run_create(&config, &metadata, wallet).await
        }
        Commands::Bundle {
            file,
            dry_run,
            wallet,
        } => run_bundle(&config, &file, dry_run, wallet).await,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_wallets(config: &Config) -> Result<WalletPool> {
    let keys = KeyMaterial::from_env()?;
    let pool = WalletPool::from_keys(&keys, &config.rpc()?)?;
    tracing::info!(wallets = pool.len(), "Wallet pool ready");
    Ok(pool)
}

async fn run_status(config: &Config) -> Result<()> {
    let rpc = config.rpc()?;
    let wallets = load_wallets(config)?;
    report::print_status(config, &rpc, &wallets).await;
    Ok(())
}

async fn run_volume(config: &Config, token: &str, duration_minutes: Option<u64>) -> Result<()> {
    let token: Address = token
        .trim()
        .parse()
        .map_err(|e| Error::InvalidArgument(format!("Invalid token address {}: {}", token, e)))?;

    let wallets = Arc::new(load_wallets(config)?);
    let router = VenueRouter::from_config(config)?;
    let mut session = VolumeSession::new(wallets, router, config.trading.clone());

    spawn_shutdown_listener(session.handle());

    let duration = session_duration(duration_minutes)?;
    tracing::info!(
        session = %session.id(),
        token = %token,
        duration_minutes,
        "Volume session starting (Ctrl+C to stop)"
    );

    let stats = session.run(token, duration).await?;
    print!("{}", report::format_stats(&stats));
    Ok(())
}

async fn run_create(config: &Config, metadata: &TokenMetadata, wallet_index: usize) -> Result<()> {
    let launcher = TokenLauncher::from_config(config)?;
    let wallets = load_wallets(config)?;
    let wallet = wallets.get(wallet_index)?;

    let launch = launcher.launch(metadata, wallet).await?;
    print!("{}", report::format_launch(&launch));
    Ok(())
}

async fn run_bundle(
    config: &Config,
    file: &std::path::Path,
    dry_run: bool,
    wallet_index: usize,
) -> Result<()> {
    let txs = load_bundle(file)?;
    let wallets = load_wallets(config)?;
    let wallet = wallets.get(wallet_index)?;

    let bundler = TransactionBundler::new(wallet, config.gas.gas_price_wei()?);
    bundler.validate(&txs)?;

    let gas = bundler.estimate_gas(&txs).await;
    println!("Bundle of {} transactions, estimated gas {}", txs.len(), gas);

    if dry_run {
        tracing::info!("Dry run, not sending");
        return Ok(());
    }

    let hashes = bundler.execute(&txs).await?;
    for (index, hash) in hashes.iter().enumerate() {
        println!("  [{}] {}", index, hash);
    }
    Ok(())
}

fn session_duration(minutes: Option<u64>) -> Result<Option<Duration>> {
    minutes
        .map(|minutes| {
            minutes
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or_else(|| Error::InvalidArgument(format!("Duration of {} minutes is too large", minutes)))
        })
        .transpose()
}

/// Stop the session on Ctrl+C or SIGTERM
fn spawn_shutdown_listener(handle: SessionHandle) {
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        tracing::info!("Shutdown requested, finishing the current trade");
        handle.stop();
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_given_in_minutes() {
        assert_eq!(session_duration(None).unwrap(), None);
        assert_eq!(session_duration(Some(0)).unwrap(), Some(Duration::ZERO));
        assert_eq!(session_duration(Some(90)).unwrap(), Some(Duration::from_secs(5_400)));
    }

    #[test]
    fn oversized_duration_is_rejected() {
        assert!(matches!(
            session_duration(Some(u64::MAX)),
            Err(Error::InvalidArgument(_))
        ));
    }
}
