//! Human-readable output for the CLI

use crate::config::{Config, RpcConfig};
use crate::launcher::LaunchReport;
use crate::trading::VolumeStats;
use crate::units::{format_units, short, BASE_DECIMALS};
use crate::wallet::WalletPool;
use std::fmt::Write;

/// End-of-session statistics block
pub fn format_stats(stats: &VolumeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Volume statistics");
    let _ = writeln!(out, "  Total trades: {}", stats.total_trades);
    let _ = writeln!(out, "  Buys:         {}", stats.buys);
    let _ = writeln!(out, "  Sells:        {}", stats.sells);
    let _ = writeln!(out, "  Volume:       {} BNB", stats.total_volume);
    let _ = writeln!(out, "  P/L:          {} BNB", stats.profit_loss);
    if let (Some(start), Some(last)) = (stats.started_at, stats.last_trade_at) {
        let _ = writeln!(out, "  Active:       {}s", (last - start).num_seconds());
    }
    out
}

pub fn format_config(config: &Config) -> String {
    let t = &config.trading;
    let mut out = String::new();
    let _ = writeln!(out, "Configuration");
    let _ = writeln!(out, "  Buy amount:   {} - {} BNB", t.buy_amount.min, t.buy_amount.max);
    let _ = writeln!(
        out,
        "  Sell:         {}% - {}% of balance",
        t.sell_percentage.min, t.sell_percentage.max
    );
    let _ = writeln!(
        out,
        "  Interval:     {}s - {}s",
        t.interval.min_ms / 1000,
        t.interval.max_ms / 1000
    );
    let _ = writeln!(out, "  Slippage:     {}%", t.slippage_tolerance);
    let _ = writeln!(out, "  Initial buy:  {} BNB", t.initial_buy_amount);
    let _ = writeln!(out, "  Max retries:  {}", t.max_retries);
    let _ = writeln!(
        out,
        "  Gas:          {} gwei, limit {}",
        config.gas.gas_price_gwei, config.gas.gas_limit
    );
    let _ = writeln!(out, "  Router:       {}", config.contracts.pancakeswap_router);
    match config.contracts.four_meme_factory {
        Some(factory) => {
            let _ = writeln!(out, "  Factory:      {}", factory);
        }
        None => {
            let _ = writeln!(out, "  Factory:      not set (bonding-curve trading and token creation disabled)");
        }
    }
    out
}

pub fn format_launch(report: &LaunchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Token created");
    let _ = writeln!(out, "  Address:      {}", report.token);
    let _ = writeln!(out, "  Creation tx:  {}", report.creation_tx);
    if let Some(info) = &report.info {
        let _ = writeln!(out, "  Name:         {} ({})", info.name, info.symbol);
        let _ = writeln!(out, "  Decimals:     {}", info.decimals);
        let _ = writeln!(
            out,
            "  Total supply: {}",
            format_units(info.total_supply, u32::from(info.decimals))
        );
    }
    match &report.initial_buy {
        Some(trade) => {
            let _ = writeln!(
                out,
                "  Initial buy:  {} BNB (tx {})",
                format_units(trade.amount_in, BASE_DECIMALS),
                short(&trade.tx_hash, 18)
            );
        }
        None => {
            let _ = writeln!(out, "  Initial buy:  none");
        }
    }
    out
}

/// Print chain, wallets with balances and the configuration summary
pub async fn print_status(config: &Config, rpc: &RpcConfig, wallets: &WalletPool) {
    println!("Chain ID: {}", rpc.chain_id());
    println!("RPC URL:  {}", rpc.url());
    println!();
    println!("Wallets ({})", wallets.len());

    for (index, wallet) in wallets.all().iter().enumerate() {
        match wallet.native_balance().await {
            Ok(balance) => println!(
                "  [{}] {} {} BNB",
                index,
                wallet.address_string(),
                format_units(balance, BASE_DECIMALS)
            ),
            Err(e) => {
                tracing::warn!(address = %wallet.address(), error = %e, "Balance unavailable");
                println!("  [{}] {} (balance unavailable)", index, wallet.address_string());
            }
        }
    }

    println!();
    print!("{}", format_config(config));

    if config.contracts.four_meme_factory.is_none() {
        tracing::warn!(
            "{} not set; only tokens with a PancakeSwap pool can be traded",
            crate::config::env_vars::FOURMEME_FACTORY_ADDRESS
        );
    }
}
