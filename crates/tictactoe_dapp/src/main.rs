//! Tic-tac-toe launcher.
//!
//! Runs the local game, the wallet-backed game, or the score tool.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;
use tictactoe_dapp::cli::{Cli, Command};
use tictactoe_dapp::tui::{self, App, Screen};
use tictactoe_dapp::{
    AppConfig, DappController, FileStore, LocalSession, ScoreStore, TicTacToeContract,
    WalletBridge, WalletLink,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(Some(&cli.config))?;

    match cli.command {
        Command::Play { wallet_url } => run_local(config.with_wallet_url(wallet_url)).await,
        Command::Dapp { wallet_url, demo } => {
            run_dapp(config.with_wallet_url(wallet_url), demo).await
        }
        Command::Scores { reset } => run_scores(config, reset),
    }
}

fn open_scores(config: &AppConfig) -> Result<ScoreStore<FileStore>> {
    let store = FileStore::open(config.storage_path()).with_context(|| {
        format!(
            "Failed to open score store {}",
            config.storage_path().display()
        )
    })?;
    Ok(ScoreStore::new(store))
}

fn bridge(config: &AppConfig) -> (WalletBridge, TicTacToeContract) {
    (
        WalletBridge::from_url(config.wallet_url().as_deref()),
        TicTacToeContract::new(config.module_address()),
    )
}

/// Two players at one keyboard
#[instrument(skip_all)]
async fn run_local(config: AppConfig) -> Result<()> {
    tui::init_file_logging(config.log_file())?;
    info!("Starting local game");

    let (bridge, contract) = bridge(&config);
    let session = LocalSession::new(
        open_scores(&config)?,
        WalletLink::new(bridge, contract),
        config.timing().local_notice(),
    );
    tui::run(App::new(Screen::Local(session))).await
}

/// Wallet-backed game
#[instrument(skip_all, fields(demo))]
async fn run_dapp(config: AppConfig, demo: bool) -> Result<()> {
    tui::init_file_logging(config.log_file())?;
    info!("Starting dApp");

    let (bridge, contract) = bridge(&config);
    let mut dapp = DappController::new(bridge, contract, *config.timing());
    if demo {
        dapp.enable_demo_mode(Instant::now()).await;
    }
    tui::run(App::<FileStore>::new(Screen::Dapp(dapp))).await
}

/// Print or reset the persisted score
fn run_scores(config: AppConfig, reset: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut scores = open_scores(&config)?;
    if reset {
        scores.reset()?;
        println!("Score reset");
    }
    let score = scores.load()?;
    println!("X: {}", score.x_wins);
    println!("O: {}", score.o_wins);
    Ok(())
}
