//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Terminal tic-tac-toe with optional wallet-backed result recording
#[derive(Parser, Debug)]
#[command(name = "tictactoe_dapp")]
#[command(about = "Tic-tac-toe in the terminal, locally or through a wallet", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, default_value = "tictactoe.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Two players at one keyboard, with a persisted score
    Play {
        /// Wallet bridge URL; enables blockchain mode once connected
        #[arg(long)]
        wallet_url: Option<String>,
    },

    /// Wallet-backed game against the computer or another account
    Dapp {
        /// Wallet bridge URL; without one the game falls back to demo mode
        #[arg(long)]
        wallet_url: Option<String>,

        /// Start in demo mode right away
        #[arg(long)]
        demo: bool,
    },

    /// Print the persisted score
    Scores {
        /// Reset both counters to zero
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dapp_flags_parse() {
        let cli = Cli::parse_from(["tictactoe_dapp", "dapp", "--demo", "--wallet-url", "http://w"]);
        assert_eq!(cli.config, PathBuf::from("tictactoe.toml"));
        let Command::Dapp { wallet_url, demo } = cli.command else {
            panic!("expected dapp command");
        };
        assert!(demo);
        assert_eq!(wallet_url.as_deref(), Some("http://w"));
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["tictactoe_dapp", "scores", "--reset", "--config", "x.toml"]);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Command::Scores { reset: true }));
    }
}
