//! In-process wallet used by demo mode.

use super::contract::{GameSummary, encode_participant};
use super::{
    AccountInfo, EntryFunctionPayload, TransactionResponse, ViewRequest, Wallet, WalletError,
    WalletErrorKind,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tictactoe_core::{Address, GameStatus, Participant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Account reported by the demo wallet.
pub const DEMO_ACCOUNT: &str = "0xdemo123456789abcdef...";

/// Demo registry counters: total, active, completed.
const DEMO_STATS: [u64; 3] = [5, 1, 4];

/// "Your games" figure shown in demo mode.
pub const DEMO_YOUR_GAMES: usize = 5;

const DAY: i64 = 86_400;

#[derive(Debug)]
struct DemoState {
    connected: bool,
    submitted: Vec<EntryFunctionPayload>,
    games: Vec<GameSummary>,
}

/// Wallet that never leaves the process.
///
/// Always has the demo account, records every submitted payload and
/// answers views from a fixed demo data set.
#[derive(Debug, Clone)]
pub struct DemoWallet {
    state: Arc<Mutex<DemoState>>,
}

impl DemoWallet {
    /// Demo wallet whose history is dated relative to `now` (seconds).
    #[instrument]
    pub fn new(now: i64) -> Self {
        info!("Creating demo wallet");
        Self {
            state: Arc::new(Mutex::new(DemoState {
                connected: true,
                submitted: Vec::new(),
                games: Self::demo_games(&Self::account_info().address, now),
            })),
        }
    }

    /// The demo account.
    pub fn account_info() -> AccountInfo {
        AccountInfo::new(Address::new(DEMO_ACCOUNT))
    }

    /// Two finished games against the computer: an X win in 5 moves from a
    /// day ago and a 9-move draw from two days ago.
    pub fn demo_games(player: &Address, now: i64) -> Vec<GameSummary> {
        vec![
            GameSummary {
                id: 1,
                player_x: player.clone(),
                player_o: Participant::Computer,
                status: GameStatus::XWins,
                moves_count: 5,
                created_at: now - DAY,
                finished_at: Some(now - 86_000),
                winner: Some(Participant::Account(player.clone())),
            },
            GameSummary {
                id: 2,
                player_x: player.clone(),
                player_o: Participant::Computer,
                status: GameStatus::Draw,
                moves_count: 9,
                created_at: now - 2 * DAY,
                finished_at: Some(now - 172_000),
                winner: None,
            },
        ]
    }

    /// Payloads submitted so far, oldest first.
    pub async fn submitted(&self) -> Vec<EntryFunctionPayload> {
        self.state.lock().await.submitted.clone()
    }

    fn encode_game(game: &GameSummary) -> Value {
        json!({
            "id": game.id.to_string(),
            "player_x": game.player_x.as_str(),
            "player_o": encode_participant(Some(&game.player_o)),
            "game_status": game.status.code().to_string(),
            "moves_count": game.moves_count.to_string(),
            "created_at": game.created_at.to_string(),
            "finished_at": game.finished_at.unwrap_or(0).to_string(),
            "winner": encode_participant(game.winner.as_ref()),
        })
    }
}

#[async_trait::async_trait]
impl Wallet for DemoWallet {
    async fn connect(&self) -> Result<AccountInfo, WalletError> {
        self.state.lock().await.connected = true;
        Ok(Self::account_info())
    }

    async fn account(&self) -> Result<Option<AccountInfo>, WalletError> {
        let connected = self.state.lock().await.connected;
        Ok(connected.then(Self::account_info))
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        self.state.lock().await.connected = false;
        Ok(())
    }

    #[instrument(skip(self, payload), fields(function = %payload.function_name()))]
    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<TransactionResponse, WalletError> {
        let mut state = self.state.lock().await;
        if !state.connected {
            return Err(WalletError::new(WalletErrorKind::NotConnected));
        }
        state.submitted.push(payload.clone());
        let hash = format!("0x{:064x}", state.submitted.len());
        debug!(%hash, "Demo transaction recorded");
        Ok(TransactionResponse { hash })
    }

    #[instrument(skip(self, request), fields(function = %request.function_name()))]
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>, WalletError> {
        let state = self.state.lock().await;
        match request.function_name() {
            "get_game_stats" => Ok(DEMO_STATS.iter().map(|n| json!(n.to_string())).collect()),
            "get_active_games" => Ok(vec![json!([])]),
            "get_player_games" => Ok(vec![Value::Array(
                state.games.iter().map(Self::encode_game).collect(),
            )]),
            other => Err(WalletError::new(WalletErrorKind::Rejected(format!(
                "unknown view function {other}"
            )))),
        }
    }

    fn name(&self) -> &str {
        "Demo wallet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::TicTacToeContract;

    #[tokio::test]
    async fn test_demo_views_decode() {
        let wallet = DemoWallet::new(1_700_000_000);
        let contract = TicTacToeContract::new("0xmod");
        let me = Address::new(DEMO_ACCOUNT);

        let stats = wallet.view(&contract.get_game_stats(&me)).await.unwrap();
        let stats = TicTacToeContract::decode_game_stats(&stats).unwrap();
        assert_eq!((stats.total, stats.active, stats.completed), (5, 1, 4));

        let games = wallet.view(&contract.get_player_games(&me, &me)).await.unwrap();
        let games = TicTacToeContract::decode_player_games(&games).unwrap();
        assert_eq!(games, DemoWallet::demo_games(&me, 1_700_000_000));
    }

    #[tokio::test]
    async fn test_submissions_are_recorded_until_disconnect() {
        let wallet = DemoWallet::new(0);
        let contract = TicTacToeContract::new("0xmod");

        wallet
            .sign_and_submit_transaction(&contract.create_game_vs_computer())
            .await
            .unwrap();
        assert_eq!(wallet.submitted().await.len(), 1);

        wallet.disconnect().await.unwrap();
        assert_eq!(wallet.account().await.unwrap(), None);
        let err = wallet
            .sign_and_submit_transaction(&contract.initialize_game_registry())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &WalletErrorKind::NotConnected);
    }
}
