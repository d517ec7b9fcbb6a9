//! DappController flows in demo mode and against in-process wallets.

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tictactoe_core::{Address, GameStatus, Participant, Player, Position, Square};
use tictactoe_dapp::{
    AccountInfo, BoardEvent, COMPUTER_SENTINEL, Connection, DEMO_ACCOUNT, DEMO_YOUR_GAMES,
    DappController, DemoWallet, EntryFunctionPayload, HistoryOutcome, HttpWallet,
    NOBODY_SENTINEL, TicTacToeContract, TimingConfig, TransactionResponse, ViewRequest, Wallet,
    WalletBridge, WalletError, WalletErrorKind,
};
use tokio::sync::Mutex;

fn controller(bridge: WalletBridge) -> DappController {
    DappController::new(bridge, TicTacToeContract::new("0xmod"), TimingConfig::immediate())
        .with_seed(11)
}

fn latest(dapp: &DappController) -> Option<String> {
    dapp.notices().latest().map(|n| n.message().clone())
}

#[tokio::test]
async fn test_demo_mode_loads_stats_and_history() {
    let mut dapp = controller(WalletBridge::Unavailable);
    dapp.enable_demo_mode(Instant::now()).await;

    assert!(dapp.connection().is_demo());
    let stats = dapp.stats();
    assert_eq!((stats.total, stats.active, stats.completed), (5, 1, 4));
    assert_eq!(stats.your_games, DEMO_YOUR_GAMES);

    let history = dapp.history();
    assert_eq!(history.len(), 2);
    assert_eq!(*history[0].id(), 1);
    assert_eq!(history[0].outcome(), &HistoryOutcome::Won);
    assert_eq!(history[0].moves(), "5/9");
    assert_eq!(history[0].opponent(), "Computer");
    assert_eq!(history[1].outcome(), &HistoryOutcome::Draw);
    assert!(history[1].finished().is_some());
    assert_eq!(
        latest(&dapp).as_deref(),
        Some("Demo mode enabled - Try playing Tic Tac Toe!")
    );
}

#[tokio::test]
async fn test_demo_game_against_computer_alternates_until_finished() {
    let mut dapp = controller(WalletBridge::Unavailable);
    let now = Instant::now();
    dapp.enable_demo_mode(now).await;
    assert!(dapp.create_game_vs_computer(now).await);
    assert_eq!(latest(&dapp).as_deref(), Some("Demo game created!"));
    assert_eq!(dapp.opponent_label().as_deref(), Some("Computer"));
    assert_eq!(dapp.turn_text(), Some("Your Turn"));

    for _ in 0..5 {
        let Some(game) = dapp.current_game() else {
            panic!("game vanished");
        };
        if game.status().is_finished() {
            break;
        }
        let before = game.moves_count();
        let target = Position::valid_moves(game.board())[0];
        dapp.handle_cell_click(target, now).await;
        let game = dapp.current_game().unwrap();
        assert_eq!(game.moves_count(), before + 1);

        if game.status() == GameStatus::Ongoing {
            assert_eq!(dapp.turn_text(), Some("Opponent's Turn"));
            // X cannot move again before the computer answers.
            let other = Position::valid_moves(game.board())[0];
            dapp.handle_cell_click(other, now).await;
            assert_eq!(dapp.current_game().unwrap().moves_count(), before + 1);

            dapp.tick(now).await;
            let game = dapp.current_game().unwrap();
            assert_eq!(game.moves_count(), before + 2);
            if game.status() == GameStatus::Ongoing {
                assert_eq!(game.current_player(), Player::X);
            }
        }
    }

    let game = dapp.current_game().unwrap();
    assert!(game.status().is_finished());
    assert!(dapp.result_text().is_some());
    assert_eq!(dapp.turn_text(), None);
    let moves_count = game.moves_count();

    let events = dapp.take_events();
    assert_eq!(events.len(), usize::from(moves_count));
    assert!(matches!(
        events.last(),
        Some(BoardEvent::Won { .. } | BoardEvent::Draw { .. })
    ));
    assert!(dapp.take_events().is_empty());
}

#[tokio::test]
async fn test_opponent_address_is_validated() {
    let mut dapp = controller(WalletBridge::Unavailable);
    let now = Instant::now();
    dapp.enable_demo_mode(now).await;

    assert!(!dapp.create_game_vs_player("   ", now).await);
    assert_eq!(latest(&dapp).as_deref(), Some("Please enter opponent address"));

    assert!(!dapp.create_game_vs_player("0x1234", now).await);
    assert_eq!(latest(&dapp).as_deref(), Some("Invalid wallet address format"));

    let opponent = format!("0x{}", "c".repeat(64));
    assert!(dapp.create_game_vs_player(&opponent, now).await);
    let game = dapp.current_game().unwrap();
    assert!(!game.is_vs_computer());
    assert_eq!(
        dapp.opponent_label(),
        Some(format!("0x{}...{}", "c".repeat(10), "c".repeat(8)))
    );

    // No computer reply in a two-account game.
    dapp.handle_cell_click(Position::Center, now).await;
    dapp.tick(now).await;
    assert_eq!(dapp.current_game().unwrap().moves_count(), 1);
}

#[tokio::test]
async fn test_existing_account_is_restored_and_registry_initialized() {
    let wallet = DemoWallet::new(1_700_000_000);
    let mut dapp = controller(WalletBridge::available(wallet.clone()));
    let now = Instant::now();

    dapp.check_wallet_connection(now).await;
    assert!(matches!(dapp.connection(), Connection::Connected(_)));
    assert_eq!(dapp.wallet_label(), Address::new(DEMO_ACCOUNT).abbreviated());
    assert_eq!(dapp.stats().your_games, 2);

    let submitted = wallet.submitted().await;
    assert_eq!(submitted[0].function_name(), "initialize_game_registry");

    assert!(dapp.create_game_vs_computer(now).await);
    assert_eq!(latest(&dapp).as_deref(), Some("Game created successfully!"));
    assert!(dapp.has_pending());
    dapp.tick(now).await;
    assert!(!dapp.has_pending());
    assert_eq!(
        wallet.submitted().await.last().map(|p| p.function_name().to_string()),
        Some("create_game_vs_computer".to_string())
    );

    dapp.disconnect_wallet(now).await;
    assert_eq!(dapp.connection(), &Connection::Disconnected);
    assert_eq!(dapp.wallet_label(), "Not connected");
    assert!(dapp.history().is_empty());
    assert_eq!(latest(&dapp).as_deref(), Some("Wallet disconnected"));
    assert_eq!(wallet.account().await.unwrap(), None);
}

#[tokio::test]
async fn test_missing_wallet_falls_back_to_demo_on_tick() {
    let mut dapp = controller(WalletBridge::Unavailable);
    let now = Instant::now();

    assert!(!dapp.create_game_vs_computer(now).await);
    assert_eq!(latest(&dapp).as_deref(), Some("Please connect your wallet first"));

    dapp.connect_wallet(now).await;
    assert_eq!(
        latest(&dapp).as_deref(),
        Some("Please install Petra wallet extension")
    );
    assert_eq!(dapp.connection(), &Connection::Disconnected);

    dapp.check_wallet_connection(now).await;
    assert!(dapp.has_pending());
    assert_eq!(dapp.connection(), &Connection::Disconnected);
    dapp.tick(now).await;
    assert!(dapp.connection().is_demo());
    assert!(
        dapp.notices()
            .notices()
            .iter()
            .any(|n| n.message() == "Petra wallet not detected. Enabling demo mode...")
    );

    // Leaving demo mode restores the original (absent) wallet.
    dapp.disconnect_wallet(now).await;
    assert!(!dapp.link().bridge().is_available());
}

#[tokio::test]
async fn test_unreachable_wallet_connect_enables_demo_mode() {
    let mut dapp = controller(WalletBridge::available(HttpWallet::new("http://127.0.0.1:9")));
    let now = Instant::now();

    dapp.connect_wallet(now).await;
    assert!(dapp.connection().is_demo());
    let messages: Vec<String> = dapp
        .notices()
        .notices()
        .iter()
        .map(|n| n.message().clone())
        .collect();
    assert!(messages.contains(&"Failed to connect wallet. Enabling demo mode...".to_string()));
}

/// Chain state a test can rewrite between refreshes.
#[derive(Debug, Default)]
struct ChainState {
    active: Vec<Value>,
    history: Vec<Value>,
    submitted: Vec<String>,
}

/// Wallet that answers views from whatever the test last stored.
#[derive(Debug, Clone)]
struct ScriptedWallet {
    account: AccountInfo,
    state: Arc<Mutex<ChainState>>,
}

impl ScriptedWallet {
    fn new(address: &str) -> Self {
        Self {
            account: AccountInfo::new(Address::new(address)),
            state: Arc::new(Mutex::new(ChainState::default())),
        }
    }

    async fn set_active(&self, games: Vec<Value>) {
        self.state.lock().await.active = games;
    }

    async fn set_history(&self, games: Vec<Value>) {
        self.state.lock().await.history = games;
    }

    async fn submitted(&self) -> Vec<String> {
        self.state.lock().await.submitted.clone()
    }
}

#[async_trait::async_trait]
impl Wallet for ScriptedWallet {
    async fn connect(&self) -> Result<AccountInfo, WalletError> {
        Ok(self.account.clone())
    }

    async fn account(&self) -> Result<Option<AccountInfo>, WalletError> {
        Ok(Some(self.account.clone()))
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Ok(())
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<TransactionResponse, WalletError> {
        let mut state = self.state.lock().await;
        state.submitted.push(payload.function_name().to_string());
        Ok(TransactionResponse {
            hash: format!("0x{:x}", state.submitted.len()),
        })
    }

    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>, WalletError> {
        let state = self.state.lock().await;
        match request.function_name() {
            "get_game_stats" => Ok(vec![json!("3"), json!(1), json!("2")]),
            "get_active_games" => Ok(vec![Value::Array(state.active.clone())]),
            "get_player_games" => Ok(vec![Value::Array(state.history.clone())]),
            other => Err(WalletError::new(WalletErrorKind::Rejected(other.to_string()))),
        }
    }

    fn name(&self) -> &str {
        "Scripted wallet"
    }
}

/// Wallet whose every call fails.
#[derive(Debug)]
struct OfflineWallet;

impl OfflineWallet {
    fn offline() -> WalletError {
        WalletError::new(WalletErrorKind::Transport("offline".to_string()))
    }
}

#[async_trait::async_trait]
impl Wallet for OfflineWallet {
    async fn connect(&self) -> Result<AccountInfo, WalletError> {
        Err(Self::offline())
    }

    async fn account(&self) -> Result<Option<AccountInfo>, WalletError> {
        Err(Self::offline())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Err(Self::offline())
    }

    async fn sign_and_submit_transaction(
        &self,
        _payload: &EntryFunctionPayload,
    ) -> Result<TransactionResponse, WalletError> {
        Err(Self::offline())
    }

    async fn view(&self, _request: &ViewRequest) -> Result<Vec<Value>, WalletError> {
        Err(Self::offline())
    }

    fn name(&self) -> &str {
        "Offline wallet"
    }
}

struct Record<'a> {
    player_x: &'a str,
    board: [u8; 9],
    current_player: u8,
    status: u8,
    moves: u8,
    finished_at: u64,
    winner: &'a str,
}

fn game_json(id: u64, record: Record<'_>) -> Value {
    json!({
        "id": id.to_string(),
        "player_x": record.player_x,
        "player_o": COMPUTER_SENTINEL,
        "board": record.board,
        "current_player": record.current_player,
        "game_status": record.status.to_string(),
        "moves_count": record.moves,
        "created_at": "1700000000",
        "finished_at": record.finished_at.to_string(),
        "winner": record.winner,
    })
}

#[tokio::test]
async fn test_wallet_moves_refresh_from_active_list_then_history() {
    let me = format!("0x{}", "a".repeat(64));
    let wallet = ScriptedWallet::new(&me);
    let mut dapp = controller(WalletBridge::available(wallet.clone()));
    let now = Instant::now();

    dapp.connect_wallet(now).await;
    assert!(matches!(dapp.connection(), Connection::Connected(_)));
    assert_eq!(dapp.stats().total, 3);
    assert_eq!(dapp.stats().your_games, 0);

    // Creation picks up the new game from the active list.
    wallet
        .set_active(vec![game_json(
            9,
            Record {
                player_x: &me,
                board: [1, 2, 0, 0, 0, 0, 0, 0, 0],
                current_player: 1,
                status: 0,
                moves: 2,
                finished_at: 0,
                winner: NOBODY_SENTINEL,
            },
        )])
        .await;
    assert!(dapp.create_game_vs_computer(now).await);
    dapp.tick(now).await;
    let game = dapp.current_game().expect("active game loaded");
    assert_eq!(game.id(), 9);
    assert_eq!(game.moves_count(), 2);
    assert_eq!(dapp.turn_text(), Some("Your Turn"));

    // A submitted move is not applied locally; the refresh brings it in.
    dapp.handle_cell_click(Position::Center, now).await;
    assert_eq!(latest(&dapp).as_deref(), Some("Move made!"));
    assert_eq!(wallet.submitted().await.last().map(String::as_str), Some("make_move"));
    assert_eq!(dapp.current_game().unwrap().moves_count(), 2);
    assert!(dapp.has_pending());

    wallet
        .set_active(vec![game_json(
            9,
            Record {
                player_x: &me,
                board: [1, 2, 0, 0, 1, 2, 0, 0, 0],
                current_player: 1,
                status: 0,
                moves: 4,
                finished_at: 0,
                winner: NOBODY_SENTINEL,
            },
        )])
        .await;
    dapp.tick(now).await;
    let game = dapp.current_game().unwrap();
    assert_eq!(game.moves_count(), 4);
    assert_eq!(game.board().get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(game.status(), GameStatus::Ongoing);

    // Once finished the game leaves the active list and only the history knows it.
    dapp.handle_cell_click(Position::BottomRight, now).await;
    assert_eq!(latest(&dapp).as_deref(), Some("Move made!"));
    wallet.set_active(Vec::new()).await;
    wallet
        .set_history(vec![game_json(
            9,
            Record {
                player_x: &me,
                board: [0; 9],
                current_player: 1,
                status: 1,
                moves: 5,
                finished_at: 1_700_000_500,
                winner: &me,
            },
        )])
        .await;
    dapp.tick(now).await;

    let game = dapp.current_game().unwrap();
    assert_eq!(game.id(), 9);
    assert_eq!(game.status(), GameStatus::XWins);
    assert_eq!(game.moves_count(), 5);
    assert_eq!(game.finished_at(), Some(1_700_000_500));
    assert_eq!(game.winner(), Some(&Participant::Account(Address::new(&me))));
    // The last known board is kept.
    assert_eq!(game.board().get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(dapp.result_text(), Some("You Won!"));
    assert_eq!(dapp.turn_text(), None);
    assert_eq!(dapp.stats().your_games, 1);
    assert_eq!(dapp.history()[0].outcome(), &HistoryOutcome::Won);
}

#[tokio::test]
async fn test_failed_account_query_enables_demo_after_delay() {
    let mut dapp = DappController::new(
        WalletBridge::available(OfflineWallet),
        TicTacToeContract::new("0xmod"),
        TimingConfig::default(),
    );
    let now = Instant::now();

    dapp.check_wallet_connection(now).await;
    assert_eq!(dapp.connection(), &Connection::Disconnected);
    assert!(dapp.has_pending());
    assert!(dapp.notices().is_empty());

    dapp.tick(now + Duration::from_millis(4_999)).await;
    assert_eq!(dapp.connection(), &Connection::Disconnected);

    dapp.tick(now + Duration::from_secs(5)).await;
    assert!(dapp.connection().is_demo());
    assert!(!dapp.has_pending());
    assert_eq!(
        latest(&dapp).as_deref(),
        Some("Demo mode enabled - Try playing Tic Tac Toe!")
    );
    assert!(
        !dapp
            .notices()
            .notices()
            .iter()
            .any(|n| n.message().starts_with("Petra wallet not detected"))
    );
}
