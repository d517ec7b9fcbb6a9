//! Session controller for the wallet-backed game.
//!
//! Owns the connection state, the current game, the cached stats and
//! history, and a [`Timeline`] of deferred work (demo fallback, computer
//! replies, refreshes). The UI calls [`DappController::tick`] on every frame
//! to fire whatever is due.

use super::history::{HistoryEntry, build_history, opponent_label};
use crate::config::TimingConfig;
use crate::event::BoardEvent;
use crate::notice::{NoticeBoard, NoticeKind};
use crate::schedule::Timeline;
use crate::wallet::{
    AccountInfo, DEMO_YOUR_GAMES, DemoWallet, EntryFunctionPayload, GameStats, GameSummary,
    TicTacToeContract, WalletBridge, WalletErrorKind, WalletLink, parse_opponent_address,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::time::Instant;
use tictactoe_core::{Address, GameSession, GameStatus, Participant, Player, Position};
use tracing::{debug, info, instrument, warn};

/// Who the controller is talking to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// No account.
    Disconnected,
    /// A real wallet account.
    Connected(AccountInfo),
    /// The in-process demo wallet.
    Demo(AccountInfo),
}

impl Connection {
    /// The account, in either connected state.
    pub fn account(&self) -> Option<&AccountInfo> {
        match self {
            Connection::Disconnected => None,
            Connection::Connected(account) | Connection::Demo(account) => Some(account),
        }
    }

    /// Whether an account is present.
    pub fn is_connected(&self) -> bool {
        !matches!(self, Connection::Disconnected)
    }

    /// Whether demo mode is active.
    pub fn is_demo(&self) -> bool {
        matches!(self, Connection::Demo(_))
    }
}

/// Deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DappAction {
    WalletMissing,
    EnableDemoMode,
    ComputerMove,
    RefreshAfterCreate,
    RefreshGame,
}

/// State and operations of the wallet-backed game.
#[derive(Debug)]
pub struct DappController {
    link: WalletLink,
    real_bridge: WalletBridge,
    connection: Connection,
    current_game: Option<GameSession>,
    games: Vec<GameSummary>,
    stats: GameStats,
    notices: NoticeBoard,
    timeline: Timeline<DappAction>,
    timing: TimingConfig,
    rng: StdRng,
    events: Vec<BoardEvent>,
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl DappController {
    /// Disconnected controller over `bridge`.
    #[instrument(skip(bridge, contract), fields(module = %contract.module_address(), wallet = bridge.name().unwrap_or("none")))]
    pub fn new(bridge: WalletBridge, contract: TicTacToeContract, timing: TimingConfig) -> Self {
        info!("Creating dApp controller");
        Self {
            link: WalletLink::new(bridge.clone(), contract),
            real_bridge: bridge,
            connection: Connection::Disconnected,
            current_game: None,
            games: Vec::new(),
            stats: GameStats::default(),
            notices: NoticeBoard::new(timing.notice()),
            timeline: Timeline::new(),
            timing,
            rng: StdRng::from_os_rng(),
            events: Vec::new(),
        }
    }

    /// Fixes the computer's random choices.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Looks for a wallet and an existing account.
    ///
    /// Without a wallet, demo mode is scheduled after the fallback delay; if
    /// the account query fails it is scheduled after the longer error delay.
    #[instrument(skip(self, now))]
    pub async fn check_wallet_connection(&mut self, now: Instant) {
        if self.connection.is_connected() {
            debug!("Already connected");
            return;
        }
        if !self.link.bridge().is_available() {
            info!("No wallet detected, scheduling demo mode");
            self.timeline
                .schedule(now, self.timing.demo_fallback(), DappAction::WalletMissing);
            return;
        }

        match self.link.restore().await {
            Ok(Some(account)) => self.handle_wallet_connected(account).await,
            Ok(None) => debug!("Wallet present but no account connected"),
            Err(e) => {
                warn!(error = %e, "Account query failed, scheduling demo mode");
                self.timeline.schedule(
                    now,
                    self.timing.demo_after_error(),
                    DappAction::EnableDemoMode,
                );
            }
        }
    }

    /// Asks the wallet to connect; falls back to demo mode on failure.
    #[instrument(skip(self, now))]
    pub async fn connect_wallet(&mut self, now: Instant) {
        match self.link.connect().await {
            Ok(account) => {
                self.notices
                    .push("Wallet connected successfully!", NoticeKind::Success, now);
                self.handle_wallet_connected(account).await;
            }
            Err(e) if e.kind() == &WalletErrorKind::Unavailable => {
                self.notices.push(
                    "Please install Petra wallet extension",
                    NoticeKind::Error,
                    now,
                );
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                self.notices.push(
                    "Failed to connect wallet. Enabling demo mode...",
                    NoticeKind::Info,
                    now,
                );
                self.enable_demo_mode(now).await;
            }
        }
    }

    async fn handle_wallet_connected(&mut self, account: AccountInfo) {
        info!(address = %account.address, "Account connected");
        self.connection = Connection::Connected(account);
        self.initialize_game_registry().await;
        self.load_game_stats().await;
        self.load_game_history().await;
    }

    /// Switches to the demo wallet and loads its data.
    #[instrument(skip(self, now))]
    pub async fn enable_demo_mode(&mut self, now: Instant) {
        info!("Enabling demo mode");
        let account = DemoWallet::account_info();
        self.link
            .replace_bridge(WalletBridge::available(DemoWallet::new(unix_now())));
        self.link.set_account(Some(account.clone()));
        self.connection = Connection::Demo(account);
        self.load_game_stats().await;
        self.load_game_history().await;
        self.notices.push(
            "Demo mode enabled - Try playing Tic Tac Toe!",
            NoticeKind::Success,
            now,
        );
    }

    /// Drops the account and all cached state.
    #[instrument(skip(self, now))]
    pub async fn disconnect_wallet(&mut self, now: Instant) {
        if matches!(self.connection, Connection::Connected(_))
            && let Err(e) = self.link.disconnect().await
        {
            warn!(error = %e, "Wallet refused to disconnect");
            return;
        }
        self.link.set_account(None);
        self.link.replace_bridge(self.real_bridge.clone());
        self.connection = Connection::Disconnected;
        self.current_game = None;
        self.games.clear();
        self.stats = GameStats::default();
        self.timeline.clear();
        self.events.clear();
        self.notices.push("Wallet disconnected", NoticeKind::Info, now);
    }

    /// Submits `initialize_game_registry`; failures mean it already exists.
    #[instrument(skip(self))]
    pub async fn initialize_game_registry(&mut self) {
        let payload = self.link.contract().initialize_game_registry();
        match self.link.submit(&payload).await {
            Ok(tx) => info!(hash = %tx.hash, "Game registry initialized"),
            Err(e) => debug!(error = %e, "Game registry might already be initialized"),
        }
    }

    fn me(&self) -> Option<Address> {
        self.connection.account().map(|a| a.address.clone())
    }

    /// Starts a game against the computer.
    #[instrument(skip(self, now))]
    pub async fn create_game_vs_computer(&mut self, now: Instant) -> bool {
        let Some(me) = self.require_account(now) else {
            return false;
        };
        if self.connection.is_demo() {
            self.start_demo_game(me, Participant::Computer, now);
            return true;
        }
        let payload = self.link.contract().create_game_vs_computer();
        self.submit_create(&payload, now).await
    }

    /// Starts a game against the account typed in `opponent`.
    #[instrument(skip(self, now))]
    pub async fn create_game_vs_player(&mut self, opponent: &str, now: Instant) -> bool {
        let Some(me) = self.require_account(now) else {
            return false;
        };
        let opponent = match parse_opponent_address(opponent) {
            Ok(address) => address,
            Err(message) => {
                self.notices.push(message, NoticeKind::Error, now);
                return false;
            }
        };
        if self.connection.is_demo() {
            self.start_demo_game(me, Participant::Account(opponent), now);
            return true;
        }
        let payload = self.link.contract().create_game_vs_player(&opponent);
        self.submit_create(&payload, now).await
    }

    fn require_account(&mut self, now: Instant) -> Option<Address> {
        let me = self.me();
        if me.is_none() {
            self.notices
                .push("Please connect your wallet first", NoticeKind::Error, now);
        }
        me
    }

    fn start_demo_game(&mut self, me: Address, player_o: Participant, now: Instant) {
        let created = chrono::Utc::now();
        let id = u64::try_from(created.timestamp_millis()).unwrap_or_default();
        self.current_game = Some(GameSession::new(id, me, player_o, created.timestamp()));
        self.notices
            .push("Demo game created!", NoticeKind::Success, now);
    }

    async fn submit_create(
        &mut self,
        payload: &EntryFunctionPayload,
        now: Instant,
    ) -> bool {
        match self.link.submit(payload).await {
            Ok(tx) => {
                info!(hash = %tx.hash, "Game creation submitted");
                self.notices
                    .push("Game created successfully!", NoticeKind::Success, now);
                self.timeline.schedule(
                    now,
                    self.timing.refresh_after_create(),
                    DappAction::RefreshAfterCreate,
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Create game error");
                self.notices.push(
                    "Failed to create game. Please try again.",
                    NoticeKind::Error,
                    now,
                );
                false
            }
        }
    }

    /// Plays `position` for the local user (always X).
    ///
    /// Ignored without a game, once it is over, on a marked cell, or when it
    /// is not X's turn.
    #[instrument(skip(self, now))]
    pub async fn handle_cell_click(&mut self, position: Position, now: Instant) {
        let playable = self.current_game.as_ref().is_some_and(|game| {
            game.status() == GameStatus::Ongoing
                && game.board().is_empty(position)
                && game.current_player() == Player::X
        });
        if !playable {
            debug!("Click ignored");
            return;
        }
        self.make_move(position, now).await;
    }

    /// Submits or applies X's move at `position`.
    #[instrument(skip(self, now))]
    pub async fn make_move(&mut self, position: Position, now: Instant) {
        if self.connection.is_demo() {
            self.apply_local_move(Player::X, position);
            let computer_to_move = self.current_game.as_ref().is_some_and(|game| {
                game.is_vs_computer()
                    && game.status() == GameStatus::Ongoing
                    && game.current_player() == Player::O
            });
            if computer_to_move {
                self.timeline
                    .schedule(now, self.timing.computer_move(), DappAction::ComputerMove);
            }
            return;
        }

        let (Some(game), Some(registry)) = (self.current_game.as_ref(), self.link.registry())
        else {
            debug!("No game or registry to move in");
            return;
        };
        let payload = self.link.contract().make_move(registry, game.id(), position);
        match self.link.submit(&payload).await {
            Ok(tx) => {
                info!(hash = %tx.hash, "Move submitted");
                self.notices.push("Move made!", NoticeKind::Success, now);
                self.timeline.schedule(
                    now,
                    self.timing.refresh_after_move(),
                    DappAction::RefreshGame,
                );
            }
            Err(e) => {
                warn!(error = %e, "Move submission failed");
                self.notices.push(
                    "Failed to make move. Please try again.",
                    NoticeKind::Error,
                    now,
                );
            }
        }
    }

    fn apply_local_move(&mut self, player: Player, position: Position) {
        let Some(game) = self.current_game.as_mut() else {
            return;
        };
        match game.apply_move_as(player, position, unix_now()) {
            Ok(status) => {
                self.events
                    .push(BoardEvent::after_move(player, position, game.board(), status));
            }
            Err(e) => debug!(error = %e, "Local move rejected"),
        }
    }

    /// The computer's reply: a uniformly random empty cell.
    #[instrument(skip(self))]
    pub fn make_computer_move(&mut self) {
        let Some(game) = self.current_game.as_ref() else {
            return;
        };
        if game.status() != GameStatus::Ongoing || game.current_player() != Player::O {
            debug!("Computer has nothing to do");
            return;
        }
        let moves = Position::valid_moves(game.board());
        if let Some(&position) = moves.choose(&mut self.rng) {
            info!(position = %position.label(), "Computer moves");
            self.apply_local_move(Player::O, position);
        }
    }

    /// Clears the current game.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        debug!("Resetting current game");
        self.current_game = None;
    }

    /// Reloads registry counters. The `your_games` count is kept.
    #[instrument(skip(self))]
    pub async fn load_game_stats(&mut self) {
        let Some(registry) = self.link.registry().cloned() else {
            return;
        };
        let request = self.link.contract().get_game_stats(&registry);
        match self
            .link
            .view(&request, TicTacToeContract::decode_game_stats)
            .await
        {
            Ok(stats) => {
                self.stats = GameStats {
                    your_games: self.stats.your_games,
                    ..stats
                };
            }
            Err(e) => warn!(error = %e, "Failed to load game stats"),
        }
    }

    /// Picks up an ongoing game involving the account.
    #[instrument(skip(self))]
    pub async fn load_active_game(&mut self) {
        let Some(me) = self.me() else {
            return;
        };
        let request = self.link.contract().get_active_games(&me);
        match self
            .link
            .view(&request, TicTacToeContract::decode_active_games)
            .await
        {
            Ok(games) => {
                let mine = Participant::Account(me.clone());
                if let Some(game) = games
                    .into_iter()
                    .find(|g| g.player_x() == &me || g.player_o() == &mine)
                {
                    info!(id = game.id(), "Active game loaded");
                    self.current_game = Some(game);
                }
            }
            Err(e) => warn!(error = %e, "Failed to load active games"),
        }
    }

    /// Reloads the account's game list; on failure the list is emptied.
    #[instrument(skip(self))]
    pub async fn load_game_history(&mut self) {
        let Some(me) = self.me() else {
            return;
        };
        let request = self.link.contract().get_player_games(&me, &me);
        match self
            .link
            .view(&request, TicTacToeContract::decode_player_games)
            .await
        {
            Ok(games) => {
                debug!(count = games.len(), "Game history loaded");
                self.games = games;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load game history");
                self.games.clear();
            }
        }
        self.stats.your_games = if self.connection.is_demo() {
            DEMO_YOUR_GAMES
        } else {
            self.games.len()
        };
    }

    /// Refreshes the current game after a submitted move.
    ///
    /// Takes the record from the active list when it is still there;
    /// otherwise applies the finished state reported by the history.
    #[instrument(skip(self))]
    pub async fn load_current_game(&mut self) {
        let Some(id) = self.current_game.as_ref().map(GameSession::id) else {
            return;
        };
        let Some(me) = self.me() else {
            return;
        };

        let request = self.link.contract().get_active_games(&me);
        match self
            .link
            .view(&request, TicTacToeContract::decode_active_games)
            .await
        {
            Ok(games) => {
                if let Some(game) = games.into_iter().find(|g| g.id() == id) {
                    self.current_game = Some(game);
                    self.load_game_stats().await;
                    return;
                }
            }
            Err(e) => warn!(error = %e, "Failed to refresh current game"),
        }

        self.load_game_history().await;
        if let (Some(game), Some(summary)) = (
            self.current_game.as_ref(),
            self.games.iter().find(|g| g.id == id),
        ) {
            debug!(id, status = ?summary.status, "Current game updated from history");
            self.current_game = Some(GameSession::from_record(
                game.id(),
                game.player_x().clone(),
                game.player_o().clone(),
                game.board().clone(),
                game.current_player(),
                summary.status,
                summary.moves_count,
                game.created_at(),
                summary.finished_at,
                summary.winner.clone(),
            ));
        }
        self.load_game_stats().await;
    }

    /// Expires notices and runs every due action in order.
    pub async fn tick(&mut self, now: Instant) {
        self.notices.prune(now);
        for action in self.timeline.due(now) {
            debug!(?action, "Running deferred action");
            match action {
                DappAction::WalletMissing | DappAction::EnableDemoMode => {
                    if self.connection.is_connected() {
                        debug!("Already connected, demo mode skipped");
                        continue;
                    }
                    if action == DappAction::WalletMissing {
                        self.notices.push(
                            "Petra wallet not detected. Enabling demo mode...",
                            NoticeKind::Info,
                            now,
                        );
                    }
                    self.enable_demo_mode(now).await;
                }
                DappAction::ComputerMove => self.make_computer_move(),
                DappAction::RefreshAfterCreate => {
                    self.load_game_stats().await;
                    self.load_active_game().await;
                }
                DappAction::RefreshGame => self.load_current_game().await,
            }
        }
    }

    /// Board events since the last call.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether deferred work is waiting.
    pub fn has_pending(&self) -> bool {
        !self.timeline.is_empty()
    }

    /// History rows, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        match self.me() {
            Some(me) => build_history(&self.games, &me),
            None => Vec::new(),
        }
    }

    /// `You Won!`, `You Lost!` or `It's a Draw!` once the game is over.
    pub fn result_text(&self) -> Option<&'static str> {
        let game = self.current_game.as_ref()?;
        match game.status() {
            GameStatus::Ongoing => None,
            GameStatus::Draw => Some("It's a Draw!"),
            GameStatus::XWins | GameStatus::OWins => {
                let me = self.me().map(Participant::Account);
                if me.is_some() && game.winner() == me.as_ref() {
                    Some("You Won!")
                } else {
                    Some("You Lost!")
                }
            }
        }
    }

    /// `Your Turn` or `Opponent's Turn` while the game is ongoing.
    pub fn turn_text(&self) -> Option<&'static str> {
        let game = self.current_game.as_ref()?;
        if game.status().is_finished() {
            return None;
        }
        Some(match game.current_player() {
            Player::X => "Your Turn",
            Player::O => "Opponent's Turn",
        })
    }

    /// O-seat label of the current game.
    pub fn opponent_label(&self) -> Option<String> {
        let game = self.current_game.as_ref()?;
        let me = self.me().unwrap_or_else(|| game.player_x().clone());
        Some(opponent_label(game.player_o(), &me))
    }

    /// Account line for the header.
    pub fn wallet_label(&self) -> String {
        match &self.connection {
            Connection::Disconnected => "Not connected".to_string(),
            Connection::Demo(_) => "Demo Mode - Try the game!".to_string(),
            Connection::Connected(account) => account.address.abbreviated(),
        }
    }

    /// Game being played.
    pub fn current_game(&self) -> Option<&GameSession> {
        self.current_game.as_ref()
    }

    /// Cached counters.
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Cached raw history.
    pub fn games(&self) -> &[GameSummary] {
        &self.games
    }

    /// Live notices.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Connection state.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Wallet link.
    pub fn link(&self) -> &WalletLink {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn controller() -> DappController {
        DappController::new(
            WalletBridge::Unavailable,
            TicTacToeContract::new("0xmod"),
            TimingConfig::immediate(),
        )
        .with_seed(7)
    }

    #[tokio::test]
    async fn test_missing_wallet_schedules_demo_mode() {
        let mut dapp = DappController::new(
            WalletBridge::Unavailable,
            TicTacToeContract::new("0xmod"),
            TimingConfig::default(),
        );
        let now = Instant::now();
        dapp.check_wallet_connection(now).await;
        assert_eq!(dapp.connection(), &Connection::Disconnected);
        assert!(dapp.has_pending());
        assert!(dapp.notices().latest().is_none());

        dapp.tick(now + Duration::from_millis(2_999)).await;
        assert_eq!(dapp.connection(), &Connection::Disconnected);
        assert!(dapp.notices().latest().is_none());

        dapp.tick(now + Duration::from_secs(3)).await;
        assert!(dapp.connection().is_demo());
        assert_eq!(dapp.wallet_label(), "Demo Mode - Try the game!");
        let messages: Vec<&str> = dapp
            .notices()
            .notices()
            .iter()
            .map(|n| n.message().as_str())
            .collect();
        assert_eq!(
            messages,
            [
                "Petra wallet not detected. Enabling demo mode...",
                "Demo mode enabled - Try playing Tic Tac Toe!"
            ]
        );
    }

    #[tokio::test]
    async fn test_cannot_create_without_account() {
        let mut dapp = controller();
        let now = Instant::now();
        assert!(!dapp.create_game_vs_computer(now).await);
        assert_eq!(
            dapp.notices().latest().map(|n| n.message().as_str()),
            Some("Please connect your wallet first")
        );
    }

    #[test]
    fn test_turn_and_result_need_a_game() {
        let dapp = controller();
        assert_eq!(dapp.turn_text(), None);
        assert_eq!(dapp.result_text(), None);
        assert_eq!(dapp.wallet_label(), "Not connected");
    }
}
