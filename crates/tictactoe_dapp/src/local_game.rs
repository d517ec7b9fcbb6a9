//! The plain two-player game with a persisted score.
//!
//! Both sides play at the same keyboard. When a wallet is connected the
//! session switches to blockchain mode and announces finished games.

use crate::event::BoardEvent;
use crate::notice::{NoticeBoard, NoticeKind};
use crate::storage::{KeyValueStore, Score, ScoreStore};
use crate::wallet::{WalletErrorKind, WalletLink};
use std::time::{Duration, Instant};
use tictactoe_core::{
    Board, GameFinished, GameInProgress, GameResult, GameSetup, Outcome, Player, Position,
    WinningLine,
};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
enum LocalPhase {
    Playing(GameInProgress),
    Over(GameFinished),
}

impl LocalPhase {
    fn fresh() -> Self {
        LocalPhase::Playing(GameSetup::new().start(Player::X))
    }
}

/// Plain game state: board, score, wallet link and notices.
#[derive(Debug)]
pub struct LocalSession<S> {
    phase: LocalPhase,
    score: Score,
    scores: ScoreStore<S>,
    blockchain_mode: bool,
    registry_deployed: bool,
    link: WalletLink,
    notices: NoticeBoard,
}

impl<S: KeyValueStore> LocalSession<S> {
    /// New game with the score loaded from `scores`.
    #[instrument(skip(scores, link))]
    pub fn new(scores: ScoreStore<S>, link: WalletLink, notice_ttl: Duration) -> Self {
        let score = scores.load().unwrap_or_else(|e| {
            warn!(error = %e, "Could not load score, starting from zero");
            Score::default()
        });
        info!(x = score.x_wins, o = score.o_wins, "Local session ready");
        Self {
            phase: LocalPhase::fresh(),
            score,
            scores,
            blockchain_mode: false,
            registry_deployed: false,
            link,
            notices: NoticeBoard::new(notice_ttl),
        }
    }

    /// Places the current player's mark at `position`.
    ///
    /// Occupied cells and finished games are ignored (`None`). A win adds
    /// one to the winner's counter and persists the score.
    #[instrument(skip(self, now))]
    pub fn handle_cell_click(&mut self, position: Position, now: Instant) -> Option<BoardEvent> {
        let game = match std::mem::replace(&mut self.phase, LocalPhase::fresh()) {
            LocalPhase::Playing(game) if game.can_play(position) => game,
            other => {
                debug!("Click ignored");
                self.phase = other;
                return None;
            }
        };

        let player = game.to_move();
        match game.clone().play(position) {
            Ok(GameResult::InProgress(next)) => {
                self.phase = LocalPhase::Playing(next);
                Some(BoardEvent::Placed { player, position })
            }
            Ok(GameResult::Finished(done)) => {
                let event = match (done.outcome(), done.winning_line()) {
                    (Outcome::Winner(winner), Some(line)) => {
                        self.record_win(*winner, now);
                        BoardEvent::Won {
                            player: *winner,
                            position,
                            line,
                        }
                    }
                    _ => BoardEvent::Draw { position },
                };
                info!(outcome = %done.outcome(), "Local game finished");
                if self.blockchain_mode {
                    self.record_game(done.outcome(), now);
                }
                self.phase = LocalPhase::Over(done);
                Some(event)
            }
            Err(e) => {
                debug!(error = %e, "Move rejected");
                self.phase = LocalPhase::Playing(game);
                None
            }
        }
    }

    fn record_win(&mut self, winner: Player, now: Instant) {
        self.score.record_win(winner);
        if let Err(e) = self.scores.save(&self.score) {
            warn!(error = %e, "Failed to persist score");
            self.notices
                .push("Failed to save score", NoticeKind::Error, now);
        }
    }

    fn record_game(&mut self, outcome: &Outcome, now: Instant) {
        if !self.link.is_connected() {
            debug!("Wallet not connected, skipping blockchain recording");
            return;
        }
        let message = match outcome.winner() {
            Some(winner) => format!("Game result recorded! Winner: {}", winner),
            None => "Game result recorded! Draw".to_string(),
        };
        self.notices.push(message, NoticeKind::Success, now);
    }

    /// Fresh board with X to move; the score is kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("Resetting local game");
        self.phase = LocalPhase::fresh();
    }

    /// Status line.
    pub fn status_text(&self) -> String {
        match &self.phase {
            LocalPhase::Playing(game) => format!("Player {}'s turn", game.to_move()),
            LocalPhase::Over(done) => done.outcome().to_string(),
        }
    }

    /// Wallet mode line.
    pub fn blockchain_status_text(&self) -> &'static str {
        if self.blockchain_mode {
            "Blockchain mode active - Games will be recorded on Aptos"
        } else {
            "Local game mode - Connect wallet to play on blockchain"
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        match &self.phase {
            LocalPhase::Playing(game) => game.board(),
            LocalPhase::Over(done) => done.board(),
        }
    }

    /// Line to highlight, once a game is won.
    pub fn winning_line(&self) -> Option<WinningLine> {
        match &self.phase {
            LocalPhase::Playing(_) => None,
            LocalPhase::Over(done) => done.winning_line(),
        }
    }

    /// Whether the current game has ended.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, LocalPhase::Over(_))
    }

    /// Current score.
    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Whether finished games are announced through the wallet.
    pub fn blockchain_mode(&self) -> bool {
        self.blockchain_mode
    }

    /// Whether the registry transaction went through.
    pub fn registry_deployed(&self) -> bool {
        self.registry_deployed
    }

    /// Wallet link.
    pub fn link(&self) -> &WalletLink {
        &self.link
    }

    /// Live notices.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Expires old notices.
    pub fn tick(&mut self, now: Instant) {
        self.notices.prune(now);
    }

    /// Silently restores an existing wallet connection.
    #[instrument(skip(self))]
    pub async fn check_connection(&mut self) {
        match self.link.restore().await {
            Ok(Some(_)) => self.blockchain_mode = true,
            Ok(None) => debug!("No wallet connected"),
            Err(e) => debug!(error = %e, "No wallet connected"),
        }
    }

    /// Connects the wallet and enables blockchain mode.
    #[instrument(skip(self, now))]
    pub async fn connect_wallet(&mut self, now: Instant) {
        match self.link.connect().await {
            Ok(_) => {
                self.blockchain_mode = true;
                self.notices
                    .push("Wallet connected successfully!", NoticeKind::Success, now);
            }
            Err(e) if e.kind() == &WalletErrorKind::Unavailable => {
                self.notices.push(
                    "Please install Petra wallet extension",
                    NoticeKind::Error,
                    now,
                );
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection error");
                self.notices
                    .push("Failed to connect wallet", NoticeKind::Error, now);
            }
        }
    }

    /// Submits `initialize_game_registry`. A failure usually means the
    /// registry already exists, so it is reported as ready.
    #[instrument(skip(self, now))]
    pub async fn initialize_registry(&mut self, now: Instant) {
        if !self.link.is_connected() {
            self.notices
                .push("Please connect wallet first", NoticeKind::Error, now);
            return;
        }
        let payload = self.link.contract().initialize_game_registry();
        match self.link.submit(&payload).await {
            Ok(_) => {
                self.registry_deployed = true;
                self.notices.push(
                    "Game registry initialized on blockchain!",
                    NoticeKind::Success,
                    now,
                );
            }
            Err(e) => {
                debug!(error = %e, "Game registry might already be initialized");
                self.notices
                    .push("Game registry ready!", NoticeKind::Info, now);
            }
        }
    }

    /// Submits `create_game_vs_computer`, returning the transaction hash.
    #[instrument(skip(self, now))]
    pub async fn create_chain_game(&mut self, now: Instant) -> Option<String> {
        if !self.link.is_connected() {
            self.notices
                .push("Please connect wallet first", NoticeKind::Error, now);
            return None;
        }
        let payload = self.link.contract().create_game_vs_computer();
        match self.link.submit(&payload).await {
            Ok(tx) => {
                self.notices
                    .push("Game created on blockchain!", NoticeKind::Success, now);
                Some(tx.hash)
            }
            Err(e) => {
                warn!(error = %e, "Create game error");
                self.notices.push(
                    "Failed to create game on blockchain",
                    NoticeKind::Error,
                    now,
                );
                None
            }
        }
    }
}
