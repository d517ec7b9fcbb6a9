//! On-chain style game record.
//!
//! A [`GameSession`] mirrors the record kept by the tic-tac-toe contract:
//! participants, board, mover, status code, move count and timestamps. The
//! local user always plays X; O is another account or the computer.

use super::action::MoveError;
use super::rules::{self, Evaluation};
use super::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Account address as reported by the wallet (`0x…`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Wraps an address string without validation.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display form: first 12 characters, `...`, last 8.
    ///
    /// Addresses of 20 characters or fewer are returned whole.
    pub fn abbreviated(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 20 {
            return self.0.clone();
        }
        let head: String = chars[..12].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Someone who can occupy the O seat or win a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    /// The built-in computer opponent.
    Computer,
    /// A wallet account.
    Account(Address),
}

impl Participant {
    /// Whether this is the computer opponent.
    pub fn is_computer(&self) -> bool {
        matches!(self, Participant::Computer)
    }

    /// The account address, if this is not the computer.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Participant::Computer => None,
            Participant::Account(address) => Some(address),
        }
    }
}

/// Status of a session, with the contract's integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are still being accepted (code 0).
    Ongoing,
    /// X completed a line (code 1).
    XWins,
    /// O completed a line (code 2).
    OWins,
    /// Board filled without a line (code 3).
    Draw,
}

impl GameStatus {
    /// Contract status code.
    pub fn code(self) -> u8 {
        match self {
            GameStatus::Ongoing => 0,
            GameStatus::XWins => 1,
            GameStatus::OWins => 2,
            GameStatus::Draw => 3,
        }
    }

    /// Decodes a contract status code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GameStatus::Ongoing),
            1 => Some(GameStatus::XWins),
            2 => Some(GameStatus::OWins),
            3 => Some(GameStatus::Draw),
            _ => None,
        }
    }

    /// Whether the game has ended.
    pub fn is_finished(self) -> bool {
        self != GameStatus::Ongoing
    }

    /// Status reached when `player` wins.
    pub fn win_for(player: Player) -> Self {
        match player {
            Player::X => GameStatus::XWins,
            Player::O => GameStatus::OWins,
        }
    }
}

/// A dApp game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    id: u64,
    player_x: Address,
    player_o: Participant,
    board: Board,
    current_player: Player,
    status: GameStatus,
    moves_count: u8,
    created_at: i64,
    finished_at: Option<i64>,
    winner: Option<Participant>,
}

impl GameSession {
    /// Creates an ongoing session with an empty board and X to move.
    #[instrument(skip(player_x, player_o), fields(player_x = %player_x))]
    pub fn new(id: u64, player_x: Address, player_o: Participant, created_at: i64) -> Self {
        info!(id, vs_computer = player_o.is_computer(), "Creating game session");
        Self {
            id,
            player_x,
            player_o,
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::Ongoing,
            moves_count: 0,
            created_at,
            finished_at: None,
            winner: None,
        }
    }

    /// Rebuilds a session from a contract record.
    ///
    /// Fields are taken as reported; no rules are re-applied.
    #[allow(clippy::too_many_arguments)]
    pub fn from_record(
        id: u64,
        player_x: Address,
        player_o: Participant,
        board: Board,
        current_player: Player,
        status: GameStatus,
        moves_count: u8,
        created_at: i64,
        finished_at: Option<i64>,
        winner: Option<Participant>,
    ) -> Self {
        Self {
            id,
            player_x,
            player_o,
            board,
            current_player,
            status,
            moves_count,
            created_at,
            finished_at,
            winner,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Account playing X.
    pub fn player_x(&self) -> &Address {
        &self.player_x
    }

    /// Participant playing O.
    pub fn player_o(&self) -> &Participant {
        &self.player_o
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move (the last mover once finished).
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Marks placed so far.
    pub fn moves_count(&self) -> u8 {
        self.moves_count
    }

    /// Creation time, seconds since the epoch.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Finish time, seconds since the epoch.
    pub fn finished_at(&self) -> Option<i64> {
        self.finished_at
    }

    /// Winner, absent for draws and ongoing games.
    pub fn winner(&self) -> Option<&Participant> {
        self.winner.as_ref()
    }

    /// Whether O is the computer.
    pub fn is_vs_computer(&self) -> bool {
        self.player_o.is_computer()
    }

    /// The participant holding `player`'s seat.
    pub fn participant(&self, player: Player) -> Participant {
        match player {
            Player::X => Participant::Account(self.player_x.clone()),
            Player::O => self.player_o.clone(),
        }
    }

    /// Places the current mover's mark at `position`.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] once finished, [`MoveError::SquareOccupied`]
    /// for a taken square. The session is unchanged on error.
    #[instrument(skip(self), fields(id = self.id, mover = %self.current_player))]
    pub fn apply_move(&mut self, position: Position, now: i64) -> Result<GameStatus, MoveError> {
        if self.status.is_finished() {
            return Err(MoveError::GameOver);
        }
        if !self.board.is_empty(position) {
            return Err(MoveError::SquareOccupied(position));
        }

        let mover = self.current_player;
        self.board.set(position, Square::Occupied(mover));
        self.moves_count += 1;

        match rules::evaluate(&self.board) {
            Evaluation::Won { player, .. } => {
                self.status = GameStatus::win_for(player);
                self.winner = Some(self.participant(player));
                self.finished_at = Some(now);
                info!(winner = %player, moves = self.moves_count, "Session won");
            }
            Evaluation::Draw => {
                self.status = GameStatus::Draw;
                self.finished_at = Some(now);
                info!("Session drawn");
            }
            Evaluation::Ongoing => {
                self.current_player = mover.opponent();
                debug!(next = %self.current_player, "Turn passed");
            }
        }

        Ok(self.status)
    }

    /// Like [`GameSession::apply_move`], but only for `player`'s turn.
    ///
    /// # Errors
    ///
    /// [`MoveError::WrongPlayer`] when `player` is not to move, plus the
    /// errors of [`GameSession::apply_move`].
    pub fn apply_move_as(
        &mut self,
        player: Player,
        position: Position,
        now: i64,
    ) -> Result<GameStatus, MoveError> {
        if self.status.is_finished() {
            return Err(MoveError::GameOver);
        }
        if player != self.current_player {
            return Err(MoveError::WrongPlayer(player));
        }
        self.apply_move(position, now)
    }
}
