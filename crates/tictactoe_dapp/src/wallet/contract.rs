//! Payload builders and view decoders for the `tic_tac_toe` Move module.
//!
//! View results arrive in chain JSON: integers may be numbers or decimal
//! strings, and two sentinel addresses stand for the computer and for
//! "nobody".

use super::{EntryFunctionPayload, ViewRequest, WalletError, WalletErrorKind};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use tictactoe_core::{Address, Board, GameSession, GameStatus, Participant, Player, Position};
use tracing::{debug, instrument, warn};

/// Address standing for the computer opponent.
pub const COMPUTER_SENTINEL: &str = "@0x1";
/// Address standing for "no winner".
pub const NOBODY_SENTINEL: &str = "@0x0";

/// Contract-wide counters plus the size of the caller's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Games ever created in the registry.
    pub total: u64,
    /// Games still ongoing.
    pub active: u64,
    /// Games finished.
    pub completed: u64,
    /// Games in the loaded history of the connected account.
    pub your_games: usize,
}

/// One row of `get_player_games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Game id.
    pub id: u64,
    /// Account playing X.
    pub player_x: Address,
    /// Participant playing O.
    pub player_o: Participant,
    /// Status at the time of the view.
    pub status: GameStatus,
    /// Marks placed.
    pub moves_count: u8,
    /// Creation time, seconds.
    pub created_at: i64,
    /// Finish time, seconds; absent while ongoing.
    pub finished_at: Option<i64>,
    /// Winner; absent for draws and ongoing games.
    pub winner: Option<Participant>,
}

impl From<&GameSession> for GameSummary {
    fn from(game: &GameSession) -> Self {
        Self {
            id: game.id(),
            player_x: game.player_x().clone(),
            player_o: game.player_o().clone(),
            status: game.status(),
            moves_count: game.moves_count(),
            created_at: game.created_at(),
            finished_at: game.finished_at(),
            winner: game.winner().cloned(),
        }
    }
}

/// Maps an address string to a participant; the "nobody" sentinel yields
/// `None`.
pub(crate) fn decode_participant(raw: &str) -> Option<Participant> {
    match raw {
        NOBODY_SENTINEL => None,
        COMPUTER_SENTINEL => Some(Participant::Computer),
        other => Some(Participant::Account(Address::new(other))),
    }
}

/// Inverse of [`decode_participant`].
pub(crate) fn encode_participant(participant: Option<&Participant>) -> String {
    match participant {
        None => NOBODY_SENTINEL.to_string(),
        Some(Participant::Computer) => COMPUTER_SENTINEL.to_string(),
        Some(Participant::Account(address)) => address.as_str().to_string(),
    }
}

/// Integer that may be encoded as a JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(u64),
    Text(String),
}

impl Lenient {
    fn value<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            Lenient::Number(n) => Ok(n),
            Lenient::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected integer, found {s:?}"))),
        }
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Lenient::deserialize(deserializer)?.value()
}

fn lenient_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    Vec::<Lenient>::deserialize(deserializer)?
        .into_iter()
        .map(Lenient::value)
        .collect()
}

fn default_mover() -> u64 {
    u64::from(Player::X.code())
}

/// A game record as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
struct RawGame {
    #[serde(deserialize_with = "lenient_u64")]
    id: u64,
    player_x: String,
    player_o: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    board: Vec<u64>,
    #[serde(default = "default_mover", deserialize_with = "lenient_u64")]
    current_player: u64,
    #[serde(deserialize_with = "lenient_u64")]
    game_status: u64,
    #[serde(deserialize_with = "lenient_u64")]
    moves_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    created_at: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    finished_at: u64,
    #[serde(default)]
    winner: Option<String>,
}

#[track_caller]
fn decode_error(message: impl Into<String>) -> WalletError {
    WalletError::new(WalletErrorKind::Decode(message.into()))
}

fn narrow<T: TryFrom<u64>>(value: u64, field: &str) -> Result<T, WalletError> {
    T::try_from(value).map_err(|_| decode_error(format!("{field} out of range: {value}")))
}

impl RawGame {
    fn summary(&self) -> Result<GameSummary, WalletError> {
        let status = GameStatus::from_code(narrow(self.game_status, "game_status")?)
            .ok_or_else(|| decode_error(format!("unknown game status {}", self.game_status)))?;
        let player_o = decode_participant(&self.player_o)
            .ok_or_else(|| decode_error("player_o is the nobody sentinel"))?;
        Ok(GameSummary {
            id: self.id,
            player_x: Address::new(&self.player_x),
            player_o,
            status,
            moves_count: narrow(self.moves_count, "moves_count")?,
            created_at: narrow(self.created_at, "created_at")?,
            finished_at: match self.finished_at {
                0 => None,
                t => Some(narrow(t, "finished_at")?),
            },
            winner: self.winner.as_deref().and_then(decode_participant),
        })
    }

    fn session(&self) -> Result<GameSession, WalletError> {
        let summary = self.summary()?;
        let codes = self
            .board
            .iter()
            .map(|c| narrow::<u8>(*c, "board"))
            .collect::<Result<Vec<_>, _>>()?;
        let board = Board::from_codes(&codes).map_err(|e| decode_error(e.to_string()))?;
        let current_player = match self.current_player {
            1 => Player::X,
            2 => Player::O,
            other => return Err(decode_error(format!("unknown current player {other}"))),
        };
        Ok(GameSession::from_record(
            summary.id,
            summary.player_x,
            summary.player_o,
            board,
            current_player,
            summary.status,
            summary.moves_count,
            summary.created_at,
            summary.finished_at,
            summary.winner,
        ))
    }
}

/// Function paths and codecs for one deployed module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToeContract {
    module_address: String,
}

impl TicTacToeContract {
    /// Contract deployed at `module_address`.
    pub fn new(module_address: impl Into<String>) -> Self {
        Self {
            module_address: module_address.into(),
        }
    }

    /// Module address.
    pub fn module_address(&self) -> &str {
        &self.module_address
    }

    /// Fully qualified path of `name`.
    pub fn function(&self, name: &str) -> String {
        format!("{}::tic_tac_toe::{}", self.module_address, name)
    }

    /// `initialize_game_registry()`.
    pub fn initialize_game_registry(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(self.function("initialize_game_registry"), Vec::new())
    }

    /// `create_game_vs_computer()`.
    pub fn create_game_vs_computer(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(self.function("create_game_vs_computer"), Vec::new())
    }

    /// `create_game_vs_player(opponent)`.
    pub fn create_game_vs_player(&self, opponent: &Address) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.function("create_game_vs_player"),
            vec![json!(opponent.as_str())],
        )
    }

    /// `make_move(registry, game_id, position)`; id and position travel as
    /// decimal strings.
    pub fn make_move(
        &self,
        registry: &Address,
        game_id: u64,
        position: Position,
    ) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.function("make_move"),
            vec![
                json!(registry.as_str()),
                json!(game_id.to_string()),
                json!(position.to_index().to_string()),
            ],
        )
    }

    /// `get_game_stats(registry)`.
    pub fn get_game_stats(&self, registry: &Address) -> ViewRequest {
        ViewRequest::new(self.function("get_game_stats"), vec![json!(registry.as_str())])
    }

    /// `get_active_games(registry)`.
    pub fn get_active_games(&self, registry: &Address) -> ViewRequest {
        ViewRequest::new(self.function("get_active_games"), vec![json!(registry.as_str())])
    }

    /// `get_player_games(registry, player)`.
    pub fn get_player_games(&self, registry: &Address, player: &Address) -> ViewRequest {
        ViewRequest::new(
            self.function("get_player_games"),
            vec![json!(registry.as_str()), json!(player.as_str())],
        )
    }

    /// Decodes `[total, active, completed]`. `your_games` is left at zero.
    #[instrument(skip(values), fields(len = values.len()))]
    pub fn decode_game_stats(values: &[Value]) -> Result<GameStats, WalletError> {
        let [total, active, completed] = values else {
            return Err(decode_error(format!(
                "expected 3 stat values, found {}",
                values.len()
            )));
        };
        let number = |v: &Value| {
            lenient_u64(v).map_err(|e| decode_error(format!("bad stat value: {e}")))
        };
        let stats = GameStats {
            total: number(total)?,
            active: number(active)?,
            completed: number(completed)?,
            your_games: 0,
        };
        debug!(?stats, "Decoded game stats");
        Ok(stats)
    }

    /// Decodes the first view value as a list of full game records.
    #[instrument(skip(values))]
    pub fn decode_active_games(values: &[Value]) -> Result<Vec<GameSession>, WalletError> {
        Self::raw_games(values)?.iter().map(RawGame::session).collect()
    }

    /// Decodes the first view value as a list of history rows.
    #[instrument(skip(values))]
    pub fn decode_player_games(values: &[Value]) -> Result<Vec<GameSummary>, WalletError> {
        Self::raw_games(values)?.iter().map(RawGame::summary).collect()
    }

    fn raw_games(values: &[Value]) -> Result<Vec<RawGame>, WalletError> {
        match values.first() {
            None | Some(Value::Null) => {
                warn!("View returned no game list");
                Ok(Vec::new())
            }
            Some(list) => Ok(Vec::<RawGame>::deserialize(list)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> TicTacToeContract {
        TicTacToeContract::new("0xmod")
    }

    #[test]
    fn test_make_move_arguments_are_strings() {
        let payload = contract().make_move(&Address::new("0xreg"), 42, Position::BottomRight);
        assert_eq!(payload.function, "0xmod::tic_tac_toe::make_move");
        assert_eq!(payload.arguments, vec![json!("0xreg"), json!("42"), json!("8")]);
    }

    #[test]
    fn test_stats_accept_numbers_and_strings() {
        let stats =
            TicTacToeContract::decode_game_stats(&[json!("5"), json!(1), json!("4")]).unwrap();
        assert_eq!((stats.total, stats.active, stats.completed), (5, 1, 4));
        assert!(TicTacToeContract::decode_game_stats(&[json!(1)]).is_err());
    }

    #[test]
    fn test_player_games_map_sentinels() {
        let values = vec![json!([
            {
                "id": "2",
                "player_x": "0xme",
                "player_o": "@0x1",
                "game_status": "3",
                "moves_count": "9",
                "created_at": "1700000000",
                "finished_at": "1700000800",
                "winner": "@0x0"
            },
            {
                "id": 3,
                "player_x": "0xme",
                "player_o": "0xfriend",
                "game_status": 0,
                "moves_count": 2,
                "created_at": 1700001000,
                "finished_at": 0,
                "winner": "@0x0"
            }
        ])];
        let games = TicTacToeContract::decode_player_games(&values).unwrap();
        assert_eq!(games[0].player_o, Participant::Computer);
        assert_eq!(games[0].status, GameStatus::Draw);
        assert_eq!(games[0].winner, None);
        assert_eq!(games[0].finished_at, Some(1_700_000_800));
        assert_eq!(
            games[1].player_o,
            Participant::Account(Address::new("0xfriend"))
        );
        assert_eq!(games[1].finished_at, None);
    }

    #[test]
    fn test_active_game_decodes_board() {
        let values = vec![json!([{
            "id": "9",
            "player_x": "0xme",
            "player_o": "@0x1",
            "board": ["1", "0", "0", "0", "2", "0", "0", "0", "0"],
            "current_player": "1",
            "game_status": "0",
            "moves_count": "2",
            "created_at": "1700000000",
            "finished_at": "0",
            "winner": "@0x0"
        }])];
        let games = TicTacToeContract::decode_active_games(&values).unwrap();
        let game = &games[0];
        assert_eq!(game.id(), 9);
        assert_eq!(game.board().to_codes(), [1, 0, 0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(game.current_player(), Player::X);
        assert!(game.is_vs_computer());
    }

    #[test]
    fn test_unknown_status_is_decode_error() {
        let values = vec![json!([{
            "id": 1, "player_x": "0xme", "player_o": "@0x1",
            "game_status": 7, "moves_count": 0, "created_at": 0
        }])];
        let err = TicTacToeContract::decode_player_games(&values).unwrap_err();
        assert!(matches!(err.kind(), WalletErrorKind::Decode(_)));
    }
}
