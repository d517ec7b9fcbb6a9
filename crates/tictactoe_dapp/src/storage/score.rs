//! Persisted win counters.

use super::{KeyValueStore, StorageError};
use serde::{Deserialize, Serialize};
use tictactoe_core::Player;
use tracing::{info, instrument, warn};

/// Key holding X's win count.
pub const SCORE_X_KEY: &str = "ticTacToeScoreX";
/// Key holding O's win count.
pub const SCORE_O_KEY: &str = "ticTacToeScoreO";

/// Win counters for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
}

impl Score {
    /// Adds one win for `player`.
    pub fn record_win(&mut self, player: Player) {
        match player {
            Player::X => self.x_wins = self.x_wins.saturating_add(1),
            Player::O => self.o_wins = self.o_wins.saturating_add(1),
        }
    }

    /// Wins for `player`.
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x_wins,
            Player::O => self.o_wins,
        }
    }
}

/// Reads and writes [`Score`] through a key-value store.
#[derive(Debug)]
pub struct ScoreStore<S> {
    store: S,
}

impl<S: KeyValueStore> ScoreStore<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads both counters. Missing keys count as zero, as do values that
    /// do not parse (with a warning).
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Score, StorageError> {
        let score = Score {
            x_wins: self.read_counter(SCORE_X_KEY)?,
            o_wins: self.read_counter(SCORE_O_KEY)?,
        };
        info!(x = score.x_wins, o = score.o_wins, "Score loaded");
        Ok(score)
    }

    /// Writes both counters.
    #[instrument(skip(self))]
    pub fn save(&mut self, score: &Score) -> Result<(), StorageError> {
        self.store.set(SCORE_X_KEY, &score.x_wins.to_string())?;
        self.store.set(SCORE_O_KEY, &score.o_wins.to_string())?;
        Ok(())
    }

    /// Removes both counters.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.store.remove(SCORE_X_KEY)?;
        self.store.remove(SCORE_O_KEY)?;
        info!("Score reset");
        Ok(())
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_counter(&self, key: &str) -> Result<u32, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(0);
        };
        match raw.trim().parse::<u32>() {
            Ok(n) => Ok(n),
            Err(e) => {
                warn!(key, value = %raw, error = %e, "Unparsable score value, using 0");
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    #[test]
    fn test_missing_keys_load_as_zero() {
        let scores = ScoreStore::new(MemoryStore::new());
        assert_eq!(scores.load().unwrap(), Score::default());
    }

    #[test]
    fn test_garbage_value_loads_as_zero() {
        let mut store = MemoryStore::new();
        store.set(SCORE_X_KEY, "NaN").unwrap();
        store.set(SCORE_O_KEY, "4").unwrap();
        let scores = ScoreStore::new(store);
        assert_eq!(scores.load().unwrap(), Score { x_wins: 0, o_wins: 4 });
    }

    #[test]
    fn test_saved_score_reloads_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut score = Score::default();
        score.record_win(Player::X);
        score.record_win(Player::X);
        score.record_win(Player::O);
        ScoreStore::new(FileStore::open(&path).unwrap())
            .save(&score)
            .unwrap();

        let reloaded = ScoreStore::new(FileStore::open(&path).unwrap())
            .load()
            .unwrap();
        assert_eq!(reloaded, score);
        assert_eq!(reloaded.wins(Player::X), 2);
    }

    #[test]
    fn test_win_at_counter_limit_stays_at_limit() {
        let mut store = MemoryStore::new();
        store.set(SCORE_X_KEY, "4294967295").unwrap();
        let mut scores = ScoreStore::new(store);

        let mut score = scores.load().unwrap();
        assert_eq!(score.x_wins, u32::MAX);
        score.record_win(Player::X);
        score.record_win(Player::O);
        scores.save(&score).unwrap();

        let reloaded = scores.load().unwrap();
        assert_eq!(reloaded, Score { x_wins: u32::MAX, o_wins: 1 });
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut scores = ScoreStore::new(MemoryStore::new());
        scores.save(&Score { x_wins: 3, o_wins: 1 }).unwrap();
        scores.reset().unwrap();
        assert_eq!(scores.load().unwrap(), Score::default());
        assert_eq!(scores.store().get(SCORE_X_KEY).unwrap(), None);
    }
}
