//! Game history rows for the connected account.

use crate::wallet::GameSummary;
use chrono::DateTime;
use derive_getters::Getters;
use derive_new::new;
use tictactoe_core::{Address, GameStatus, Participant};

/// How a past game ended from the local player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HistoryOutcome {
    /// Still being played.
    Ongoing,
    /// Nobody won.
    Draw,
    /// The local player won.
    Won,
    /// Someone else won.
    Lost,
}

impl HistoryOutcome {
    /// Outcome of `game` for `me`.
    pub fn of(game: &GameSummary, me: &Address) -> Self {
        match game.status {
            GameStatus::Ongoing => HistoryOutcome::Ongoing,
            GameStatus::Draw => HistoryOutcome::Draw,
            GameStatus::XWins | GameStatus::OWins => match &game.winner {
                Some(Participant::Account(winner)) if winner == me => HistoryOutcome::Won,
                _ => HistoryOutcome::Lost,
            },
        }
    }
}

/// One rendered history row.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct HistoryEntry {
    id: u64,
    opponent: String,
    outcome: HistoryOutcome,
    moves: String,
    created: String,
    finished: Option<String>,
}

impl HistoryEntry {
    /// Row heading, `Game #id vs opponent`.
    pub fn title(&self) -> String {
        format!("Game #{} vs {}", self.id, self.opponent)
    }
}

/// Label for the O seat as seen by `me`.
pub fn opponent_label(player_o: &Participant, me: &Address) -> String {
    match player_o {
        Participant::Computer => "Computer".to_string(),
        Participant::Account(address) if address == me => "You (O)".to_string(),
        Participant::Account(address) => address.abbreviated(),
    }
}

/// Formats epoch seconds as `Nov 14, 2023, 10:13 PM UTC`.
pub fn format_timestamp(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(at) => at.format("%b %-d, %Y, %-I:%M %p UTC").to_string(),
        None => format!("@{secs}"),
    }
}

/// History rows for `me`, newest first.
pub fn build_history(games: &[GameSummary], me: &Address) -> Vec<HistoryEntry> {
    let mut sorted: Vec<&GameSummary> = games.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    sorted
        .into_iter()
        .map(|game| {
            HistoryEntry::new(
                game.id,
                opponent_label(&game.player_o, me),
                HistoryOutcome::of(game, me),
                format!("{}/9", game.moves_count),
                format_timestamp(game.created_at),
                game.finished_at.map(format_timestamp),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64, created_at: i64, status: GameStatus, winner: Option<Participant>) -> GameSummary {
        GameSummary {
            id,
            player_x: Address::new("0xme"),
            player_o: Participant::Computer,
            status,
            moves_count: 5,
            created_at,
            finished_at: status.is_finished().then_some(created_at + 60),
            winner,
        }
    }

    #[test]
    fn test_history_is_newest_first_with_outcomes() {
        let me = Address::new("0xme");
        let games = vec![
            summary(1, 100, GameStatus::XWins, Some(Participant::Account(me.clone()))),
            summary(2, 300, GameStatus::Ongoing, None),
            summary(3, 200, GameStatus::OWins, Some(Participant::Computer)),
        ];
        let rows = build_history(&games, &me);
        let ids: Vec<u64> = rows.iter().map(|r| *r.id()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(rows[0].outcome(), &HistoryOutcome::Ongoing);
        assert_eq!(rows[0].finished(), &None);
        assert_eq!(rows[1].outcome(), &HistoryOutcome::Lost);
        assert_eq!(rows[2].outcome(), &HistoryOutcome::Won);
        assert_eq!(rows[2].moves(), "5/9");
        assert_eq!(rows[2].title(), "Game #1 vs Computer");
    }

    #[test]
    fn test_opponent_labels() {
        let me = Address::new("0xme");
        assert_eq!(opponent_label(&Participant::Account(me.clone()), &me), "You (O)");
        let other = Address::new(format!("0x{}", "b".repeat(64)));
        assert_eq!(
            opponent_label(&Participant::Account(other.clone()), &me),
            other.abbreviated()
        );
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(1_700_000_000), "Nov 14, 2023, 10:13 PM UTC");
    }
}
