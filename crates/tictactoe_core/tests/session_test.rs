//! Tests for the dApp session record.

use tictactoe_core::{Address, GameSession, GameStatus, MoveError, Participant, Player, Position};

fn alice() -> Address {
    Address::new(format!("0x{}", "a1".repeat(32)))
}

#[test]
fn test_x_win_credits_player_x() {
    let mut game = GameSession::new(1, alice(), Participant::Computer, 1_000);
    let moves = [
        Position::TopLeft,
        Position::Center,
        Position::TopCenter,
        Position::BottomRight,
        Position::TopRight,
    ];
    for pos in moves {
        game.apply_move(pos, 1_010).expect("valid move");
    }

    assert_eq!(game.status(), GameStatus::XWins);
    assert_eq!(game.winner(), Some(&Participant::Account(alice())));
    assert_eq!(game.moves_count(), 5);
    assert_eq!(game.finished_at(), Some(1_010));
}

#[test]
fn test_nine_moves_without_line_is_draw() {
    let bob = Address::new(format!("0x{}", "b2".repeat(32)));
    let mut game = GameSession::new(2, alice(), Participant::Account(bob), 1_000);
    let moves = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::Center,
        Position::MiddleLeft,
        Position::MiddleRight,
        Position::BottomCenter,
        Position::BottomLeft,
        Position::BottomRight,
    ];
    for (i, pos) in moves.into_iter().enumerate() {
        let expected = if i % 2 == 0 { Player::X } else { Player::O };
        assert_eq!(game.current_player(), expected);
        game.apply_move_as(expected, pos, 2_000 + i as i64)
            .expect("valid move");
    }

    assert_eq!(game.status(), GameStatus::Draw);
    assert_eq!(game.winner(), None);
    assert_eq!(game.finished_at(), Some(2_008));
    assert_eq!(game.board().filled(), 9);
}

#[test]
fn test_finished_session_rejects_moves() {
    let mut game = GameSession::new(3, alice(), Participant::Computer, 0);
    for pos in [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::TopCenter,
        Position::Center,
        Position::TopRight,
    ] {
        game.apply_move(pos, 5).expect("valid move");
    }
    assert_eq!(
        game.apply_move_as(Player::O, Position::BottomLeft, 6),
        Err(MoveError::GameOver)
    );
    assert_eq!(game.moves_count(), 5);
}

#[test]
fn test_session_serializes_to_json() {
    let game = GameSession::new(4, alice(), Participant::Computer, 42);
    let json = serde_json::to_string(&game).expect("serializable");
    let back: GameSession = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, game);
}
