//! Tests for the typestate local game.

use tictactoe_core::{
    GameInProgress, GameResult, GameSetup, Move, MoveError, Outcome, Player, Position,
};

fn in_progress(result: GameResult) -> GameInProgress {
    match result {
        GameResult::InProgress(g) => g,
        GameResult::Finished(_) => panic!("Game shouldn't finish yet"),
    }
}

#[test]
fn test_typestate_lifecycle() {
    let game = GameSetup::new().start(Player::X);
    assert_eq!(game.to_move(), Player::X);

    let game = in_progress(game.play(Position::Center).expect("Valid move"));
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.valid_moves().len(), 8);
}

#[test]
fn test_occupied_square_rejected() {
    let game = GameSetup::new().start(Player::X);
    let game = in_progress(game.play(Position::Center).expect("Valid move"));

    let result = game.make_move(Move::new(Player::O, Position::Center));
    assert!(matches!(result, Err(MoveError::SquareOccupied(Position::Center))));
}

#[test]
fn test_wrong_player_rejected() {
    let game = GameSetup::new().start(Player::X);
    let result = game.make_move(Move::new(Player::O, Position::Center));
    assert!(matches!(result, Err(MoveError::WrongPlayer(Player::O))));
}

#[test]
fn test_turns_alternate_until_finish() {
    let order = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomCenter,
        Position::BottomLeft,
        Position::BottomRight,
    ];
    let mut game = GameSetup::new().start(Player::X);
    let mut expected = Player::X;

    for (i, pos) in order.iter().enumerate() {
        assert_eq!(game.to_move(), expected, "move {i}");
        match game.play(*pos).expect("Valid move") {
            GameResult::InProgress(g) => game = g,
            GameResult::Finished(done) => {
                // X completes the main diagonal on the ninth mark
                assert_eq!(i, 8);
                assert_eq!(done.outcome(), &Outcome::Winner(Player::X));
                return;
            }
        }
        expected = expected.opponent();
    }
    panic!("game never finished");
}

#[test]
fn test_replay_from_history() {
    let moves = vec![
        Move::new(Player::X, Position::TopLeft),
        Move::new(Player::O, Position::Center),
        Move::new(Player::X, Position::TopCenter),
        Move::new(Player::O, Position::BottomLeft),
        Move::new(Player::X, Position::TopRight),
    ];

    let GameResult::Finished(done) = GameInProgress::replay(&moves).expect("Valid replay") else {
        panic!("top row should finish the game");
    };
    assert_eq!(done.outcome().winner(), Some(Player::X));
    assert_eq!(
        done.winning_line().map(|line| line.indices()),
        Some([0, 1, 2])
    );
    assert_eq!(done.history(), moves.as_slice());
}

#[test]
fn test_replay_rejects_moves_after_finish() {
    let moves = vec![
        Move::new(Player::X, Position::TopLeft),
        Move::new(Player::O, Position::Center),
        Move::new(Player::X, Position::TopCenter),
        Move::new(Player::O, Position::BottomLeft),
        Move::new(Player::X, Position::TopRight),
        Move::new(Player::O, Position::BottomRight),
    ];
    assert!(matches!(
        GameInProgress::replay(&moves),
        Err(MoveError::GameOver)
    ));
}

#[test]
fn test_draw_has_no_line() {
    // X O X / X O O / O X X
    let moves = vec![
        Move::new(Player::X, Position::TopLeft),
        Move::new(Player::O, Position::TopCenter),
        Move::new(Player::X, Position::TopRight),
        Move::new(Player::O, Position::Center),
        Move::new(Player::X, Position::MiddleLeft),
        Move::new(Player::O, Position::MiddleRight),
        Move::new(Player::X, Position::BottomCenter),
        Move::new(Player::O, Position::BottomLeft),
        Move::new(Player::X, Position::BottomRight),
    ];

    let GameResult::Finished(done) = GameInProgress::replay(&moves).expect("Valid replay") else {
        panic!("full board should finish the game");
    };
    assert!(done.outcome().is_draw());
    assert_eq!(done.winning_line(), None);
    assert_eq!(done.outcome().to_string(), "It's a draw!");
}

#[test]
fn test_restart_gives_empty_board() {
    let moves = vec![
        Move::new(Player::X, Position::TopLeft),
        Move::new(Player::O, Position::Center),
        Move::new(Player::X, Position::TopCenter),
        Move::new(Player::O, Position::BottomLeft),
        Move::new(Player::X, Position::TopRight),
    ];
    let GameResult::Finished(done) = GameInProgress::replay(&moves).expect("Valid replay") else {
        panic!("top row should finish the game");
    };
    let setup = done.restart();
    assert_eq!(setup.board().filled(), 0);
}
