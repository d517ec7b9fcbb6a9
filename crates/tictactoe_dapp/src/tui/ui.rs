//! Stateless UI rendering.

use super::app::{App, FIELD_SIZE, InputMode, Screen};
use crate::dapp::{DappController, HistoryOutcome};
use crate::local_game::LocalSession;
use crate::notice::{NoticeBoard, NoticeKind};
use crate::storage::KeyValueStore;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tictactoe_core::{Board, GameStatus, Player, Position, Square, WinningLine, rules};

/// Draws the whole screen.
pub fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(13),   // Board and sidebar
            Constraint::Length(5), // Notices
            Constraint::Length(1), // Keys
        ])
        .split(frame.area());

    let title = match app.screen() {
        Screen::Local(_) => "Tic Tac Toe",
        Screen::Dapp(_) => "Tic Tac Toe - Aptos",
    };
    let title = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(44)])
        .split(chunks[1]);

    let (notices, help) = match app.screen() {
        Screen::Local(session) => {
            draw_board(frame, body[0], session.board(), app.cursor(), session.winning_line());
            draw_local_sidebar(frame, body[1], session);
            (
                session.notices(),
                "arrows/1-9 move  enter place  r reset  c connect  g registry  n chain game  q quit",
            )
        }
        Screen::Dapp(dapp) => {
            let empty = Board::new();
            let (board, line) = match dapp.current_game() {
                Some(game) => (
                    game.board(),
                    matches!(game.status(), GameStatus::XWins | GameStatus::OWins)
                        .then(|| rules::winning_line(game.board()))
                        .flatten(),
                ),
                None => (&empty, None),
            };
            draw_board(frame, body[0], board, app.cursor(), line);
            draw_dapp_sidebar(frame, body[1], dapp);
            (
                dapp.notices(),
                "c connect  d disconnect  m demo  n vs computer  p vs player  h history  g registry  r reset  q quit",
            )
        }
    };

    draw_particles(frame, body[0], app);
    draw_notices(frame, chunks[2], notices, app.input());

    let help = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_board(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    cursor: Position,
    line: Option<WinningLine>,
) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for (i, row) in [0, 2, 4].into_iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
            ])
            .split(rows[row]);
        for (j, col) in [0, 2, 4].into_iter().enumerate() {
            if let Some(pos) = Position::from_index(i * 3 + j) {
                draw_cell(frame, cols[col], board, cursor, pos, line);
            }
        }
        for sep in [1, 3] {
            frame.render_widget(
                Paragraph::new("│\n│\n│").style(Style::default().fg(Color::DarkGray)),
                cols[sep],
            );
        }
        if row < 4 {
            frame.render_widget(
                Paragraph::new("─".repeat(board_area.width as usize))
                    .style(Style::default().fg(Color::DarkGray)),
                rows[row + 1],
            );
        }
    }
}

fn draw_cell(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    cursor: Position,
    pos: Position,
    line: Option<WinningLine>,
) {
    let (symbol, mut style) = match board.get(pos) {
        Square::Empty => (" ", Style::default().fg(Color::DarkGray)),
        Square::Occupied(Player::X) => (
            "X",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Player::O) => (
            "O",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    if line.is_some_and(|l| l.contains(pos)) {
        style = style.bg(Color::Green).fg(Color::Black);
    }
    if pos == cursor {
        style = style.bg(Color::White).fg(Color::Black);
    }

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {symbol}   "), style)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_particles<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let buf = frame.buffer_mut();
    for particle in app.field().particles() {
        if !(0.0..FIELD_SIZE).contains(&particle.x) || !(0.0..FIELD_SIZE).contains(&particle.y) {
            continue;
        }
        let col = area.x + (particle.x / FIELD_SIZE * f64::from(area.width)) as u16;
        let row = area.y + (particle.y / FIELD_SIZE * f64::from(area.height)) as u16;
        // Only blank cells, so marks and highlights stay readable
        if let Some(cell) = buf.cell_mut((col, row))
            && cell.symbol() == " "
        {
            let symbol = if particle.size > 4.0 { "•" } else { "·" };
            cell.set_symbol(symbol).set_fg(particle.color);
        }
    }
}

fn draw_local_sidebar<S: KeyValueStore>(frame: &mut Frame, area: Rect, session: &LocalSession<S>) {
    let score = session.score();
    let wallet = match session.link().account() {
        Some(account) => account.address.abbreviated(),
        None => "Not connected".to_string(),
    };
    let lines = vec![
        Line::from(Span::styled(
            session.status_text(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("X ", Style::default().fg(Color::Blue)),
            Span::raw(score.x_wins.to_string()),
            Span::raw("   vs   "),
            Span::styled("O ", Style::default().fg(Color::Red)),
            Span::raw(score.o_wins.to_string()),
        ]),
        Line::from(""),
        Line::from(format!("Wallet: {wallet}")),
        Line::from(Span::styled(
            session.blockchain_status_text(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Game").borders(Borders::ALL));
    frame.render_widget(sidebar, area);
}

fn draw_dapp_sidebar(frame: &mut Frame, area: Rect, dapp: &DappController) {
    let mut lines = vec![Line::from(format!("Wallet: {}", dapp.wallet_label()))];

    if let Some(game) = dapp.current_game() {
        lines.push(Line::from(format!(
            "Game #{} vs {}",
            game.id(),
            dapp.opponent_label().unwrap_or_default()
        )));
        let status = dapp
            .result_text()
            .or_else(|| dapp.turn_text())
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            status,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from("No active game"));
    }

    let stats = dapp.stats();
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Total {}  Active {}  Completed {}  Yours {}",
        stats.total, stats.active, stats.completed, stats.your_games
    )));
    lines.push(Line::from(""));

    let history = dapp.history();
    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "No games yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for entry in history {
        let color = match entry.outcome() {
            HistoryOutcome::Won => Color::Green,
            HistoryOutcome::Lost => Color::Red,
            HistoryOutcome::Draw => Color::Yellow,
            HistoryOutcome::Ongoing => Color::Cyan,
        };
        lines.push(Line::from(vec![
            Span::raw(entry.title()),
            Span::raw("  "),
            Span::styled(entry.outcome().to_string(), Style::default().fg(color)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  Moves: {}  Created: {}", entry.moves(), entry.created()),
            Style::default().fg(Color::DarkGray),
        )));
        if let Some(finished) = entry.finished() {
            lines.push(Line::from(Span::styled(
                format!("  Finished: {finished}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Game").borders(Borders::ALL));
    frame.render_widget(sidebar, area);
}

fn draw_notices(frame: &mut Frame, area: Rect, notices: &NoticeBoard, input: &InputMode) {
    let mut lines: Vec<Line> = notices
        .notices()
        .iter()
        .rev()
        .map(|notice| {
            let color = match notice.kind() {
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
                NoticeKind::Info => Color::Cyan,
            };
            Line::from(Span::styled(notice.message().clone(), Style::default().fg(color)))
        })
        .collect();
    if let InputMode::Address(buffer) = input {
        lines.insert(
            0,
            Line::from(format!("Opponent address: {buffer}_  (enter to create, esc to cancel)")),
        );
    }
    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    frame.render_widget(panel, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
