//! Application state and key handling.

use super::input::{digit_position, move_cursor};
use crate::dapp::DappController;
use crate::effects::ParticleField;
use crate::event::BoardEvent;
use crate::local_game::LocalSession;
use crate::storage::KeyValueStore;
use crossterm::event::KeyCode;
use std::time::Instant;
use tictactoe_core::Position;
use tracing::{debug, info, instrument};

/// Width and height of the particle space.
pub const FIELD_SIZE: f64 = 90.0;

/// Which game the screen is running.
#[derive(Debug)]
pub enum Screen<S> {
    /// Two players at one keyboard.
    Local(LocalSession<S>),
    /// Wallet-backed game against the computer or another account.
    Dapp(DappController),
}

/// What keystrokes currently mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Board and command keys.
    Normal,
    /// Typing an opponent address.
    Address(String),
}

/// Main application state.
#[derive(Debug)]
pub struct App<S> {
    screen: Screen<S>,
    cursor: Position,
    input: InputMode,
    field: ParticleField,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    /// Creates an application on `screen`.
    pub fn new(screen: Screen<S>) -> Self {
        Self {
            screen,
            cursor: Position::Center,
            input: InputMode::Normal,
            field: ParticleField::new(FIELD_SIZE, FIELD_SIZE),
            should_quit: false,
        }
    }

    /// Replaces the particle field (seeded fields in tests).
    pub fn with_field(mut self, field: ParticleField) -> Self {
        self.field = field;
        self
    }

    /// The running game.
    pub fn screen(&self) -> &Screen<S> {
        &self.screen
    }

    /// Highlighted cell.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Current input mode.
    pub fn input(&self) -> &InputMode {
        &self.input
    }

    /// Particles to draw.
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Startup work: restores a wallet connection (and schedules demo mode
    /// in the dApp when no wallet is found).
    #[instrument(skip(self, now))]
    pub async fn start(&mut self, now: Instant) {
        match &mut self.screen {
            Screen::Local(session) => session.check_connection().await,
            Screen::Dapp(dapp) => dapp.check_wallet_connection(now).await,
        }
    }

    /// Handles one key press.
    #[instrument(skip(self, now))]
    pub async fn handle_key(&mut self, code: KeyCode, now: Instant) {
        if let InputMode::Address(buffer) = &mut self.input {
            match code {
                KeyCode::Char(c) => buffer.push(c),
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Esc => self.input = InputMode::Normal,
                KeyCode::Enter => {
                    let address = std::mem::take(buffer);
                    self.input = InputMode::Normal;
                    if let Screen::Dapp(dapp) = &mut self.screen {
                        dapp.create_game_vs_player(&address, now).await;
                    }
                }
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') => {
                info!("User quit");
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                let next = move_cursor(self.cursor, code);
                if next != self.cursor {
                    self.cursor = next;
                    self.field.spawn_magical_trail(next, now);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.place(self.cursor, now).await,
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(position) = digit_position(c) {
                    self.cursor = position;
                    self.place(position, now).await;
                }
            }
            KeyCode::Char('r') => {
                self.field.clear();
                let (x, y) = self.field.cell_center(Position::Center);
                self.field.spawn_ambient(x, y);
                match &mut self.screen {
                    Screen::Local(session) => session.reset(),
                    Screen::Dapp(dapp) => dapp.reset_game(),
                }
            }
            KeyCode::Char(c) => self.command(c, now).await,
            _ => {}
        }
    }

    async fn command(&mut self, c: char, now: Instant) {
        match &mut self.screen {
            Screen::Local(session) => match c {
                'c' => session.connect_wallet(now).await,
                'g' => session.initialize_registry(now).await,
                'n' => {
                    session.create_chain_game(now).await;
                }
                _ => debug!(key = %c, "Unbound key"),
            },
            Screen::Dapp(dapp) => match c {
                'c' => dapp.connect_wallet(now).await,
                'd' => dapp.disconnect_wallet(now).await,
                'm' => dapp.enable_demo_mode(now).await,
                'n' => {
                    dapp.create_game_vs_computer(now).await;
                }
                'p' => self.input = InputMode::Address(String::new()),
                'h' => dapp.load_game_history().await,
                'g' => dapp.initialize_game_registry().await,
                _ => debug!(key = %c, "Unbound key"),
            },
        }
    }

    async fn place(&mut self, position: Position, now: Instant) {
        match &mut self.screen {
            Screen::Local(session) => {
                if let Some(event) = session.handle_cell_click(position, now) {
                    self.show(&event, now);
                }
            }
            Screen::Dapp(dapp) => dapp.handle_cell_click(position, now).await,
        }
    }

    fn show(&mut self, event: &BoardEvent, now: Instant) {
        self.field.on_board_event(event, now);
        if let (Screen::Local(_), BoardEvent::Won { player, .. }) = (&self.screen, event) {
            self.field.spawn_fireworks(*player);
        }
    }

    /// Runs deferred work and advances the particles.
    pub async fn tick(&mut self, now: Instant) {
        let events = match &mut self.screen {
            Screen::Local(session) => {
                session.tick(now);
                Vec::new()
            }
            Screen::Dapp(dapp) => {
                dapp.tick(now).await;
                dapp.take_events()
            }
        };
        for event in &events {
            self.show(event, now);
        }
        self.field.tick(now);
    }
}
