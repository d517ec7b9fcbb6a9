//! The particle field drawn over the board.

use super::particle::{CELEBRATION_PALETTE, Particle, ParticleKind};
use crate::event::BoardEvent;
use crate::schedule::Timeline;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use ratatui::style::Color;
use std::time::{Duration, Instant};
use tictactoe_core::{Player, Position, WinningLine};
use tracing::{debug, instrument};

const WIN_CELL_STAGGER: Duration = Duration::from_millis(200);
const CELEBRATION_PAUSE: Duration = Duration::from_millis(500);
const CELEBRATION_STAGGER: Duration = Duration::from_millis(20);
const TRAIL_STAGGER: Duration = Duration::from_millis(100);

/// A burst waiting for its start time.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Burst {
    Win(Position),
    Magical { x: f64, y: f64 },
    CelebrationDrop,
}

/// Live particles in a `width` × `height` space with y growing downwards.
/// The board fills the middle third of each axis.
#[derive(Debug)]
pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    pending: Timeline<Burst>,
    rng: StdRng,
}

impl ParticleField {
    /// Empty field.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            particles: Vec::new(),
            pending: Timeline::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Fixes random launches.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Field width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Field height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Live particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether nothing is alive or waiting.
    pub fn is_idle(&self) -> bool {
        self.particles.is_empty() && self.pending.is_empty()
    }

    /// Centre of `position` in field coordinates.
    pub fn cell_center(&self, position: Position) -> (f64, f64) {
        let col = position.col() as f64;
        let row = position.row() as f64;
        (
            self.width / 3.0 + (col + 0.5) * self.width / 9.0,
            self.height / 3.0 + (row + 0.5) * self.height / 9.0,
        )
    }

    /// Where the score counter of `player` sits.
    pub fn score_anchor(&self, player: Player) -> (f64, f64) {
        match player {
            Player::X => (self.width * 0.15, self.height * 0.1),
            Player::O => (self.width * 0.85, self.height * 0.1),
        }
    }

    fn burst(&mut self, kind: ParticleKind, x: f64, y: f64, color: Option<Color>) {
        for _ in 0..kind.burst_size() {
            let particle = Particle::launch(kind, x, y, color, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// One teal spark at `(x, y)`.
    pub fn spawn_ambient(&mut self, x: f64, y: f64) {
        self.burst(ParticleKind::Ambient, x, y, None);
    }

    /// Burst where `player` placed a mark.
    pub fn spawn_click(&mut self, position: Position, player: Player) {
        let (x, y) = self.cell_center(position);
        let color = match player {
            Player::X => Color::Rgb(0x64, 0xb5, 0xf6),
            Player::O => Color::Rgb(0xff, 0x57, 0x22),
        };
        self.burst(ParticleKind::Click, x, y, Some(color));
    }

    /// Green burst over one winning cell.
    pub fn spawn_win(&mut self, position: Position) {
        let (x, y) = self.cell_center(position);
        self.burst(ParticleKind::Win, x, y, None);
    }

    /// Gold burst over the score of `player`.
    pub fn spawn_fireworks(&mut self, player: Player) {
        let (x, y) = self.score_anchor(player);
        self.burst(ParticleKind::Firework, x, y, None);
    }

    /// Five rising sparks over `position`, 100 ms apart.
    pub fn spawn_magical_trail(&mut self, position: Position, now: Instant) {
        let (x, y) = self.cell_center(position);
        for i in 0..ParticleKind::Magical.burst_size() as u32 {
            self.pending
                .schedule(now, TRAIL_STAGGER * i, Burst::Magical { x, y });
        }
    }

    /// Win bursts cell by cell, then confetti across the top edge.
    #[instrument(skip(self, now))]
    pub fn trigger_win_sequence(&mut self, line: WinningLine, now: Instant) {
        let cells = line.positions();
        for (i, position) in cells.iter().enumerate() {
            self.pending
                .schedule(now, WIN_CELL_STAGGER * i as u32, Burst::Win(*position));
        }
        let start = WIN_CELL_STAGGER * cells.len() as u32 + CELEBRATION_PAUSE;
        for i in 0..ParticleKind::Celebration.burst_size() as u32 {
            self.pending
                .schedule(now, start + CELEBRATION_STAGGER * i, Burst::CelebrationDrop);
        }
        debug!(pending = self.pending.len(), "Win sequence queued");
    }

    /// Effects for a board change.
    pub fn on_board_event(&mut self, event: &BoardEvent, now: Instant) {
        match event {
            BoardEvent::Placed { player, position } => self.spawn_click(*position, *player),
            BoardEvent::Won {
                player,
                position,
                line,
            } => {
                self.spawn_click(*position, *player);
                self.trigger_win_sequence(*line, now);
            }
            BoardEvent::Draw { position } => {
                let (x, y) = self.cell_center(*position);
                self.burst(ParticleKind::Click, x, y, None);
            }
        }
    }

    fn release(&mut self, now: Instant) {
        for burst in self.pending.due(now) {
            match burst {
                Burst::Win(position) => self.spawn_win(position),
                Burst::Magical { x, y } => {
                    let particle = Particle::launch(ParticleKind::Magical, x, y, None, &mut self.rng);
                    self.particles.push(particle);
                }
                Burst::CelebrationDrop => {
                    let x = self.rng.random_range(0.0..self.width.max(1.0));
                    let color = CELEBRATION_PALETTE.choose(&mut self.rng).copied();
                    let particle =
                        Particle::launch(ParticleKind::Celebration, x, -10.0, color, &mut self.rng);
                    self.particles.push(particle);
                }
            }
        }
    }

    /// Advances every particle one step and drops the dead ones.
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Releases due bursts, then steps.
    pub fn tick(&mut self, now: Instant) {
        self.release(now);
        self.step();
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.pending.clear();
    }
}
