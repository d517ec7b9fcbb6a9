//! Particle kinds and their launch parameters.

use rand::Rng;
use ratatui::style::Color;

/// Downward acceleration added every step.
pub const GRAVITY: f64 = 0.1;

/// Colours dropped by the win celebration.
pub const CELEBRATION_PALETTE: [Color; 7] = [
    Color::Rgb(0xff, 0x6b, 0x6b),
    Color::Rgb(0x4e, 0xcd, 0xc4),
    Color::Rgb(0x45, 0xb7, 0xd1),
    Color::Rgb(0x96, 0xce, 0xb4),
    Color::Rgb(0xfe, 0xca, 0x57),
    Color::Rgb(0xff, 0x9f, 0xf3),
    Color::Rgb(0x54, 0xa0, 0xff),
];

/// Flavour of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, derive_more::Display)]
pub enum ParticleKind {
    /// Plain teal spark.
    Ambient,
    /// Green burst over a winning cell.
    Win,
    /// Burst where a mark was placed.
    Click,
    /// Slow rising trail behind the cursor.
    Magical,
    /// Gold radial burst over a changed score.
    Firework,
    /// Confetti falling from the top edge.
    Celebration,
}

impl ParticleKind {
    /// Life lost per step.
    pub fn decay(self) -> f64 {
        match self {
            ParticleKind::Ambient | ParticleKind::Magical => 0.01,
            ParticleKind::Win => 0.015,
            ParticleKind::Click => 0.02,
            ParticleKind::Firework => 0.025,
            ParticleKind::Celebration => 0.008,
        }
    }

    /// Particles spawned per burst.
    pub fn burst_size(self) -> usize {
        match self {
            ParticleKind::Ambient => 1,
            ParticleKind::Win => 20,
            ParticleKind::Click => 15,
            ParticleKind::Magical => 5,
            ParticleKind::Firework => 10,
            ParticleKind::Celebration => 100,
        }
    }
}

/// One moving point.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Kind.
    pub kind: ParticleKind,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
    /// Horizontal velocity per step.
    pub vx: f64,
    /// Vertical velocity per step.
    pub vy: f64,
    /// Remaining life, starting at 1.
    pub life: f64,
    /// Life lost per step.
    pub decay: f64,
    /// Radius.
    pub size: f64,
    /// Colour.
    pub color: Color,
}

/// Uniform value in `[-0.5, 0.5) * scale`.
fn spread(rng: &mut impl Rng, scale: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * scale
}

impl Particle {
    /// Launches a `kind` particle at `(x, y)`. `color` overrides the kind's
    /// default where the kind accepts one (click and celebration).
    pub fn launch(
        kind: ParticleKind,
        x: f64,
        y: f64,
        color: Option<Color>,
        rng: &mut impl Rng,
    ) -> Self {
        let (vx, vy, size, color) = match kind {
            ParticleKind::Ambient => (
                spread(rng, 4.0),
                spread(rng, 4.0),
                rng.random_range(1.0..4.0),
                Color::Rgb(0x64, 0xff, 0xda),
            ),
            ParticleKind::Win => (
                spread(rng, 8.0),
                rng.random_range(-7.0..-2.0),
                rng.random_range(2.0..6.0),
                Color::Rgb(0x4c, 0xaf, 0x50),
            ),
            ParticleKind::Click => (
                spread(rng, 6.0),
                spread(rng, 6.0),
                rng.random_range(1.0..4.0),
                color.unwrap_or(Color::Rgb(0xff, 0x57, 0x22)),
            ),
            ParticleKind::Magical => (
                spread(rng, 2.0),
                rng.random_range(-3.0..-1.0),
                rng.random_range(1.0..3.0),
                hsl(rng.random_range(0.0..360.0), 0.7, 0.6),
            ),
            ParticleKind::Firework => {
                let angle = rng.random_range(0.0..std::f64::consts::TAU);
                let speed = rng.random_range(1.0..4.0);
                (
                    angle.cos() * speed,
                    angle.sin() * speed,
                    rng.random_range(1.0..3.0),
                    hsl(rng.random_range(40.0..100.0), 0.8, 0.6),
                )
            }
            ParticleKind::Celebration => (
                spread(rng, 4.0),
                rng.random_range(1.0..4.0),
                rng.random_range(2.0..7.0),
                color.unwrap_or(CELEBRATION_PALETTE[0]),
            ),
        };
        Self {
            kind,
            x,
            y,
            vx,
            vy,
            life: 1.0,
            decay: kind.decay(),
            size,
            color,
        }
    }

    /// Moves by the velocity, loses `decay` life and falls a little faster.
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        self.vy += GRAVITY;
    }

    /// Whether the particle still has life.
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// HSL (hue in degrees, saturation and lightness in `0..=1`) to RGB.
pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Color {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_kind_starts_alive_and_dies() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in ParticleKind::iter() {
            let mut p = Particle::launch(kind, 10.0, 10.0, None, &mut rng);
            assert_eq!(p.life, 1.0, "{kind}");
            let steps = (1.0 / kind.decay()).ceil() as usize + 1;
            for _ in 0..steps {
                p.update();
            }
            assert!(!p.is_alive(), "{kind} outlived {steps} steps");
        }
    }

    #[test]
    fn test_update_applies_gravity() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut p = Particle::launch(ParticleKind::Click, 0.0, 0.0, None, &mut rng);
        let (vx, vy) = (p.vx, p.vy);
        p.update();
        assert_eq!((p.x, p.y), (vx, vy));
        assert!((p.vy - (vy + GRAVITY)).abs() < 1e-12);
        assert!((p.life - 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl(0.0, 1.0, 0.5), Color::Rgb(255, 0, 0));
        assert_eq!(hsl(120.0, 1.0, 0.5), Color::Rgb(0, 255, 0));
        assert_eq!(hsl(240.0, 1.0, 0.5), Color::Rgb(0, 0, 255));
    }
}
