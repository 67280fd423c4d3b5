//! Transient presentation effects and timed hazards.
//!
//! Particles and floating texts exist only for the renderer and can be dropped
//! at any time. Countdowns drive armed TNT and crumbling planks.

use rand::Rng;

/// Particle gravity per tick.
const PARTICLE_GRAVITY: f32 = 0.2;
const TEXT_LIFE: u32 = 60;
const TEXT_RISE: f32 = -1.5;

pub mod color {
    pub const WHITE: u32 = 0xffffff;
    pub const GOLD: u32 = 0xffd700;
    pub const RED: u32 = 0xff0000;
    pub const DAMAGE: u32 = 0xff5252;
    pub const DASH: u32 = 0x00e5ff;
    pub const DEBRIS: u32 = 0x555555;
    pub const PLANK: u32 = 0xd2b48c;
    pub const FIRE: u32 = 0xff5722;
    pub const BOSS: u32 = 0xe91e63;
}

/// Level weather, rendered as falling particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
}

impl Weather {
    /// 20% rain; 20% snow from level 3 onward; otherwise clear.
    pub fn roll(level: u32, rng: &mut impl Rng) -> Self {
        let r: f64 = rng.gen();
        if r < 0.2 {
            Weather::Rain
        } else if r < 0.4 && level > 2 {
            Weather::Snow
        } else {
            Weather::Clear
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
    pub size: f32,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: u32,
    pub life: u32,
}

/// Renderer-facing effect lists.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
}

impl Effects {
    /// Burst of `count` particles scattering from `(x, y)`.
    pub fn burst(&mut self, rng: &mut impl Rng, x: f32, y: f32, color: u32, count: usize) {
        for _ in 0..count {
            self.particles.push(Particle {
                x,
                y,
                vx: rng.gen_range(-4.0..4.0),
                vy: rng.gen_range(-4.0..4.0),
                life: rng.gen_range(20..40),
                size: rng.gen_range(4.0..8.0),
                color,
            });
        }
    }

    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, color: u32) {
        self.texts.push(FloatingText {
            x,
            y,
            text: text.into(),
            color,
            life: TEXT_LIFE,
        });
    }

    /// Advance every effect by one tick and drop the expired ones.
    pub fn tick(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += PARTICLE_GRAVITY;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        for t in &mut self.texts {
            t.y += TEXT_RISE;
            t.life = t.life.saturating_sub(1);
        }
        self.texts.retain(|t| t.life > 0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.texts.clear();
    }
}

// ---------------------------------------------------------------------------
// Countdowns
// ---------------------------------------------------------------------------

/// A timer attached to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub x: i32,
    pub y: i32,
    pub remaining: u32,
}

impl Countdown {
    pub fn new(x: i32, y: i32, ticks: u32) -> Self {
        Self {
            x,
            y,
            remaining: ticks,
        }
    }
}

/// Decrement every countdown; remove and return the tiles whose timer hit zero,
/// in the order they were armed.
pub fn tick_countdowns(list: &mut Vec<Countdown>) -> Vec<(i32, i32)> {
    let mut fired = Vec::new();
    list.retain_mut(|c| {
        c.remaining = c.remaining.saturating_sub(1);
        if c.remaining == 0 {
            fired.push((c.x, c.y));
            false
        } else {
            true
        }
    });
    fired
}

/// Arm a countdown at `(x, y)` unless one is already running there.
pub fn arm_once(list: &mut Vec<Countdown>, x: i32, y: i32, ticks: u32) -> bool {
    if list.iter().any(|c| c.x == x && c.y == y) {
        return false;
    }
    list.push(Countdown::new(x, y, ticks));
    true
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn countdowns_fire_once() {
        let mut list = vec![Countdown::new(1, 1, 2), Countdown::new(2, 2, 1)];
        assert_eq!(tick_countdowns(&mut list), vec![(2, 2)]);
        assert_eq!(tick_countdowns(&mut list), vec![(1, 1)]);
        assert!(tick_countdowns(&mut list).is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn arm_once_deduplicates() {
        let mut list = Vec::new();
        assert!(arm_once(&mut list, 3, 4, 25));
        assert!(!arm_once(&mut list, 3, 4, 25));
        assert!(arm_once(&mut list, 4, 4, 25));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn effects_expire() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut fx = Effects::default();
        fx.burst(&mut rng, 0.0, 0.0, color::WHITE, 5);
        fx.text(0.0, 0.0, "+10G", color::GOLD);
        assert_eq!(fx.particles.len(), 5);
        for _ in 0..60 {
            fx.tick();
        }
        assert!(fx.particles.is_empty());
        assert!(fx.texts.is_empty());
    }

    #[test]
    fn snow_needs_level_three() {
        let mut rng = StdRng::seed_from_u64(8);
        let early: Vec<_> = (0..200).map(|_| Weather::roll(1, &mut rng)).collect();
        assert!(!early.contains(&Weather::Snow));
        assert!(early.contains(&Weather::Rain));
        let late: Vec<_> = (0..200).map(|_| Weather::roll(5, &mut rng)).collect();
        assert!(late.contains(&Weather::Snow));
    }
}
