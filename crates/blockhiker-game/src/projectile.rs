//! Wand projectile physics.

use blockhiker_world::block_registry::BlockInfo;
use blockhiker_world::physics::Aabb;

/// Offset from the caster's top-left corner where bolts are spawned.
pub const MUZZLE_OFFSET: f32 = 10.0;

/// A point projectile with a limited lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Ticks left before it bursts on its own.
    pub life: u32,
}

impl Projectile {
    /// Launch from `origin` toward `target` at `speed`.
    pub fn aimed(origin: (f32, f32), target: (f32, f32), speed: f32, life: u32) -> Self {
        let (vx, vy) = launch_velocity(origin, target, speed);
        Self {
            x: origin.0,
            y: origin.1,
            vx,
            vy,
            life,
        }
    }

    /// Move one tick, then apply gravity and age.
    pub fn step(&mut self, gravity: f32) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.life = self.life.saturating_sub(1);
    }

    pub fn expired(&self) -> bool {
        self.life == 0
    }

    /// Whether the projectile is inside `target`.
    pub fn hits(&self, target: &Aabb) -> bool {
        target.contains_point(self.x, self.y)
    }
}

/// Velocity of magnitude `speed` pointing from `from` to `to`.
pub fn launch_velocity(from: (f32, f32), to: (f32, f32), speed: f32) -> (f32, f32) {
    let angle = (to.1 - from.1).atan2(to.0 - from.0);
    (angle.cos() * speed, angle.sin() * speed)
}

/// Whether a projectile bursts on this cell: anything that is neither air nor fluid.
pub fn stops_projectile(info: &BlockInfo) -> bool {
    !info.is_air() && !info.fluid
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use blockhiker_world::block_registry::{block_id, BlockRegistry};

    use super::*;

    #[test]
    fn launch_toward_target() {
        let (vx, vy) = launch_velocity((0.0, 0.0), (10.0, 0.0), 12.0);
        assert!((vx - 12.0).abs() < 1e-4);
        assert!(vy.abs() < 1e-4);

        let (vx, vy) = launch_velocity((0.0, 0.0), (0.0, -5.0), 12.0);
        assert!(vx.abs() < 1e-4);
        assert!((vy + 12.0).abs() < 1e-4);
    }

    #[test]
    fn step_applies_gravity_after_move() {
        let mut p = Projectile {
            x: 0.0,
            y: 0.0,
            vx: 12.0,
            vy: 0.0,
            life: 2,
        };
        p.step(0.2);
        assert_eq!((p.x, p.y), (12.0, 0.0));
        assert!((p.vy - 0.2).abs() < 1e-6);
        p.step(0.2);
        assert!(p.expired());
        p.step(0.2);
        assert_eq!(p.life, 0);
    }

    #[test]
    fn hit_test_is_interior() {
        let p = Projectile::aimed((5.0, 5.0), (6.0, 5.0), 1.0, 10);
        assert!(p.hits(&Aabb::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!p.hits(&Aabb::new(5.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn fluids_do_not_stop_bolts() {
        let reg = Arc::new(BlockRegistry::new());
        assert!(!stops_projectile(reg.get(block_id::AIR)));
        assert!(!stops_projectile(reg.get(block_id::WATER)));
        assert!(!stops_projectile(reg.get(block_id::LAVA)));
        assert!(stops_projectile(reg.get(block_id::GLASS)));
        assert!(stops_projectile(reg.get(block_id::STONE)));
    }
}
