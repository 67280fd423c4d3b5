//! Steering for each mob archetype.
//!
//! Steering only writes velocity. Gravity, integration and collision happen
//! afterwards in the mob step, through the same resolver the player uses.

use blockhiker_world::grid::Grid;
use blockhiker_world::physics::{blocked_ahead, Body};
use rand::Rng;

use crate::components::Mob;
use crate::config::RuleSet;
use crate::mob_registry::MobKind;

/// Everything a mob looks at while deciding how to move.
pub struct SteerContext<'a> {
    pub target: &'a Body,
    pub grid: &'a Grid,
    pub rules: &'a RuleSet,
    /// Environmental multiplier from the cell the mob occupies.
    pub speed_mult: f32,
}

/// What steering decided this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    /// Player out of range; velocity decays.
    Idle,
    Chasing,
    /// Chasing and started a hop this tick.
    Hopped,
}

/// Update `mob`'s velocity for one tick.
pub fn steer(mob: &mut Mob, ctx: &SteerContext, rng: &mut impl Rng) -> Steering {
    let dx = ctx.target.x - mob.body.x;
    if dx.abs() >= ctx.rules.aggro_range {
        idle(mob, ctx.rules);
        return Steering::Idle;
    }

    match mob.kind {
        MobKind::Flyer => {
            let dy = ctx.target.y - mob.body.y;
            mob.body.vx = toward(dx) * mob.speed;
            mob.body.vy = toward(dy) * ctx.rules.flyer_climb_speed;
            Steering::Chasing
        }
        MobKind::Boss => {
            chase_x(mob, dx, ctx);
            if mob.body.grounded && rng.gen_bool(ctx.rules.boss_hop_chance.clamp(0.0, 1.0)) {
                mob.body.vy = mob.jump;
                return Steering::Hopped;
            }
            Steering::Chasing
        }
        MobKind::Walker | MobKind::Hopper => {
            chase_x(mob, dx, ctx);
            if mob.body.vx != 0.0 && mob.body.grounded && blocked_ahead(&mob.body, ctx.grid) {
                mob.body.vy = mob.jump;
                return Steering::Hopped;
            }
            Steering::Chasing
        }
    }
}

/// Unit direction toward a signed offset. A zero offset counts as negative.
fn toward(offset: f32) -> f32 {
    if offset > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Set horizontal speed toward the target unless inside the deadzone, where
/// the previous velocity is kept.
fn chase_x(mob: &mut Mob, dx: f32, ctx: &SteerContext) {
    let speed = mob.speed * ctx.speed_mult;
    if dx > ctx.rules.chase_deadzone {
        mob.body.vx = speed;
    } else if dx < -ctx.rules.chase_deadzone {
        mob.body.vx = -speed;
    }
}

fn idle(mob: &mut Mob, rules: &RuleSet) {
    mob.body.vx *= rules.idle_decay;
    if mob.kind.flies() {
        mob.body.vy *= rules.idle_decay;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use blockhiker_world::block_registry::{block_id, BlockRegistry};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::mob_registry::MobRegistry;

    fn spawn(key: &str, x: f32, y: f32) -> Mob {
        Mob::from_definition(MobRegistry::new().get(key).unwrap(), x, y)
    }

    fn grid() -> Grid {
        let mut g = Grid::new(30, 10, Arc::new(BlockRegistry::new()));
        g.fill_rect(0, 8, 29, 9, block_id::STONE);
        g
    }

    #[test]
    fn walker_chases_horizontally() {
        let g = grid();
        let rules = RuleSet::classic();
        let target = Body::new(600.0, 282.0, 28.0, 38.0);
        let mut zombie = spawn("zombie", 200.0, 282.0);
        let ctx = SteerContext { target: &target, grid: &g, rules: &rules, speed_mult: 1.0 };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(steer(&mut zombie, &ctx, &mut rng), Steering::Chasing);
        assert_eq!(zombie.body.vx, 1.5);

        let target = Body::new(100.0, 282.0, 28.0, 38.0);
        let ctx = SteerContext { target: &target, grid: &g, rules: &rules, speed_mult: 0.5 };
        steer(&mut zombie, &ctx, &mut rng);
        assert_eq!(zombie.body.vx, -0.75);
    }

    #[test]
    fn deadzone_keeps_velocity() {
        let g = grid();
        let rules = RuleSet::classic();
        let target = Body::new(205.0, 282.0, 28.0, 38.0);
        let mut zombie = spawn("zombie", 200.0, 282.0);
        zombie.body.vx = 0.7;
        let ctx = SteerContext { target: &target, grid: &g, rules: &rules, speed_mult: 1.0 };
        steer(&mut zombie, &ctx, &mut StdRng::seed_from_u64(0));
        assert_eq!(zombie.body.vx, 0.7);
    }

    #[test]
    fn walker_hops_over_obstacle() {
        let mut g = grid();
        g.set(6, 7, block_id::DIRT);
        let rules = RuleSet::classic();
        let target = Body::new(900.0, 282.0, 28.0, 38.0);
        let mut zombie = spawn("zombie", 207.0, 282.0);
        zombie.body.grounded = true;
        let ctx = SteerContext { target: &target, grid: &g, rules: &rules, speed_mult: 1.0 };
        assert_eq!(steer(&mut zombie, &ctx, &mut StdRng::seed_from_u64(0)), Steering::Hopped);
        assert_eq!(zombie.body.vy, -10.0);

        // Airborne mobs cannot hop.
        let mut zombie = spawn("zombie", 207.0, 282.0);
        steer(&mut zombie, &ctx, &mut StdRng::seed_from_u64(0));
        assert_eq!(zombie.body.vy, 0.0);
    }

    #[test]
    fn flyer_tracks_both_axes() {
        let g = grid();
        let rules = RuleSet::classic();
        let target = Body::new(100.0, 50.0, 28.0, 38.0);
        let mut bat = spawn("bat", 300.0, 200.0);
        let ctx = SteerContext { target: &target, grid: &g, rules: &rules, speed_mult: 0.1 };
        steer(&mut bat, &ctx, &mut StdRng::seed_from_u64(0));
        assert_eq!(bat.body.vx, -3.0);
        assert_eq!(bat.body.vy, -1.5);
    }

    #[test]
    fn out_of_range_decays() {
        let g = grid();
        let rules = RuleSet::classic();
        let target = Body::new(2000.0, 282.0, 28.0, 38.0);
        let mut zombie = spawn("zombie", 200.0, 282.0);
        zombie.body.vx = 2.0;
        let ctx = SteerContext { target: &target, grid: &g, rules: &rules, speed_mult: 1.0 };
        assert_eq!(steer(&mut zombie, &ctx, &mut StdRng::seed_from_u64(0)), Steering::Idle);
        assert!((zombie.body.vx - 1.8).abs() < 1e-6);
    }

    #[test]
    fn boss_hops_with_certainty_when_chance_is_one() {
        let g = grid();
        let rules = RuleSet {
            boss_hop_chance: 1.0,
            ..RuleSet::classic()
        };
        let target = Body::new(100.0, 282.0, 28.0, 38.0);
        let mut boss = spawn("boss_slime", 400.0, 230.0);
        boss.body.grounded = true;
        let ctx = SteerContext { target: &target, grid: &g, rules: &rules, speed_mult: 1.0 };
        assert_eq!(steer(&mut boss, &ctx, &mut StdRng::seed_from_u64(0)), Steering::Hopped);
        assert_eq!(boss.body.vx, -3.0);
        assert_eq!(boss.body.vy, -14.0);
    }
}
