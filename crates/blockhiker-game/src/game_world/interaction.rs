//! Pointer actions: mining, placement and attacks.
//!
//! Every action checks its preconditions before touching state, so a refused
//! action leaves the world exactly as it was.

use blockhiker_world::block_registry::{block_id, BlockId};
use blockhiker_world::physics::Aabb;
use blockhiker_world::{tile_of, TILE_SIZE};
use tracing::{debug, trace};

use super::{GameEvent, GameWorld};
use crate::combat::{melee_hitbox, weapon_profile};
use crate::effects::{self, color};
use crate::error::ActionError;
use crate::input::InputState;
use crate::inventory::{Slot, Tool};
use crate::projectile::{Projectile, MUZZLE_OFFSET};

impl GameWorld {
    pub(super) fn interact(&mut self, input: &InputState) {
        if input.primary {
            let result = self.use_primary(input.pointer);
            self.report(result);
        }
        if input.secondary {
            let result = self.use_secondary(input.pointer);
            self.report(result);
        }
    }

    fn report(&mut self, result: Result<(), ActionError>) {
        match result {
            Ok(()) => {}
            Err(e) if e.is_user_visible() => self.toast(e.to_string(), true),
            Err(e) => trace!(error = %e, "Action refused"),
        }
    }

    /// Primary action at a world pixel: attack with a tool, otherwise mine.
    pub fn use_primary(&mut self, pointer: (f32, f32)) -> Result<(), ActionError> {
        if self.player.action_timer > 0 {
            return Err(ActionError::OnCooldown);
        }
        match self.player.inventory.selected() {
            Slot::Tool(tool) => self.attack(tool, pointer),
            Slot::Block(_) => {
                self.check_reach(pointer)?;
                self.mine(tile_of(pointer.0), tile_of(pointer.1))
            }
        }
    }

    /// Secondary action at a world pixel: place the selected block.
    pub fn use_secondary(&mut self, pointer: (f32, f32)) -> Result<(), ActionError> {
        if self.player.action_timer > 0 {
            return Err(ActionError::OnCooldown);
        }
        let Slot::Block(id) = self.player.inventory.selected() else {
            return Err(ActionError::NotPlaceable);
        };
        self.check_reach(pointer)?;
        self.place(tile_of(pointer.0), tile_of(pointer.1), id)
    }

    fn check_reach(&self, pointer: (f32, f32)) -> Result<(), ActionError> {
        let (cx, cy) = self.player.center();
        let (dx, dy) = (pointer.0 - cx, pointer.1 - cy);
        if (dx * dx + dy * dy).sqrt() > self.rules.interaction_range {
            return Err(ActionError::OutOfRange);
        }
        Ok(())
    }

    // -- mining -------------------------------------------------------------

    fn mine(&mut self, tx: i32, ty: i32) -> Result<(), ActionError> {
        if !self.grid.in_bounds(tx, ty) {
            return Err(ActionError::OutOfRange);
        }
        let id = self.grid.get(tx, ty);
        let info = self.grid.info(tx, ty);
        if info.is_air() {
            return Err(ActionError::Nothing);
        }
        if info.unbreakable {
            return Err(ActionError::Unbreakable);
        }
        let (px, py) = tile_center(tx, ty);

        if info.explosive {
            self.grid.set(tx, ty, block_id::AIR);
            effects::arm_once(&mut self.armed_tnt, tx, ty, self.rules.tnt_fuse);
            self.player.action_timer = self.rules.build_cooldown;
            self.effects.text(px, py, "IGNITE!", color::RED);
            debug!(x = tx, y = ty, "TNT ignited");
            self.emit(GameEvent::TntIgnited { x: tx, y: ty });
            return Ok(());
        }

        let cost = self.rules.mine_cost;
        if self.player.gold < cost {
            return Err(ActionError::InsufficientGold {
                needed: cost,
                have: self.player.gold,
            });
        }
        self.player.gold -= cost;
        self.player.action_timer = self.rules.build_cooldown;

        let remaining = self.grid.damage(tx, ty).unwrap_or(0);
        if remaining > 0 {
            self.effects.burst(&mut self.rng, px, py, color::DEBRIS, 3);
            self.emit(GameEvent::BlockDamaged {
                x: tx,
                y: ty,
                remaining,
            });
            return Ok(());
        }

        let reward = info.value;
        self.grid.set(tx, ty, block_id::AIR);
        self.player.gold += reward;
        self.effects.burst(&mut self.rng, px, py, color::DEBRIS, 5);
        if reward > 0 {
            self.effects.text(px, py, format!("+{reward}G"), color::GOLD);
        }
        trace!(x = tx, y = ty, block = info.name, reward, "Block mined");
        self.emit(GameEvent::BlockMined {
            x: tx,
            y: ty,
            id,
            reward,
        });
        Ok(())
    }

    // -- placement ----------------------------------------------------------

    fn place(&mut self, tx: i32, ty: i32, id: BlockId) -> Result<(), ActionError> {
        if !self.grid.in_bounds(tx, ty) {
            return Err(ActionError::OutOfRange);
        }
        if Aabb::tile(tx, ty).overlaps(&self.player.aabb()) {
            return Err(ActionError::OverlapsPlayer);
        }
        let current = self.grid.info(tx, ty);
        if self.grid.get(tx, ty) == id || !(current.is_air() || current.translucent) {
            return Err(ActionError::Occupied);
        }
        let cost = self.rules.place_cost_of(id);
        if self.player.gold < cost {
            return Err(ActionError::InsufficientGold {
                needed: cost,
                have: self.player.gold,
            });
        }

        self.player.gold -= cost;
        self.grid.set(tx, ty, id);
        self.player.action_timer = self.rules.build_cooldown;
        trace!(x = tx, y = ty, id, cost, "Block placed");
        self.emit(GameEvent::BlockPlaced {
            x: tx,
            y: ty,
            id,
            cost,
        });
        Ok(())
    }

    // -- attacks ------------------------------------------------------------

    fn attack(&mut self, tool: Tool, pointer: (f32, f32)) -> Result<(), ActionError> {
        if self.player.attack_timer > 0 {
            return Err(ActionError::OnCooldown);
        }

        match weapon_profile(tool) {
            None => {
                let origin = (
                    self.player.body.x + MUZZLE_OFFSET,
                    self.player.body.y + MUZZLE_OFFSET,
                );
                self.projectiles.push(Projectile::aimed(
                    origin,
                    pointer,
                    self.rules.projectile_speed,
                    self.rules.projectile_life,
                ));
                self.player.attack_timer = self.rules.wand_cooldown;
            }
            Some(profile) => {
                self.player.attack_timer = profile.cooldown;
                let hitbox = melee_hitbox(&self.player.body, self.player.facing, profile.reach);
                let damage = self.player.damage * profile.damage_mult;
                let push = self.player.facing.sign() * self.rules.melee_knockback_x;
                let mut hits = Vec::new();
                for (index, mob) in self.mobs.iter_mut().enumerate() {
                    if !hitbox.overlaps(&mob.aabb()) {
                        continue;
                    }
                    let hp = mob.take_damage(damage, self.rules.mob_hurt_ticks);
                    mob.body.vx = push;
                    mob.body.vy = self.rules.melee_knockback_y;
                    hits.push((index, mob.body.center(), hp));
                }
                for (index, (x, y), hp) in hits {
                    self.effects.text(x, y, format!("{damage}"), color::WHITE);
                    self.emit(GameEvent::MobHurt { index, damage, hp });
                }
            }
        }

        self.player.action_timer = self.rules.weapon_cooldown;
        self.emit(GameEvent::Attacked { tool });
        Ok(())
    }
}

fn tile_center(tx: i32, ty: i32) -> (f32, f32) {
    ((tx as f32 + 0.5) * TILE_SIZE, (ty as f32 + 0.5) * TILE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::super::testing::room;
    use super::*;
    use crate::config::RuleSet;

    /// Pixel center of a tile.
    fn at(tx: i32, ty: i32) -> (f32, f32) {
        tile_center(tx, ty)
    }

    /// Room with a block slot selected and the action timer cleared between calls.
    fn builder(gold: u32) -> GameWorld {
        let mut world = room(RuleSet::classic());
        world.player.gold = gold;
        world.select_slot(1).unwrap();
        world
    }

    fn mine_at(world: &mut GameWorld, tile: (i32, i32)) -> Result<(), ActionError> {
        world.player.action_timer = 0;
        world.use_primary(at(tile.0, tile.1))
    }

    #[test]
    fn stone_takes_three_paid_hits() {
        let mut world = builder(10);
        world.grid.set(4, 9, block_id::STONE);
        mine_at(&mut world, (4, 9)).unwrap();
        mine_at(&mut world, (4, 9)).unwrap();
        assert_eq!(world.grid.get(4, 9), block_id::STONE);
        assert_eq!(world.grid.durability(4, 9), 1);
        mine_at(&mut world, (4, 9)).unwrap();
        assert_eq!(world.grid.get(4, 9), block_id::AIR);
        assert_eq!(world.player.gold, 7);
        let events = world.drain_events();
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::BlockDamaged { .. })).count(),
            2
        );
    }

    #[test]
    fn mining_with_exact_gold() {
        let mut world = builder(1);
        world.grid.set(4, 9, block_id::DIRT);
        mine_at(&mut world, (4, 9)).unwrap();
        assert_eq!(world.grid.get(4, 9), block_id::AIR);
        assert_eq!(world.player.gold, 0);
    }

    #[test]
    fn mining_without_gold_changes_nothing() {
        let mut world = builder(0);
        world.grid.set(4, 9, block_id::STONE);
        let err = mine_at(&mut world, (4, 9)).unwrap_err();
        assert_eq!(err, ActionError::InsufficientGold { needed: 1, have: 0 });
        assert_eq!(world.grid.durability(4, 9), 3);
        assert_eq!(world.player.action_timer, 0);
    }

    #[test]
    fn ore_pays_its_value() {
        let mut world = builder(5);
        world.grid.set(4, 9, block_id::GOLD_ORE);
        for _ in 0..3 {
            mine_at(&mut world, (4, 9)).unwrap();
        }
        assert_eq!(world.player.gold, 5 - 3 + 15);
        assert!(world.drain_events().contains(&GameEvent::BlockMined {
            x: 4,
            y: 9,
            id: block_id::GOLD_ORE,
            reward: 15,
        }));
    }

    #[test]
    fn goal_is_unbreakable_and_air_is_nothing() {
        let mut world = builder(10);
        world.grid.set(4, 9, block_id::GOAL);
        assert_eq!(mine_at(&mut world, (4, 9)), Err(ActionError::Unbreakable));
        assert_eq!(mine_at(&mut world, (5, 8)), Err(ActionError::Nothing));
        assert_eq!(world.player.gold, 10);
    }

    #[test]
    fn mining_respects_cooldown_and_range() {
        let mut world = builder(10);
        world.grid.set(4, 9, block_id::DIRT);
        world.grid.set(5, 9, block_id::DIRT);
        world.use_primary(at(4, 9)).unwrap();
        assert_eq!(world.use_primary(at(5, 9)), Err(ActionError::OnCooldown));
        assert_eq!(world.grid.get(5, 9), block_id::DIRT);
        assert_eq!(mine_at(&mut world, (15, 9)), Err(ActionError::OutOfRange));
    }

    #[test]
    fn tnt_arms_for_free() {
        let mut world = builder(0);
        world.grid.set(4, 9, block_id::TNT);
        mine_at(&mut world, (4, 9)).unwrap();
        assert_eq!(world.grid.get(4, 9), block_id::AIR);
        assert_eq!(world.armed_tnt.len(), 1);
        assert_eq!(world.armed_tnt[0].remaining, 100);
    }

    #[test]
    fn placement_costs_and_rejections() {
        let mut world = builder(3);
        world.player.action_timer = 0;
        world.use_secondary(at(4, 9)).unwrap();
        assert_eq!(world.grid.get(4, 9), block_id::DIRT);
        assert_eq!(world.player.gold, 2);

        world.player.action_timer = 0;
        assert_eq!(world.use_secondary(at(4, 9)), Err(ActionError::Occupied));
        world.player.action_timer = 0;
        assert_eq!(world.use_secondary(at(4, 10)), Err(ActionError::Occupied));
        world.player.action_timer = 0;
        assert_eq!(world.use_secondary(at(2, 9)), Err(ActionError::OverlapsPlayer));
        assert_eq!(world.player.gold, 2);
    }

    #[test]
    fn placing_over_translucent_blocks() {
        let mut world = builder(3);
        world.grid.set(4, 9, block_id::LEAVES);
        world.use_secondary(at(4, 9)).unwrap();
        assert_eq!(world.grid.get(4, 9), block_id::DIRT);
    }

    #[test]
    fn expensive_blocks_need_gold() {
        let mut world = builder(20);
        let lava_slot = world
            .player
            .inventory
            .slots()
            .iter()
            .position(|s| *s == Slot::Block(block_id::LAVA))
            .unwrap();
        world.select_slot(lava_slot).unwrap();
        let err = world.use_secondary(at(4, 9)).unwrap_err();
        assert_eq!(err, ActionError::InsufficientGold { needed: 30, have: 20 });
        assert_eq!(world.grid.get(4, 9), block_id::AIR);
    }

    #[test]
    fn tools_cannot_be_placed() {
        let mut world = builder(5);
        world.select_slot(0).unwrap();
        assert_eq!(world.use_secondary(at(4, 9)), Err(ActionError::NotPlaceable));
    }

    #[test]
    fn insufficient_gold_becomes_toast() {
        let mut world = builder(0);
        world.grid.set(3, 9, block_id::DIRT);
        world.tick(&InputState {
            primary: true,
            pointer: at(3, 9),
            ..InputState::idle()
        });
        let events = world.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Toast { message, error: true } if message.contains("Need Gold")
        )));
    }

    #[test]
    fn sword_hits_mob_in_front() {
        let mut world = room(RuleSet::classic());
        let index = world.spawn_mob("slime", 140.0, 370.0).unwrap();
        world.spawn_mob("slime", 20.0, 370.0).unwrap();
        world.use_primary((0.0, 0.0)).unwrap();
        assert_eq!(world.mobs[index].hp, 15.0);
        assert_eq!(world.mobs[index].body.vx, 8.0);
        assert_eq!(world.mobs[1].hp, 30.0);
        assert_eq!(world.player.attack_timer, 15);
        assert_eq!(world.use_primary((0.0, 0.0)), Err(ActionError::OnCooldown));
    }

    #[test]
    fn wand_fires_projectile() {
        let mut world = room(RuleSet::classic());
        world.player.inventory.add_tool(Tool::Wand);
        world.player.inventory.select_item(Slot::Tool(Tool::Wand));
        world.use_primary((600.0, 372.0)).unwrap();
        assert_eq!(world.projectiles.len(), 1);
        assert!(world.projectiles[0].vx > 11.0);
        assert_eq!(world.player.attack_timer, 20);
        assert!(world.drain_events().contains(&GameEvent::Attacked { tool: Tool::Wand }));
    }
}
