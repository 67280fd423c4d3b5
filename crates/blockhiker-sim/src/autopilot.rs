//! Scripted input for headless runs.
//!
//! The pilot walks right, jumps at obstacles and out of water, swings the sword
//! at mobs in front, and digs through whatever it has been stuck against for a
//! while. Between levels it works through its shopping list.

use blockhiker_game::components::Facing;
use blockhiker_game::{GameWorld, InputState};
use blockhiker_world::physics::blocked_ahead;
use blockhiker_world::TILE_SIZE;
use tracing::debug;

use crate::config::AutopilotSection;

const SWORD_SLOT: usize = 0;
const DIRT_SLOT: usize = 1;
/// Horizontal distance at which a mob in front draws a swing.
const SWING_RANGE: f32 = 70.0;
/// Less horizontal movement than this in one step counts as stuck.
const STUCK_EPSILON: f32 = 0.5;

pub struct Autopilot {
    config: AutopilotSection,
    last_x: f32,
    stuck: u32,
}

impl Autopilot {
    pub fn new(config: AutopilotSection) -> Self {
        Self {
            config,
            last_x: f32::NAN,
            stuck: 0,
        }
    }

    /// Pick this step's input. May change the selected hotbar slot.
    pub fn input(&mut self, world: &mut GameWorld) -> InputState {
        let body = world.player.body;
        if (body.x - self.last_x).abs() < STUCK_EPSILON {
            self.stuck += 1;
        } else {
            self.stuck = 0;
        }
        self.last_x = body.x;

        let mut input = InputState {
            right: true,
            ..InputState::idle()
        };
        if blocked_ahead(&body, &world.grid) || world.player.submerged {
            input.jump = true;
            input.jump_pressed = self.stuck % 10 == 0;
        }

        let front = body.x + body.width;
        let mob_ahead = world.mobs.iter().any(|m| {
            let gap = m.body.x - front;
            gap > -body.width && gap < SWING_RANGE && (m.body.y - body.y).abs() < 2.0 * TILE_SIZE
        });

        if mob_ahead && world.player.facing == Facing::Right {
            let _ = world.select_slot(SWORD_SLOT);
            input.primary = true;
        } else if self.stuck >= self.config.stuck_threshold {
            let _ = world.select_slot(DIRT_SLOT);
            // Alternate between the foot and head rows of the wall ahead.
            let row_y = if self.stuck % 2 == 0 {
                body.y + body.height - 5.0
            } else {
                body.y + 5.0
            };
            input.primary = true;
            input.pointer = (front + TILE_SIZE / 2.0, row_y);
        }
        input
    }

    /// Spend gold between levels.
    pub fn shop(&self, world: &mut GameWorld) {
        for &item in &self.config.shopping_list {
            if let Err(e) = world.purchase(item) {
                debug!(%item, error = %e, "Skipped purchase");
            }
        }
        let _ = world.select_slot(SWORD_SLOT);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use blockhiker_game::progression::ShopItem;
    use blockhiker_game::RuleSet;
    use blockhiker_world::block_registry::{block_id, BlockRegistry};
    use blockhiker_world::grid::Grid;

    use super::*;

    fn corridor() -> GameWorld {
        let mut grid = Grid::new(30, 12, Arc::new(BlockRegistry::new()));
        grid.fill_rect(0, 10, 29, 11, block_id::BRICK);
        GameWorld::from_grid(grid, (86.0, 362.0), RuleSet::classic(), 3)
    }

    #[test]
    fn walks_right() {
        let mut world = corridor();
        let mut pilot = Autopilot::new(AutopilotSection::default());
        for _ in 0..30 {
            let input = pilot.input(&mut world);
            world.tick(&input);
        }
        assert!(world.player.body.x > 150.0);
    }

    #[test]
    fn digs_through_a_wall() {
        let mut world = corridor();
        world.player.gold = 20;
        world.grid.fill_rect(5, 0, 5, 9, block_id::DIRT);
        let mut pilot = Autopilot::new(AutopilotSection {
            stuck_threshold: 5,
            ..AutopilotSection::default()
        });
        for _ in 0..200 {
            let input = pilot.input(&mut world);
            world.tick(&input);
        }
        assert!(world.player.body.x > 6.0 * TILE_SIZE);
        assert!(world.player.gold < 20);
    }

    #[test]
    fn shops_in_order() {
        let mut world = corridor();
        world.player.gold = 200;
        world.player.hp = 40.0;
        let pilot = Autopilot::new(AutopilotSection {
            shopping_list: vec![ShopItem::Potion, ShopItem::Boots, ShopItem::Potion],
            ..AutopilotSection::default()
        });
        pilot.shop(&mut world);
        assert_eq!(world.player.hp, 90.0);
        assert_eq!(world.player.speed, 7.0);
        // The second potion is unaffordable.
        assert_eq!(world.player.gold, 0);
    }
}
