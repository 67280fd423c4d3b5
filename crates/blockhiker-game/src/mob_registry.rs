//! Mob type definitions.
//!
//! Every mob type has a fixed stat block and a movement archetype. Regular
//! types unlock by level; bosses are spawned explicitly on boss levels.

/// Movement archetype. Selects the AI branch for a mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobKind {
    /// Chases along the ground and hops over obstacles.
    Walker,
    /// Same steering as a walker; slimes, snails and spiders.
    Hopper,
    /// Ignores gravity and tracks the player on both axes.
    Flyer,
    /// Ground chase with random hops and heavier contact damage.
    Boss,
}

impl MobKind {
    pub fn flies(self) -> bool {
        self == MobKind::Flyer
    }
}

/// Definition of a mob type.
#[derive(Debug, Clone, PartialEq)]
pub struct MobDefinition {
    /// Registry key, e.g. `"zombie"`.
    pub key: &'static str,
    /// Display name, e.g. `"Zombie"`.
    pub display_name: &'static str,
    pub kind: MobKind,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Hop impulse (negative is upward). Zero for flyers.
    pub jump: f32,
    pub max_hp: f32,
    pub reward: u32,
    /// First level the type can appear on. Bosses use 0 and never roll.
    pub min_level: u32,
}

impl MobDefinition {
    pub fn is_boss(&self) -> bool {
        self.kind == MobKind::Boss
    }
}

macro_rules! mob {
    ($key:literal, $name:literal, $kind:ident, $w:literal x $h:literal, speed $speed:literal, jump $jump:literal, hp $hp:literal, reward $reward:literal, level $lvl:literal) => {
        MobDefinition {
            key: $key,
            display_name: $name,
            kind: MobKind::$kind,
            width: $w,
            height: $h,
            speed: $speed,
            jump: $jump,
            max_hp: $hp,
            reward: $reward,
            min_level: $lvl,
        }
    };
}

static MOB_TYPES: &[MobDefinition] = &[
    // Level 1+
    mob!("slime", "Slime", Hopper, 30.0 x 20.0, speed 2.0, jump -8.0, hp 30.0, reward 10, level 1),
    mob!("rat", "Rat", Walker, 25.0 x 15.0, speed 3.0, jump -7.0, hp 15.0, reward 5, level 1),
    mob!("snail", "Snail", Hopper, 20.0 x 20.0, speed 0.5, jump -2.0, hp 20.0, reward 5, level 1),
    mob!("zombie", "Zombie", Walker, 28.0 x 38.0, speed 1.5, jump -10.0, hp 50.0, reward 20, level 1),
    // Level 3+
    mob!("bat", "Bat", Flyer, 20.0 x 20.0, speed 3.0, jump 0.0, hp 20.0, reward 15, level 3),
    mob!("slime_blue", "Blue Slime", Hopper, 35.0 x 25.0, speed 2.5, jump -9.0, hp 50.0, reward 20, level 3),
    mob!("skeleton", "Skeleton", Walker, 26.0 x 38.0, speed 2.0, jump -10.0, hp 40.0, reward 25, level 3),
    mob!("goblin", "Goblin", Walker, 24.0 x 34.0, speed 3.5, jump -11.0, hp 45.0, reward 30, level 3),
    mob!("spider", "Spider", Hopper, 35.0 x 20.0, speed 2.8, jump -9.0, hp 35.0, reward 25, level 3),
    // Level 6+
    mob!("slime_red", "Red Slime", Hopper, 40.0 x 30.0, speed 3.0, jump -10.0, hp 80.0, reward 40, level 6),
    mob!("zombie_tank", "Zombie Tank", Walker, 35.0 x 45.0, speed 1.0, jump -8.0, hp 150.0, reward 50, level 6),
    mob!("bat_vampire", "Vampire Bat", Flyer, 25.0 x 25.0, speed 4.0, jump 0.0, hp 60.0, reward 45, level 6),
    mob!("ghost", "Ghost", Flyer, 28.0 x 38.0, speed 1.5, jump 0.0, hp 50.0, reward 40, level 6),
    mob!("wolf", "Wolf", Walker, 40.0 x 25.0, speed 4.5, jump -10.0, hp 70.0, reward 50, level 6),
    // Level 9+
    mob!("golem_stone", "Stone Golem", Walker, 40.0 x 50.0, speed 1.0, jump -12.0, hp 200.0, reward 80, level 9),
    mob!("spirit_fire", "Fire Spirit", Flyer, 20.0 x 30.0, speed 3.0, jump 0.0, hp 80.0, reward 60, level 9),
    mob!("skeleton_warrior", "Skeleton Warrior", Walker, 28.0 x 38.0, speed 2.5, jump -10.0, hp 100.0, reward 70, level 9),
    mob!("witch", "Witch", Walker, 26.0 x 40.0, speed 2.0, jump -8.0, hp 90.0, reward 90, level 9),
    // Level 12+
    mob!("golem_iron", "Iron Golem", Walker, 45.0 x 55.0, speed 1.2, jump -13.0, hp 300.0, reward 120, level 12),
    mob!("spirit_shadow", "Shadow Spirit", Flyer, 25.0 x 35.0, speed 4.0, jump 0.0, hp 120.0, reward 100, level 12),
    mob!("slime_king_mini", "Lesser Slime King", Hopper, 50.0 x 40.0, speed 4.0, jump -12.0, hp 200.0, reward 150, level 12),
    mob!("dragon_whelp", "Dragon Whelp", Flyer, 40.0 x 30.0, speed 3.5, jump 0.0, hp 150.0, reward 200, level 12),
    // Bosses
    mob!("boss_slime", "KING SLIME", Boss, 90.0 x 90.0, speed 3.0, jump -14.0, hp 600.0, reward 500, level 0),
    mob!("boss_zombie", "MUTANT ZOMBIE", Boss, 60.0 x 100.0, speed 4.0, jump -12.0, hp 800.0, reward 600, level 0),
    mob!("boss_void", "VOID LORD", Boss, 100.0 x 120.0, speed 2.0, jump -10.0, hp 1200.0, reward 1000, level 0),
];

/// Registry of mob types.
pub struct MobRegistry {
    mobs: &'static [MobDefinition],
}

impl Default for MobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MobRegistry {
    /// Build the registry with all known mob types.
    pub fn new() -> Self {
        Self { mobs: MOB_TYPES }
    }

    /// Look up a mob definition by key.
    pub fn get(&self, key: &str) -> Option<&'static MobDefinition> {
        self.mobs.iter().find(|m| m.key == key)
    }

    /// All known mob definitions.
    pub fn all(&self) -> &'static [MobDefinition] {
        self.mobs
    }

    /// Non-boss types that may appear on `level`.
    pub fn available(&self, level: u32) -> Vec<&'static MobDefinition> {
        self.mobs
            .iter()
            .filter(|m| !m.is_boss() && m.min_level <= level)
            .collect()
    }

    /// Boss that guards `level`.
    pub fn boss_for(&self, level: u32) -> Option<&'static MobDefinition> {
        let key = if level >= 9 {
            "boss_void"
        } else if level >= 6 {
            "boss_zombie"
        } else {
            "boss_slime"
        };
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_all_types() {
        let reg = MobRegistry::new();
        assert_eq!(reg.all().len(), 25);
        assert_eq!(reg.all().iter().filter(|m| m.is_boss()).count(), 3);
    }

    #[test]
    fn lookup_zombie() {
        let reg = MobRegistry::new();
        let zombie = reg.get("zombie").unwrap();
        assert_eq!(zombie.max_hp, 50.0);
        assert_eq!(zombie.kind, MobKind::Walker);
        assert_eq!((zombie.width, zombie.height), (28.0, 38.0));
        assert!(reg.get("creeper").is_none());
    }

    #[test]
    fn availability_grows_with_level() {
        let reg = MobRegistry::new();
        assert_eq!(reg.available(1).len(), 4);
        assert_eq!(reg.available(3).len(), 9);
        assert_eq!(reg.available(12).len(), 22);
        assert!(reg.available(20).iter().all(|m| !m.is_boss()));
    }

    #[test]
    fn boss_progression() {
        let reg = MobRegistry::new();
        assert_eq!(reg.boss_for(3).unwrap().display_name, "KING SLIME");
        assert_eq!(reg.boss_for(6).unwrap().display_name, "MUTANT ZOMBIE");
        assert_eq!(reg.boss_for(12).unwrap().display_name, "VOID LORD");
    }

    #[test]
    fn flyers_do_not_jump() {
        for def in MobRegistry::new().all() {
            if def.kind.flies() {
                assert_eq!(def.jump, 0.0, "{}", def.key);
            }
        }
    }
}
