//! Player abilities
//!
//! An ability is either counting down toward its next effect (`Active`) or
//! has applied a one-shot effect and stopped (`Inert`). Leveling up re-arms
//! it so the new level's value takes effect on the next tick.

use super::state::World;
use crate::SimError;

/// Catalogue hook: fires when the cooldown runs out. Responsible for setting
/// the next cooldown (or going inert).
pub type AbilityHook = fn(&mut Ability, &mut World);

/// Catalogue entry for one ability
#[derive(Debug)]
pub struct AbilityType {
    pub name: &'static str,
    pub description: &'static str,
    /// Tunable value per level (index 0 = level 1); its length is the max level
    pub level_values: &'static [f32],
    pub effect: Option<AbilityHook>,
}

impl AbilityType {
    pub fn max_level(&self) -> u32 {
        self.level_values.len() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cooldown {
    /// Seconds until the effect fires (fires once this drops below zero)
    Active(f32),
    /// Never fires again until re-armed by a level-up
    Inert,
}

/// A learned ability
#[derive(Debug, Clone)]
pub struct Ability {
    pub kind: &'static AbilityType,
    pub level: u32,
    pub cooldown: Cooldown,
    /// Scratch angle for patterned abilities
    pub phase: f32,
}

impl Ability {
    /// Learn an ability at level 1, ready to fire on the next update
    pub fn new(kind: &'static AbilityType) -> Self {
        let cooldown = if kind.effect.is_some() {
            Cooldown::Active(0.0)
        } else {
            log::warn!("No effect defined for ability {}", kind.name);
            Cooldown::Inert
        };
        log::info!("Added ability {}", kind.name);
        Self {
            kind,
            level: 1,
            cooldown,
            phase: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub fn max_level(&self) -> u32 {
        self.kind.max_level()
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level()
    }

    /// The catalogue value for the current level
    pub fn level_value(&self) -> f32 {
        let index = self.level.saturating_sub(1) as usize;
        self.kind.level_values.get(index).copied().unwrap_or_default()
    }

    pub fn set_cooldown(&mut self, seconds: f32) {
        self.cooldown = Cooldown::Active(seconds);
    }

    /// Stop firing (one-shot stat boosts)
    pub fn go_inert(&mut self) {
        self.cooldown = Cooldown::Inert;
    }

    pub fn update(&mut self, dt: f32, world: &mut World) {
        let Cooldown::Active(remaining) = self.cooldown else {
            return;
        };
        let remaining = remaining - dt;
        self.cooldown = Cooldown::Active(remaining);
        if remaining < 0.0 {
            if let Some(effect) = self.kind.effect {
                effect(self, world);
            }
        }
    }

    /// Raise the level by one and fire on the next update. Refused at max level.
    pub fn level_up(&mut self) -> Result<u32, SimError> {
        if self.is_maxed() {
            log::warn!("Tried to level {} above max level!", self.name());
            return Err(SimError::AbilityMaxed {
                ability: self.name(),
                level: self.level,
            });
        }
        self.level += 1;
        self.cooldown = Cooldown::Active(0.0);
        log::info!("Ability {} leveled up to level {}", self.name(), self.level);
        Ok(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::ability_types::ability_type;
    use proptest::prelude::*;

    static PULSE: AbilityType = AbilityType {
        name: "Pulse",
        description: "Counts its own firings",
        level_values: &[0.5, 0.25],
        effect: Some(pulse),
    };

    fn pulse(ability: &mut Ability, world: &mut World) {
        ability.set_cooldown(ability.level_value());
        world.player.money += 1;
    }

    static BROKEN: AbilityType = AbilityType {
        name: "Broken",
        description: "No effect",
        level_values: &[1.0],
        effect: None,
    };

    #[test]
    fn test_fires_immediately_then_waits_cooldown() {
        let mut world = World::new(Tuning::default(), 1);
        let mut ability = Ability::new(&PULSE);

        ability.update(0.1, &mut world);
        assert_eq!(world.player.money, 1);
        assert_eq!(ability.cooldown, Cooldown::Active(0.5));

        for _ in 0..4 {
            ability.update(0.1, &mut world);
        }
        assert_eq!(world.player.money, 1);
        ability.update(0.11, &mut world);
        assert_eq!(world.player.money, 2);
    }

    #[test]
    fn test_level_up_rearms_and_changes_value() {
        let mut world = World::new(Tuning::default(), 1);
        let mut ability = Ability::new(&PULSE);
        ability.update(0.1, &mut world);

        assert_eq!(ability.level_up().unwrap(), 2);
        assert_eq!(ability.cooldown, Cooldown::Active(0.0));
        ability.update(0.01, &mut world);
        assert_eq!(world.player.money, 2);
        assert_eq!(ability.cooldown, Cooldown::Active(0.25));
    }

    #[test]
    fn test_missing_effect_is_inert() {
        let mut world = World::new(Tuning::default(), 1);
        let mut ability = Ability::new(&BROKEN);
        assert_eq!(ability.cooldown, Cooldown::Inert);
        ability.update(1.0, &mut world);
        assert_eq!(ability.cooldown, Cooldown::Inert);
    }

    #[test]
    fn test_stat_boost_applies_once_and_goes_inert() {
        let mut world = World::new(Tuning::default(), 1);
        let mut ability = Ability::new(ability_type("Speed Increase").unwrap());

        ability.update(0.016, &mut world);
        assert_eq!(world.player.speed, 330.0);
        assert_eq!(ability.cooldown, Cooldown::Inert);

        world.player.speed = 1.0;
        ability.update(0.016, &mut world);
        assert_eq!(world.player.speed, 1.0, "inert abilities never fire");

        ability.level_up().unwrap();
        ability.update(0.016, &mut world);
        assert_eq!(world.player.speed, 360.0);
        assert_eq!(ability.cooldown, Cooldown::Inert);
    }

    #[test]
    fn test_level_value_lookup() {
        let mut ability = Ability::new(ability_type("Cookie shot").unwrap());
        assert_eq!(ability.level_value(), 1.0);
        ability.level = 5;
        assert_eq!(ability.level_value(), 0.2);
        assert!(ability.is_maxed());
    }

    proptest! {
        #[test]
        fn prop_level_up_is_capped(extra in 0u32..10) {
            let kind = ability_type("Ice cubes").unwrap();
            let mut ability = Ability::new(kind);
            let mut failures = 0;
            for _ in 0..(kind.max_level() + extra) {
                if ability.level_up().is_err() {
                    failures += 1;
                }
            }
            prop_assert_eq!(ability.level, kind.max_level());
            prop_assert_eq!(failures, extra + 1);
        }
    }
}
