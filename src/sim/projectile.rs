//! Projectiles
//!
//! Hooks are plain data (variant dispatch) so a projectile stays `Clone` and
//! carries whatever parameters its spawning ability baked in at fire time.

use glam::Vec2;

use super::collision::in_contact;
use super::enemy::Enemy;
use super::state::World;
use crate::consts::{EXPLOSION_LIFETIME, EXPLOSION_SIZE, PROJECTILE_LIFETIME, PROJECTILE_SIZE};
use crate::render::{Layer, RenderRegistry, VisualId, VisualKind};

/// Per-tick adjustment run after moving
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateHook {
    /// Lose velocity proportionally to dt (germs)
    Decelerate,
}

/// Effect run when the projectile touches its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitHook {
    /// Freeze the enemy hit; no effect on the player
    Freeze { seconds: f32 },
    /// Leave an explosion at the impact point
    Explode { damage: f32 },
}

/// Effect run when the lifetime runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeathHook {
    Explode { damage: f32 },
}

/// What a projectile touched
#[derive(Debug)]
pub enum HitTarget<'a> {
    Player,
    Enemy(&'a mut Enemy),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectileHooks {
    pub on_update: Option<UpdateHook>,
    pub on_hit: Option<HitHook>,
    pub on_death: Option<DeathHook>,
}

/// Everything needed to fire a projectile
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpec {
    pub visual: VisualKind,
    pub pos: Vec2,
    /// Velocity in units/second
    pub dir: Vec2,
    /// Sprite size in pixels; contact reach is half of (enemy diameter + size)
    pub size: f32,
    pub damage: f32,
    /// Seconds until expiry
    pub lifetime: f32,
    pub piercing: bool,
    /// Targets the player instead of enemies
    pub unfriendly: bool,
    pub hooks: ProjectileHooks,
}

impl ProjectileSpec {
    /// Stationary, harmless, friendly projectile with default size and lifetime
    pub fn new(visual: VisualKind, pos: Vec2) -> Self {
        Self {
            visual,
            pos,
            dir: Vec2::ZERO,
            size: PROJECTILE_SIZE,
            damage: 0.0,
            lifetime: PROJECTILE_LIFETIME,
            piercing: false,
            unfriendly: false,
            hooks: ProjectileHooks::default(),
        }
    }

    /// Short-lived piercing blast
    pub fn explosion(pos: Vec2, damage: f32) -> Self {
        Self {
            size: EXPLOSION_SIZE,
            damage,
            lifetime: EXPLOSION_LIFETIME,
            piercing: true,
            ..Self::new(VisualKind::Explosion, pos)
        }
    }
}

/// A live projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub visual: VisualId,
    pub pos: Vec2,
    pub dir: Vec2,
    pub size: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub piercing: bool,
    pub unfriendly: bool,
    pub hooks: ProjectileHooks,
    pub(crate) published: Vec2,
}

impl Projectile {
    /// Build a projectile and register its visual
    pub fn new(spec: ProjectileSpec, world: &mut World) -> Self {
        let visual = world.next_visual_id();
        world.scene.register(Layer::Game, visual, spec.visual, spec.pos);
        Self {
            visual,
            pos: spec.pos,
            dir: spec.dir,
            size: spec.size,
            damage: spec.damage,
            lifetime: spec.lifetime,
            piercing: spec.piercing,
            unfriendly: spec.unfriendly,
            hooks: spec.hooks,
            published: spec.pos,
        }
    }

    /// Advance one tick. Returns false on expiry or on a non-piercing hit.
    ///
    /// Friendly projectiles hit at most one enemy per tick: the first in
    /// collection order that is in contact.
    pub fn update(&mut self, dt: f32, enemies: &mut [Enemy], world: &mut World) -> bool {
        self.pos += self.dir * dt;
        self.lifetime -= dt;

        if let Some(UpdateHook::Decelerate) = self.hooks.on_update {
            self.dir *= 1.0 - dt;
        }

        if self.lifetime < 0.0 {
            if let Some(DeathHook::Explode { damage }) = self.hooks.on_death {
                world.spawn_projectile(ProjectileSpec::explosion(self.pos, damage));
            }
            return false;
        }

        let prefilter = world.tuning.proximity_prefilter;
        let reach_sq = world.tuning.contact_threshold_sq(self.size);
        let minutes = world.minutes_survived;

        if self.unfriendly {
            if !in_contact(self.pos, world.player.pos, prefilter, reach_sq) {
                return true;
            }
            self.on_hit(HitTarget::Player, world);
            world.player.health -= self.damage * world.tuning.enemy_damage_growth.powf(minutes);
            return self.piercing;
        }

        let Some(enemy) = enemies
            .iter_mut()
            .find(|enemy| in_contact(self.pos, enemy.pos, prefilter, reach_sq))
        else {
            return true;
        };

        let mut damage =
            self.damage * world.tuning.player_damage_decay.powf(minutes) * world.ghost.penalty;
        if self.piercing {
            // Piercing projectiles deal damage per second of contact
            damage *= dt;
        }
        self.on_hit(HitTarget::Enemy(&mut *enemy), world);
        enemy.health -= damage;
        self.piercing
    }

    fn on_hit(&self, target: HitTarget<'_>, world: &mut World) {
        match (self.hooks.on_hit, target) {
            (Some(HitHook::Freeze { seconds }), HitTarget::Enemy(enemy)) => {
                enemy.freeze_for(seconds, &mut world.scene);
            }
            (Some(HitHook::Explode { damage }), _) => {
                world.spawn_projectile(ProjectileSpec::explosion(self.pos, damage));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::enemy_types::enemy_type;
    use proptest::prelude::*;

    fn world() -> World {
        World::new(Tuning::default(), 9)
    }

    fn fire(world: &mut World, spec: ProjectileSpec) -> Projectile {
        Projectile::new(spec, world)
    }

    fn enemy_at(world: &mut World, pos: Vec2) -> Enemy {
        Enemy::new(enemy_type("sunglasses").unwrap(), pos, world)
    }

    #[test]
    fn test_moves_and_expires() {
        let mut world = world();
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                dir: Vec2::new(100.0, 0.0),
                lifetime: 0.15,
                ..ProjectileSpec::new(VisualKind::Cookie, Vec2::new(500.0, 0.0))
            },
        );
        assert!(p.update(0.1, &mut [], &mut world));
        assert!((p.pos.x - 510.0).abs() < 1e-4);
        assert!(!p.update(0.1, &mut [], &mut world));
        assert!(world.pending.projectiles.is_empty());
    }

    #[test]
    fn test_expiry_runs_death_hook() {
        let mut world = world();
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                lifetime: 0.05,
                piercing: true,
                hooks: ProjectileHooks {
                    on_death: Some(DeathHook::Explode { damage: 400.0 }),
                    ..Default::default()
                },
                ..ProjectileSpec::new(VisualKind::Explosive, Vec2::new(300.0, 300.0))
            },
        );
        assert!(!p.update(0.1, &mut [], &mut world));
        assert_eq!(world.pending.projectiles.len(), 1);
        let blast = &world.pending.projectiles[0];
        assert_eq!(blast.damage, 400.0);
        assert_eq!(blast.size, EXPLOSION_SIZE);
        assert_eq!(blast.pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_unfriendly_hits_player_on_first_contact_tick() {
        let mut world = world();
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                dir: Vec2::new(-300.0, 0.0),
                damage: 10.0,
                unfriendly: true,
                ..ProjectileSpec::new(VisualKind::Heart, Vec2::new(50.0, 0.0))
            },
        );

        // 33² threshold: x = 35 misses, x = 32 hits
        for _ in 0..5 {
            assert!(p.update(0.01, &mut [], &mut world));
            assert_eq!(world.player.health, 100.0);
        }
        assert!(!p.update(0.01, &mut [], &mut world));
        assert!((world.player.health - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_unfriendly_damage_grows_with_time() {
        let mut world = world();
        world.minutes_survived = 10.0;
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                damage: 10.0,
                unfriendly: true,
                ..ProjectileSpec::new(VisualKind::Star, Vec2::new(5.0, 0.0))
            },
        );
        assert!(!p.update(0.01, &mut [], &mut world));
        let expected = 100.0 - 10.0 * 1.05f32.powf(10.0);
        assert!((world.player.health - expected).abs() < 1e-3);
    }

    #[test]
    fn test_friendly_ignores_player() {
        let mut world = world();
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                damage: 50.0,
                ..ProjectileSpec::new(VisualKind::Cookie, Vec2::ZERO)
            },
        );
        assert!(p.update(0.01, &mut [], &mut world));
        assert_eq!(world.player.health, 100.0);
    }

    #[test]
    fn test_friendly_hit_scales_with_time_and_penalty() {
        let mut world = world();
        world.minutes_survived = 2.0;
        world.ghost.penalty = 0.5;
        let mut enemies = vec![enemy_at(&mut world, Vec2::new(400.0, 0.0))];
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                damage: 120.0,
                ..ProjectileSpec::new(VisualKind::Cookie, Vec2::new(390.0, 0.0))
            },
        );
        assert!(!p.update(0.01, &mut enemies, &mut world));
        let expected = 600.0 - 120.0 * 0.95f32.powf(2.0) * 0.5;
        assert!((enemies[0].health - expected).abs() < 1e-3);
    }

    #[test]
    fn test_piercing_survives_and_deals_per_second() {
        let mut world = world();
        let mut enemies = vec![enemy_at(&mut world, Vec2::new(400.0, 0.0))];
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                damage: 1200.0,
                piercing: true,
                ..ProjectileSpec::new(VisualKind::Diamond, Vec2::new(400.0, 0.0))
            },
        );
        assert!(p.update(0.1, &mut enemies, &mut world));
        assert!((enemies[0].health - (600.0 - 120.0)).abs() < 1e-3);
    }

    #[test]
    fn test_hits_only_first_enemy_in_order() {
        let mut world = world();
        let mut enemies = vec![
            enemy_at(&mut world, Vec2::new(420.0, 0.0)),
            enemy_at(&mut world, Vec2::new(401.0, 0.0)),
        ];
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                damage: 100.0,
                piercing: true,
                ..ProjectileSpec::new(VisualKind::Bolt, Vec2::new(400.0, 0.0))
            },
        );
        assert!(p.update(1.0, &mut enemies, &mut world));
        assert!(enemies[0].health < 600.0, "first in order is hit, not the nearest");
        assert_eq!(enemies[1].health, 600.0);
    }

    #[test]
    fn test_freeze_hook_freezes_enemy() {
        let mut world = world();
        let mut enemies = vec![enemy_at(&mut world, Vec2::new(400.0, 0.0))];
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                damage: 20.0,
                hooks: ProjectileHooks {
                    on_hit: Some(HitHook::Freeze { seconds: 3.0 }),
                    ..Default::default()
                },
                ..ProjectileSpec::new(VisualKind::Ice, Vec2::new(410.0, 0.0))
            },
        );
        assert!(!p.update(0.01, &mut enemies, &mut world));
        assert_eq!(enemies[0].freeze_time, 3.0);
        assert_eq!(
            world.scene.get(enemies[0].visual).unwrap().kind,
            VisualKind::Frozen
        );
    }

    #[test]
    fn test_explode_on_hit_leaves_blast() {
        let mut world = world();
        let mut enemies = vec![enemy_at(&mut world, Vec2::new(400.0, 0.0))];
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                damage: 120.0,
                hooks: ProjectileHooks {
                    on_hit: Some(HitHook::Explode { damage: 480.0 }),
                    ..Default::default()
                },
                ..ProjectileSpec::new(VisualKind::Fire, Vec2::new(400.0, 10.0))
            },
        );
        assert!(!p.update(0.01, &mut enemies, &mut world));
        assert_eq!(world.pending.projectiles.len(), 1);
        assert!(world.pending.projectiles[0].piercing);
    }

    #[test]
    fn test_decelerate_hook() {
        let mut world = world();
        let mut p = fire(
            &mut world,
            ProjectileSpec {
                dir: Vec2::new(450.0, 0.0),
                hooks: ProjectileHooks {
                    on_update: Some(UpdateHook::Decelerate),
                    ..Default::default()
                },
                ..ProjectileSpec::new(VisualKind::Germ, Vec2::new(1000.0, 0.0))
            },
        );
        p.update(0.1, &mut [], &mut world);
        assert!((p.dir.x - 405.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_alive_unless_expired_or_consumed(
            offset_x in -40.0f32..40.0,
            offset_y in -40.0f32..40.0,
            lifetime in -0.5f32..2.0,
            piercing in any::<bool>(),
        ) {
            let mut world = world();
            let mut enemies = vec![enemy_at(&mut world, Vec2::ZERO)];
            let mut p = fire(
                &mut world,
                ProjectileSpec {
                    damage: 10.0,
                    lifetime,
                    piercing,
                    ..ProjectileSpec::new(VisualKind::Bolt, Vec2::new(offset_x, offset_y))
                },
            );
            let expired = lifetime - 0.01 < 0.0;
            let hit = !expired && Vec2::new(offset_x, offset_y).length_squared() < 33.0 * 33.0;
            let alive = p.update(0.01, &mut enemies, &mut world);
            prop_assert_eq!(alive, !expired && (piercing || !hit));
        }
    }
}
