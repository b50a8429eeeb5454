//! Health systems: применение HealthRequest + рассылка уведомлений

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::{Dead, Destroyed, Health, HealthEffects, HealthTransition, LifeEvent};
use super::events::*;
use crate::config::SimulationConfig;
use crate::effects::{varied_pitch, ParticleRequest, SoundRequest, SpawnRequest};
use crate::logger;
use crate::DeterministicRng;

/// Все исходящие каналы health домена
#[derive(SystemParam)]
pub struct HealthOutbox<'w> {
    changed: EventWriter<'w, HealthChanged>,
    died: EventWriter<'w, EntityDied>,
    resurrected: EventWriter<'w, EntityResurrected>,
    destroyed: EventWriter<'w, EntityDestroyed>,
    sounds: EventWriter<'w, SoundRequest>,
    particles: EventWriter<'w, ParticleRequest>,
    spawns: EventWriter<'w, SpawnRequest>,
    rng: ResMut<'w, DeterministicRng>,
    config: Res<'w, SimulationConfig>,
}

impl HealthOutbox<'_> {
    fn play_sound(&mut self, name: Option<&String>) {
        let Some(name) = name else {
            return;
        };
        let pitch = varied_pitch(&mut self.rng, self.config.sound_pitch_variation);
        self.sounds.write(SoundRequest {
            name: name.clone(),
            pitch,
        });
    }

    fn play_particles(&mut self, name: Option<&String>, position: Vec3, attach_to: Option<Entity>) {
        if let Some(name) = name {
            self.particles.write(ParticleRequest {
                name: name.clone(),
                position,
                attach_to,
            });
        }
    }

    /// Уведомления + side-effects одного перехода (порядок = transition.events)
    fn dispatch(
        &mut self,
        commands: &mut Commands,
        entity: Entity,
        transition: &HealthTransition,
        effects: Option<&HealthEffects>,
        transform: Option<&Transform>,
    ) {
        let effects = effects.cloned().unwrap_or_default();
        let position = transform.map_or(Vec3::ZERO, |t| t.translation);

        for event in &transition.events {
            match event {
                LifeEvent::Damaged => {
                    self.play_sound(effects.damage_sound.as_ref());
                    self.play_particles(effects.damage_particles.as_ref(), position, Some(entity));
                }
                LifeEvent::Died => {
                    self.died.write(EntityDied { entity });
                    commands.trigger_targets(EntityDied { entity }, entity);
                    commands.entity(entity).insert(Dead);

                    // Уничтожение на этом же ударе — свои эффекты
                    if !transition.has(LifeEvent::Destroyed) {
                        self.play_sound(effects.death_sound.as_ref());
                        self.play_particles(effects.death_particles.as_ref(), position, Some(entity));
                    }
                    logger::log_info(&format!("💀 Entity {:?} died (health {})", entity, transition.current));
                }
                LifeEvent::Resurrected => {
                    self.resurrected.write(EntityResurrected { entity });
                    commands.trigger_targets(EntityResurrected { entity }, entity);
                    commands.entity(entity).remove::<Dead>();
                    self.play_sound(effects.resurrection_sound.as_ref());
                    logger::log_info(&format!("✨ Entity {:?} resurrected", entity));
                }
                LifeEvent::Destroyed => {
                    self.play_sound(effects.destruction_sound.as_ref());
                    self.play_particles(effects.destruction_particles.as_ref(), position, None);
                    if let Some(name) = &effects.destruction_spawn {
                        self.spawns.write(SpawnRequest {
                            name: name.clone(),
                            transform: transform.copied().unwrap_or_default(),
                        });
                    }
                    commands.entity(entity).insert(Destroyed);

                    self.destroyed.write(EntityDestroyed { entity });
                    commands.trigger_targets(EntityDestroyed { entity }, entity);
                    logger::log_info(&format!("💥 Entity {:?} destroyed", entity));
                }
            }
        }

        if transition.changed() {
            let changed = HealthChanged {
                entity,
                health: transition.current,
                previous: transition.previous,
                max: transition.max,
            };
            self.changed.write(changed.clone());
            commands.trigger_targets(changed, entity);
        }
    }
}

/// Система: применяет HealthRequest события к Health
///
/// 1. Находим Health цели (нет — warning, пропуск)
/// 2. Damage / Set / SetMax → HealthTransition
/// 3. Рассылаем уведомления и side-effect requests
pub fn apply_health_requests(
    mut commands: Commands,
    mut requests: EventReader<HealthRequest>,
    mut targets: Query<(&mut Health, Option<&HealthEffects>, Option<&Transform>)>,
    mut outbox: HealthOutbox,
) {
    for request in requests.read() {
        let entity = request.target();
        let Ok((mut health, effects, transform)) = targets.get_mut(entity) else {
            logger::log_warning(&format!("HealthRequest: target {:?} has no Health component", entity));
            continue;
        };

        let transition = match *request {
            HealthRequest::Damage {
                amount,
                allow_recovery,
                ..
            } => health.take_damage(amount, allow_recovery),
            HealthRequest::Set { value, .. } => health.set_health(value),
            HealthRequest::SetMax { max, .. } => health.set_max(max),
        };

        outbox.dispatch(&mut commands, entity, &transition, effects, transform);
    }
}
