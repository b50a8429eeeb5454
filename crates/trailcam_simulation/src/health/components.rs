//! Health component — clamped scalar + life state machine
//!
//! Инварианты:
//! - current ≤ max (снизу не ограничено — overkill уходит в минус)
//! - Alive ⇔ current > 0, пока не Destroyed
//! - Destroyed терминален: дальнейшие изменения игнорируются
//!
//! Переходы:
//! - Alive → Dead: current пересёк 0 сверху
//! - Dead → Alive: current поднялся выше 0 (resurrection)
//! - * → Destroyed: current пересёк destruction_threshold сверху,
//!   или смерть от урона без права на восстановление

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum LifeState {
    Alive,
    Dead,
    Destroyed,
}

/// Что произошло при изменении health (в порядке срабатывания)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum LifeEvent {
    Damaged,
    Died,
    Resurrected,
    Destroyed,
}

/// Результат одного изменения health
#[derive(Debug, Clone, PartialEq)]
pub struct HealthTransition {
    pub previous: f32,
    pub current: f32,
    pub max: f32,
    pub events: Vec<LifeEvent>,
}

impl HealthTransition {
    fn unchanged(health: &Health) -> Self {
        Self {
            previous: health.current,
            current: health.current,
            max: health.max,
            events: Vec::new(),
        }
    }

    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    pub fn has(&self, event: LifeEvent) -> bool {
        self.events.contains(&event)
    }
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
    /// Some(d): падение до ≤ d (сверху) уничтожает entity
    destruction_threshold: Option<f32>,
    life: LifeState,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            destruction_threshold: None,
            life: if max > 0.0 { LifeState::Alive } else { LifeState::Dead },
        }
    }

    pub fn with_destruction_threshold(mut self, threshold: f32) -> Self {
        self.destruction_threshold = Some(threshold);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn destruction_threshold(&self) -> Option<f32> {
        self.destruction_threshold
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn is_dead(&self) -> bool {
        self.life != LifeState::Alive
    }

    pub fn is_destroyed(&self) -> bool {
        self.life == LifeState::Destroyed
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Единственная точка изменения current
    pub fn set_health(&mut self, value: f32) -> HealthTransition {
        if self.is_destroyed() || value.is_nan() {
            return HealthTransition::unchanged(self);
        }

        let previous = self.current;
        self.current = value.min(self.max);
        let current = self.current;

        let crossed_destruction = self
            .destruction_threshold
            .is_some_and(|threshold| current <= threshold && previous > threshold);

        let mut events = Vec::new();
        if current <= 0.0 && previous > 0.0 {
            events.push(LifeEvent::Died);
            self.life = LifeState::Dead;
            if crossed_destruction {
                events.push(LifeEvent::Destroyed);
            }
        } else if crossed_destruction {
            events.push(LifeEvent::Destroyed);
        } else if current > 0.0 && previous <= 0.0 {
            events.push(LifeEvent::Resurrected);
            self.life = LifeState::Alive;
        } else if current < previous {
            events.push(LifeEvent::Damaged);
        }

        if events.contains(&LifeEvent::Destroyed) {
            self.life = LifeState::Destroyed;
        }

        HealthTransition {
            previous,
            current,
            max: self.max,
            events,
        }
    }

    /// Урон (отрицательный amount лечит)
    ///
    /// `allow_recovery = false`: мёртвый после удара entity сразу уничтожается.
    pub fn take_damage(&mut self, amount: f32, allow_recovery: bool) -> HealthTransition {
        if self.is_destroyed() {
            return HealthTransition::unchanged(self);
        }

        let mut transition = self.set_health(self.current - amount);
        if !allow_recovery && self.life == LifeState::Dead {
            self.life = LifeState::Destroyed;
            transition.events.push(LifeEvent::Destroyed);
        }
        transition
    }

    pub fn heal(&mut self, amount: f32) -> HealthTransition {
        self.set_health(self.current + amount)
    }

    /// Новый max; current сдвигается на ту же дельту
    ///
    /// - current < new max → current += delta (может убить при уменьшении max)
    /// - current > new max → current = new max
    pub fn set_max(&mut self, max: f32) -> HealthTransition {
        if self.is_destroyed() || max == self.max || max.is_nan() {
            return HealthTransition::unchanged(self);
        }

        let delta = max - self.max;
        self.max = max;

        if self.current < max {
            self.set_health(self.current + delta)
        } else if self.current > max {
            self.set_health(max)
        } else {
            HealthTransition::unchanged(self)
        }
    }
}

/// Маркер: entity мёртв (health ≤ 0), снимается при resurrection
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Маркер: entity уничтожен (терминально, деактивирован)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Destroyed;

/// Имена side-effect'ов для audio/particle/spawn сервисов host'а
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct HealthEffects {
    pub damage_sound: Option<String>,
    pub damage_particles: Option<String>,
    pub death_sound: Option<String>,
    pub death_particles: Option<String>,
    pub resurrection_sound: Option<String>,
    pub destruction_sound: Option<String>,
    pub destruction_particles: Option<String>,
    /// Prefab на месте уничтоженного entity
    pub destruction_spawn: Option<String>,
}
