//! Health events
//!
//! **Входящие:** `HealthRequest` — единственный способ изменить Health из ECS.
//!
//! **Исходящие** (каждое пишется в общий канал И триггерится на entity
//! для per-instance observers):
//! - `EntityDied` — общий канал = "кто-то умер" по всем entity
//! - `EntityResurrected`
//! - `EntityDestroyed`
//! - `HealthChanged` — последним, только если значение изменилось
//!
//! # Re-entrancy
//! Observers/readers не должны менять Health напрямую — только через новый
//! `HealthRequest` (применится на следующем проходе apply_health_requests).

use bevy::prelude::*;

#[derive(Event, Debug, Clone, PartialEq)]
pub enum HealthRequest {
    Damage {
        target: Entity,
        amount: f32,
        /// false → смерть от этого урона сразу уничтожает entity
        allow_recovery: bool,
    },
    Set {
        target: Entity,
        value: f32,
    },
    SetMax {
        target: Entity,
        max: f32,
    },
}

impl HealthRequest {
    pub fn damage(target: Entity, amount: f32) -> Self {
        Self::Damage {
            target,
            amount,
            allow_recovery: true,
        }
    }

    pub fn target(&self) -> Entity {
        match *self {
            HealthRequest::Damage { target, .. }
            | HealthRequest::Set { target, .. }
            | HealthRequest::SetMax { target, .. } => target,
        }
    }
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub health: f32,
    pub previous: f32,
    pub max: f32,
}

/// Событие: entity умер (health пересёк 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityResurrected {
    pub entity: Entity,
}

/// Событие: entity уничтожен (терминально)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDestroyed {
    pub entity: Entity,
}
