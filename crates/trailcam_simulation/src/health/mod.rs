//! Health domain — health/damage state + life events
//!
//! ECS ответственность:
//! - Game state: Health (current/max/destruction threshold)
//! - Rules: clamp, death/resurrection/destruction transitions
//! - Events: HealthChanged, EntityDied, EntityResurrected, EntityDestroyed
//!
//! Host ответственность:
//! - Audio/particles/spawn по SoundRequest/ParticleRequest/SpawnRequest
//! - Реальная деактивация visuals для entity с `Destroyed`

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::{Dead, Destroyed, Health, HealthEffects, HealthTransition, LifeEvent, LifeState};
pub use events::{EntityDestroyed, EntityDied, EntityResurrected, HealthChanged, HealthRequest};

/// Health Plugin
///
/// Update: apply_health_requests (event-driven, от dt не зависит)
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthRequest>()
            .add_event::<HealthChanged>()
            .add_event::<EntityDied>()
            .add_event::<EntityResurrected>()
            .add_event::<EntityDestroyed>();

        app.add_systems(Update, systems::apply_health_requests);
    }
}
