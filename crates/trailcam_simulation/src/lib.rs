//! trailcam simulation core
//!
//! Headless ECS (Bevy 0.16) для gameplay-поведений камеры и здоровья.
//! Embedding приложение владеет update loop'ом и вызывает `app.update()`.
//!
//! Домены:
//! - camera: follow rig (singleton), camera zones, bounds
//! - health: health state machine + life events
//! - effects: requests к audio/particle/spawn сервисам host'а

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod camera;
pub mod config;
pub mod effects;
pub mod health;
pub mod logger;

pub use camera::{
    CameraPlugin, CameraSubject, CameraZone, FollowCamera, FollowSettings, PrimaryRig, RigBounds,
    SetCameraOffset, TrackedVelocity, ZoneTrigger, ZoneVolume,
};
pub use config::{ConfigError, SimulationConfig};
pub use effects::{EffectsPlugin, MusicCrossfade, ParticleRequest, SoundRequest, SpawnRequest};
pub use health::{
    EntityDestroyed, EntityDied, EntityResurrected, Health, HealthChanged, HealthEffects,
    HealthPlugin, HealthRequest,
};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Берёт `SimulationConfig` из мира (или default).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app.insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            .insert_resource(config)
            .add_plugins((EffectsPlugin, CameraPlugin, HealthPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(SimulationConfig {
        seed,
        ..default()
    })
}

pub fn create_headless_app_with_config(config: SimulationConfig) -> App {
    let mut app = App::new();
    logger::init_logger();
    logger::set_log_level(config.log_level);

    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(config.seed))
        .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
        .insert_resource(config);

    app
}

/// Snapshot компонента по всем entity (для сравнения детерминизма)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
