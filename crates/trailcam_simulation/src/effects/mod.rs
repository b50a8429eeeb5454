//! Side-effect requests к внешним сервисам host'а
//!
//! ECS не играет звук, не рендерит частицы и не спавнит prefab'ы — только
//! отправляет запросы. Host (audio/particle/spawner) читает эти события.
//!
//! - `SoundRequest` — one-shot sound effect (pitch слегка варьируется)
//! - `ParticleRequest` — particle effect в точке или прикреплённый к entity
//! - `SpawnRequest` — spawn prefab по имени с заданным transform
//! - `MusicCrossfade` — плавная смена музыкального трека

use bevy::prelude::*;
use rand::Rng;

use crate::DeterministicRng;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SoundRequest {
    pub name: String,
    pub pitch: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ParticleRequest {
    pub name: String,
    pub position: Vec3,
    /// Some → частицы следуют за entity (host сам решает как прикрепить)
    pub attach_to: Option<Entity>,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub name: String,
    pub transform: Transform,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct MusicCrossfade {
    pub clip: String,
    pub fade_secs: f32,
}

/// Pitch в диапазоне [1 - variation, 1 + variation]
pub fn varied_pitch(rng: &mut DeterministicRng, variation: f32) -> f32 {
    if variation <= 0.0 {
        return 1.0;
    }
    1.0 + rng.rng.gen_range(-variation..=variation)
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundRequest>()
            .add_event::<ParticleRequest>()
            .add_event::<SpawnRequest>()
            .add_event::<MusicCrossfade>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_within_variation() {
        let mut rng = DeterministicRng::new(42);
        for _ in 0..100 {
            let pitch = varied_pitch(&mut rng, 0.1);
            assert!((0.9..=1.1).contains(&pitch), "pitch = {}", pitch);
        }
    }

    #[test]
    fn test_zero_variation_is_neutral() {
        let mut rng = DeterministicRng::new(1);
        assert_eq!(varied_pitch(&mut rng, 0.0), 1.0);
    }

    #[test]
    fn test_same_seed_same_pitches() {
        let mut a = DeterministicRng::new(99);
        let mut b = DeterministicRng::new(99);

        let pitches_a: Vec<f32> = (0..10).map(|_| varied_pitch(&mut a, 0.2)).collect();
        let pitches_b: Vec<f32> = (0..10).map(|_| varied_pitch(&mut b, 0.2)).collect();

        assert_eq!(pitches_a, pitches_b);
    }
}
