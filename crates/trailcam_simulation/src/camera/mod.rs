//! Camera domain — follow rig + camera zones
//!
//! ECS ответственность:
//! - Rig state: zone stack, transition, target
//! - Zone triggers: overlap detection или host callbacks → push/pop
//! - Requests: MusicCrossfade при входе/выходе из зон
//!
//! Host ответственность:
//! - Реальная камера (читает Transform rig'а)
//! - Physics triggers (опционально, через ZoneTrigger)
//! - Velocity / render bounds (TrackedVelocity, RenderBounds)

use bevy::prelude::*;

pub mod bounds;
pub mod components;
pub mod rig;
pub mod systems;
pub mod zone;
pub mod zone_systems;

#[cfg(test)]
mod rig_tests;

pub use bounds::{CameraLens, RigBounds};
pub use components::*;
pub use rig::{ActiveZone, CameraRig, FollowSettings, TargetSample, TransitionEasing, ZoneTransition};
pub use zone::{CameraZone, TriggerKind, ZoneLinked, ZoneOccupancy, ZoneTrigger, ZoneVolume};

/// Camera Plugin
///
/// PostUpdate (после движения цели):
/// 1. register_rigs — singleton, дубликаты despawn
/// 2. apply_offset_changes — SetCameraOffset → snap на этом же кадре
/// 3. acquire_targets — захват цели + snap
/// 4. detect_zone_overlaps — volume overlap → ZoneTrigger
/// 5. handle_zone_triggers — push/pop зон, linked behaviours, музыка
/// 6. sync_zone_anchors — зоны могли сдвинуться
/// 7. advance_rigs_late — tick + bounds clamp
///
/// FixedUpdate: advance_rigs_fixed (rig'и в RigUpdateMode::Fixed)
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PrimaryRig>()
            .add_event::<ZoneTrigger>()
            .add_event::<SetCameraOffset>();

        app.add_systems(
            PostUpdate,
            (
                systems::register_rigs,
                systems::apply_offset_changes,
                systems::acquire_targets,
                zone_systems::detect_zone_overlaps,
                zone_systems::handle_zone_triggers,
                zone_systems::sync_zone_anchors,
                systems::advance_rigs_late,
            )
                .chain(),
        );

        app.add_systems(FixedUpdate, systems::advance_rigs_fixed);
    }
}
