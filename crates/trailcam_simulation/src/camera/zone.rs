//! Camera zone — trigger volume с фиксированной позицией камеры
//!
//! Зона не хранит runtime state кроме occupancy: при входе subject'а
//! пушится на стек primary rig'а, при выходе — снимается.

use bevy::prelude::*;
use serde::Deserialize;

use super::rig::ActiveZone;

/// Probe вокруг subject'а при snap (sphere overlap для 3D volumes)
pub const SUBJECT_PROBE_RADIUS: f32 = 1.0;

/// Форма trigger volume (центр = Transform зоны)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Deserialize)]
pub enum ZoneVolume {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// 2D: Z игнорируется, point test
    Rect { half_extents: Vec2 },
}

impl ZoneVolume {
    /// Пересекается ли sphere(point, probe_radius) с volume
    pub fn overlaps(&self, center: Vec3, point: Vec3, probe_radius: f32) -> bool {
        let local = point - center;
        match *self {
            ZoneVolume::Box { half_extents } => {
                let half = half_extents.abs();
                let closest = local.clamp(-half, half);
                closest.distance_squared(local) <= probe_radius * probe_radius
            }
            ZoneVolume::Sphere { radius } => local.length() <= radius + probe_radius,
            ZoneVolume::Rect { half_extents } => {
                local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y
            }
        }
    }
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, ZoneOccupancy)]
pub struct CameraZone {
    /// Позиция камеры = zone translation + offset
    pub offset: Vec3,
    /// 0 = ось заморожена на позиции зоны, 1 = обычный tracking
    pub axis_lock: Vec3,
    pub transition_time: f32,
    pub music: Option<String>,
    /// None — только host trigger callbacks (ZoneTrigger)
    pub volume: Option<ZoneVolume>,
    /// Entities с `ZoneLinked`, активные пока зона на стеке
    pub linked: Vec<Entity>,
}

impl Default for CameraZone {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 0.0, 150.0),
            axis_lock: Vec3::ONE,
            transition_time: 1.0,
            music: None,
            volume: None,
            linked: Vec::new(),
        }
    }
}

impl CameraZone {
    pub fn anchor(&self, transform: &Transform) -> Vec3 {
        transform.translation + self.offset
    }

    pub fn contains(&self, transform: &Transform, point: Vec3, probe_radius: f32) -> bool {
        self.volume
            .is_some_and(|volume| volume.overlaps(transform.translation, point, probe_radius))
    }

    /// Snapshot для стека rig'а
    pub fn activate(&self, zone: Entity, transform: &Transform) -> ActiveZone {
        ActiveZone {
            zone,
            anchor: self.anchor(transform),
            axis_lock: self.axis_lock,
            transition_time: self.transition_time,
            music: self.music.clone(),
        }
    }
}

/// Subjects внутри volume (обновляет detect_zone_overlaps)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ZoneOccupancy {
    pub subjects: Vec<Entity>,
}

/// Вспомогательное поведение, включаемое зоной
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ZoneLinked {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Enter,
    Exit,
}

/// Subject вошёл/вышел из зоны
///
/// Пишет host (physics trigger callbacks) или detect_zone_overlaps.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZoneTrigger {
    pub zone: Entity,
    pub subject: Entity,
    pub kind: TriggerKind,
}
