//! Camera rig компоненты и ресурсы

use bevy::prelude::*;

use super::bounds::RigBounds;
use super::rig::{CameraRig, FollowSettings, TargetSample};
use crate::effects::MusicCrossfade;

/// В каком schedule двигается rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum RigUpdateMode {
    /// PostUpdate — после того как host подвинул цель на этом кадре
    #[default]
    Late,
    /// FixedUpdate — если цель двигает фиксированная физика
    Fixed,
}

/// Follow camera rig
///
/// Singleton: первый зарегистрированный rig становится `PrimaryRig`,
/// дубликаты (при `destroy_duplicates`) despawn'ятся с warning.
///
/// # Target
/// - `target: Some(entity)` — явная цель
/// - `target: None` — берём первый entity с `CameraSubject`
/// - цели нет — кадр пропускается
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct FollowCamera {
    pub target: Option<Entity>,
    pub settings: FollowSettings,
    /// Статичный bounding region
    pub bounds: Option<RigBounds>,
    /// Entity с `RenderBounds` (перекрывает `bounds`, читается каждый кадр)
    pub bounds_source: Option<Entity>,
    /// Трек вне зон
    pub default_music: Option<String>,
    pub update_mode: RigUpdateMode,
    pub destroy_duplicates: bool,
    pub rig: CameraRig,
    /// Snap к цели на ближайшем кадре (после захвата цели / смены offset)
    pub pending_snap: bool,
    /// Цель, для которой собран стек зон. Расходится с `target` → стек пересобирается.
    pub acquired: Option<Entity>,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            target: None,
            settings: FollowSettings::default(),
            bounds: None,
            bounds_source: None,
            default_music: None,
            update_mode: RigUpdateMode::Late,
            destroy_duplicates: true,
            rig: CameraRig::default(),
            pending_snap: true,
            acquired: None,
        }
    }
}

impl FollowCamera {
    pub fn following(target: Entity) -> Self {
        Self {
            target: Some(target),
            ..default()
        }
    }

    pub fn with_settings(mut self, settings: FollowSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_bounds(mut self, bounds: RigBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn default_crossfade(&self, fade_secs: f32) -> Option<MusicCrossfade> {
        self.default_music.clone().map(|clip| MusicCrossfade { clip, fade_secs })
    }
}

/// Marker: entity, за которым следит камера (если у rig'а нет явной цели)
///
/// Только subjects активируют камерные зоны.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CameraSubject;

/// Скорость цели (пишет host physics)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TrackedVelocity {
    pub linear: Vec3,
    /// 2D body — камера отъезжает назад при движении
    pub planar: bool,
}

/// Render bounds объекта сцены (пишет host bounds utility)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct RenderBounds(pub RigBounds);

/// Текущий singleton rig
#[derive(Resource, Debug, Default)]
pub struct PrimaryRig {
    pub entity: Option<Entity>,
}

/// Сменить offset primary rig'а (с мгновенным snap)
#[derive(Event, Debug, Clone, Copy)]
pub struct SetCameraOffset {
    pub offset: Vec3,
}

pub(crate) fn sample_target(transform: &Transform, velocity: Option<&TrackedVelocity>) -> TargetSample {
    TargetSample {
        position: transform.translation,
        velocity: velocity.map_or(Vec3::ZERO, |v| v.linear),
        planar: velocity.is_some_and(|v| v.planar),
    }
}
