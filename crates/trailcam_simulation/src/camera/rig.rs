//! Camera rig core — follow + zone stack + transition state machine
//!
//! Не зависит от ECS queries: система передаёт текущую позицию камеры,
//! snapshot цели и dt, получает новую позицию. Вся логика тестируется
//! без App.
//!
//! # Режимы
//! - Tracking: lerp к (target + offset + velocity lead), zone blend по axis_lock
//! - Transitioning: после входа в зону locked оси плавно едут к позиции зоны
//!   за `transition_time`, unlocked оси продолжают tracking
//!
//! Выход из зоны отменяет transition сразу (без промежуточного кадра).

use bevy::prelude::*;
use serde::Deserialize;

use super::bounds::CameraLens;
use crate::effects::MusicCrossfade;

/// Per-axis lerp: `a + (b - a) * t` покомпонентно
///
/// t = 0 → a, t = 1 → b. Используется для axis lock (a = позиция зоны).
pub fn lerp_per_axis(a: Vec3, b: Vec3, t: Vec3) -> Vec3 {
    a + (b - a) * t
}

/// Кривая прогресса для zone transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Deserialize)]
pub enum TransitionEasing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
}

impl TransitionEasing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TransitionEasing::Linear => t,
            TransitionEasing::QuadIn => t * t,
            TransitionEasing::QuadOut => t * (2.0 - t),
            TransitionEasing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Параметры слежения (часть FollowCamera, задаются дизайнером)
#[derive(Debug, Clone, PartialEq, Reflect, Deserialize)]
#[serde(default)]
pub struct FollowSettings {
    /// Смещение камеры от цели
    pub offset: Vec3,
    /// Скорость lerp (доля пути за секунду)
    pub speed: f32,
    /// Dead-zone: ближе этого к ideal позиции камера не двигается
    pub move_start_distance: f32,
    /// Per-axis множитель velocity lead
    pub velocity_adjustment: Vec3,
    pub easing: TransitionEasing,
    pub lens: CameraLens,
}

impl Default for FollowSettings {
    fn default() -> Self {
        Self {
            offset: Vec3::Z,
            speed: 1.0,
            move_start_distance: 1.0,
            velocity_adjustment: Vec3::new(0.2, 0.0, 0.0),
            easing: TransitionEasing::Linear,
            lens: CameraLens::default(),
        }
    }
}

impl FollowSettings {
    /// Упреждение по скорости цели
    ///
    /// Planar (2D) цель: камера дополнительно отъезжает назад (по знаку offset.z)
    /// пропорционально скорости — быстрее движение, шире обзор.
    pub fn velocity_lead(&self, target: &TargetSample) -> Vec3 {
        let mut lead = target.velocity * self.velocity_adjustment;
        if target.planar {
            let back = if self.offset.z >= 0.0 { Vec3::Z } else { Vec3::NEG_Z };
            lead += back * lead.length() * self.velocity_adjustment.z;
        }
        lead
    }

    pub fn ideal_position(&self, target: &TargetSample) -> Vec3 {
        target.position + self.offset
    }
}

/// Snapshot цели на текущем кадре
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetSample {
    pub position: Vec3,
    pub velocity: Vec3,
    /// 2D body (velocity без Z)
    pub planar: bool,
}

impl TargetSample {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    pub fn moving(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            planar: false,
        }
    }
}

/// Зона на стеке rig'а (snapshot параметров CameraZone)
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ActiveZone {
    pub zone: Entity,
    /// Фиксированная позиция камеры (zone transform + zone offset)
    pub anchor: Vec3,
    /// 0 = ось заморожена на anchor, 1 = обычный tracking
    pub axis_lock: Vec3,
    pub transition_time: f32,
    pub music: Option<String>,
}

impl ActiveZone {
    /// Blend follow позиции с anchor по axis_lock
    pub fn blend(&self, follow: Vec3) -> Vec3 {
        lerp_per_axis(self.anchor, follow, self.axis_lock)
    }
}

/// Transition в процессе (elapsed копится на каждом tick)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ZoneTransition {
    pub start: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

impl ZoneTransition {
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Состояние rig'а: стек зон (последняя вошедшая побеждает) + transition
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct CameraRig {
    zones: Vec<ActiveZone>,
    transition: Option<ZoneTransition>,
}

impl CameraRig {
    pub fn zones(&self) -> &[ActiveZone] {
        &self.zones
    }

    pub fn top_zone(&self) -> Option<&ActiveZone> {
        self.zones.last()
    }

    pub fn contains_zone(&self, zone: Entity) -> bool {
        self.zones.iter().any(|active| active.zone == zone)
    }

    pub fn transition(&self) -> Option<&ZoneTransition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Вход в зону: push + старт transition от `position`.
    ///
    /// Повторный push той же зоны — no-op.
    /// Возвращает crossfade к музыке зоны (если она задана).
    pub fn push_zone(&mut self, zone: ActiveZone, position: Vec3) -> Option<MusicCrossfade> {
        if self.contains_zone(zone.zone) {
            return None;
        }
        self.zones.push(zone);
        self.start_transition(position)
    }

    /// Выход из зоны: pop + немедленная отмена transition.
    ///
    /// Остались зоны → новый transition к верхней.
    /// Стек пуст → `fallback` (default music).
    pub fn remove_zone(
        &mut self,
        zone: Entity,
        position: Vec3,
        fallback: Option<MusicCrossfade>,
    ) -> Option<MusicCrossfade> {
        let Some(index) = self.zones.iter().position(|active| active.zone == zone) else {
            return None;
        };
        self.zones.remove(index);
        self.cancel_transition();

        if self.zones.is_empty() {
            fallback
        } else {
            self.start_transition(position)
        }
    }

    pub fn cancel_transition(&mut self) {
        self.transition = None;
    }

    /// Сброс стека (смена цели rig'а): transition отменяется, снятые зоны возвращаются
    pub fn clear_zones(&mut self) -> Vec<ActiveZone> {
        self.cancel_transition();
        std::mem::take(&mut self.zones)
    }

    /// Обновить anchor зоны (зона могла сдвинуться)
    pub fn refresh_zone_anchor(&mut self, zone: Entity, anchor: Vec3) {
        if let Some(active) = self.zones.iter_mut().find(|active| active.zone == zone) {
            active.anchor = anchor;
        }
    }

    fn start_transition(&mut self, position: Vec3) -> Option<MusicCrossfade> {
        let top = self.zones.last()?;
        self.transition = Some(ZoneTransition {
            start: position,
            elapsed: 0.0,
            duration: top.transition_time.max(0.0),
        });

        top.music.as_ref().map(|clip| MusicCrossfade {
            clip: clip.clone(),
            fade_secs: top.transition_time,
        })
    }

    /// Follow step без зон: None если камера внутри dead-zone
    pub fn follow_step(
        position: Vec3,
        dt: f32,
        target: &TargetSample,
        settings: &FollowSettings,
    ) -> Option<Vec3> {
        let ideal = settings.ideal_position(target);
        if position.distance(ideal) <= settings.move_start_distance {
            return None;
        }

        let t = (dt * settings.speed).clamp(0.0, 1.0);
        Some(position.lerp(ideal + settings.velocity_lead(target), t))
    }

    /// Один кадр: новая позиция камеры (без bounds clamp)
    pub fn tick(
        &mut self,
        position: Vec3,
        dt: f32,
        target: &TargetSample,
        settings: &FollowSettings,
    ) -> Vec3 {
        let follow = Self::follow_step(position, dt, target, settings);

        let Some(mut transition) = self.transition.take() else {
            return match (follow, self.top_zone()) {
                (Some(follow), Some(zone)) => zone.blend(follow),
                (Some(follow), None) => follow,
                (None, _) => position,
            };
        };

        let tracked = follow.unwrap_or(position);
        let Some(zone) = self.zones.last() else {
            return tracked;
        };

        transition.elapsed += dt.max(0.0);
        if transition.is_complete() {
            return zone.blend(tracked);
        }

        // Locked доля оси: start → anchor по кривой; остальное: обычный tracking.
        // На frac = 1 совпадает с zone.blend(tracked), скачка при завершении нет.
        let frac = settings.easing.apply(transition.progress());
        let swept_anchor = transition.start.lerp(zone.anchor, frac);
        let position = lerp_per_axis(swept_anchor, tracked, zone.axis_lock);

        self.transition = Some(transition);
        position
    }

    /// Мгновенная установка камеры (при захвате цели / смене offset)
    ///
    /// Цель внутри зоны → blend с ней. Иначе — clamp к bounds (если есть).
    pub fn snap_position(
        target: &TargetSample,
        settings: &FollowSettings,
        containing_zone: Option<&ActiveZone>,
        bounds: Option<&super::bounds::RigBounds>,
    ) -> Vec3 {
        let position = settings.ideal_position(target);
        if let Some(zone) = containing_zone {
            return zone.blend(position);
        }
        match bounds {
            Some(bounds) => settings.lens.bounded_position(position, bounds),
            None => position,
        }
    }
}
