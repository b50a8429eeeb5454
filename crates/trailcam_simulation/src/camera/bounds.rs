//! Bounding region для rig'а: камера не показывает ничего за пределами region

use bevy::prelude::*;
use serde::Deserialize;

/// Axis-aligned region (world space)
///
/// Clamp работает по XY — Z (глубина) остаётся как есть.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Deserialize)]
pub struct RigBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl RigBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Сдвигает камеру так, чтобы view rectangle (half_extents) остался внутри region.
    ///
    /// Если view шире region по оси — камера центрируется по этой оси.
    pub fn clamp_view(&self, position: Vec3, half_extents: Vec2) -> Vec3 {
        let center = self.center();
        Vec3::new(
            clamp_axis(position.x, self.min.x + half_extents.x, self.max.x - half_extents.x, center.x),
            clamp_axis(position.y, self.min.y + half_extents.y, self.max.y - half_extents.y, center.y),
            position.z,
        )
    }
}

fn clamp_axis(value: f32, lo: f32, hi: f32, center: f32) -> f32 {
    if lo > hi {
        center
    } else {
        value.clamp(lo, hi)
    }
}

/// Параметры объектива (нужны только для расчёта видимой области)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Deserialize)]
pub enum CameraLens {
    Orthographic {
        /// Половина высоты видимой области (world units)
        half_height: f32,
        /// width / height
        aspect: f32,
    },
    Perspective {
        /// Vertical FOV (радианы)
        fov_y: f32,
        aspect: f32,
    },
}

impl Default for CameraLens {
    fn default() -> Self {
        Self::Orthographic {
            half_height: 5.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CameraLens {
    /// Половина видимого прямоугольника на расстоянии `depth` от камеры
    pub fn half_extents(&self, depth: f32) -> Vec2 {
        match *self {
            CameraLens::Orthographic { half_height, aspect } => {
                Vec2::new(half_height * aspect, half_height)
            }
            CameraLens::Perspective { fov_y, aspect } => {
                let half_height = depth.abs() * (fov_y * 0.5).tan();
                Vec2::new(half_height * aspect, half_height)
            }
        }
    }

    /// Clamp позиции камеры в bounds с учётом видимой области
    pub fn bounded_position(&self, position: Vec3, bounds: &RigBounds) -> Vec3 {
        let depth = position.z - bounds.center().z;
        bounds.clamp_view(position, self.half_extents(depth))
    }
}
