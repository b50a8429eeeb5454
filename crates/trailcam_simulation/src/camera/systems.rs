//! Camera rig systems: регистрация singleton'а, захват цели, движение

use bevy::prelude::*;

use super::bounds::RigBounds;
use super::components::*;
use super::rig::{ActiveZone, CameraRig};
use super::zone::{CameraZone, ZoneLinked, ZoneOccupancy, SUBJECT_PROBE_RADIUS};
use super::zone_systems::set_linked;
use crate::config::SimulationConfig;
use crate::effects::MusicCrossfade;
use crate::logger;

type TargetQuery<'w, 's> =
    Query<'w, 's, (&'static Transform, Option<&'static TrackedVelocity>), Without<FollowCamera>>;
type ZoneQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static CameraZone, &'static Transform, &'static ZoneOccupancy),
    Without<FollowCamera>,
>;

/// Система: регистрация rig'ов (singleton)
///
/// - Первый rig → PrimaryRig + crossfade к default music
/// - Дубликат с `destroy_duplicates` → warning + despawn
/// - Дубликат без `destroy_duplicates` → живёт, но зоны его не трогают
/// - Primary пропал → выживший secondary становится primary
pub fn register_rigs(
    mut commands: Commands,
    mut rigs: Query<(Entity, &mut FollowCamera)>,
    mut primary: ResMut<PrimaryRig>,
    mut music: EventWriter<MusicCrossfade>,
    config: Res<SimulationConfig>,
) {
    let fade_secs = config.default_music_fade_secs;

    if primary.entity.is_some_and(|existing| !rigs.contains(existing)) {
        primary.entity = None;

        if let Some((entity, mut camera)) = rigs.iter_mut().find(|(_, camera)| !camera.is_added()) {
            logger::log_info(&format!("📷 Primary rig gone, promoting {:?}", entity));
            // Стек secondary не вёлся — пересоберётся в acquire_targets
            camera.acquired = None;
            make_primary(entity, &camera, &mut primary, &mut music, fade_secs);
        }
    }

    for (entity, camera) in rigs.iter_mut() {
        if !camera.is_added() {
            continue;
        }

        if primary.entity.is_none() {
            make_primary(entity, &camera, &mut primary, &mut music, fade_secs);
            continue;
        }

        if camera.destroy_duplicates {
            logger::log_warning(&format!(
                "Camera rig already exists ({:?}). Destroying duplicate {:?}",
                primary.entity, entity
            ));
            commands.entity(entity).despawn();
        } else {
            logger::log_info(&format!("Secondary camera rig {:?} kept alive", entity));
        }
    }
}

fn make_primary(
    entity: Entity,
    camera: &FollowCamera,
    primary: &mut PrimaryRig,
    music: &mut EventWriter<MusicCrossfade>,
    fade_secs: f32,
) {
    primary.entity = Some(entity);
    logger::log(&format!("📷 Primary camera rig: {:?}", entity));

    if let Some(crossfade) = camera.default_crossfade(fade_secs) {
        music.write(crossfade);
    }
}

/// Система: захват цели + snap
///
/// Цель пропала (despawn) → ищем первый `CameraSubject`. Не нашли — rig ждёт.
/// Цель сменилась → стек зон пересобирается под новую цель.
#[allow(clippy::too_many_arguments)]
pub fn acquire_targets(
    mut rigs: Query<(Entity, &mut FollowCamera, &mut Transform)>,
    subjects: Query<Entity, (With<CameraSubject>, Without<FollowCamera>)>,
    targets: TargetQuery,
    zones: ZoneQuery,
    bounds_sources: Query<&RenderBounds>,
    mut linked: Query<&mut ZoneLinked>,
    mut music: EventWriter<MusicCrossfade>,
    primary: Res<PrimaryRig>,
    config: Res<SimulationConfig>,
) {
    for (entity, mut camera, mut transform) in rigs.iter_mut() {
        let target_alive = camera.target.is_some_and(|target| targets.contains(target));

        if !target_alive {
            if let Some(subject) = subjects.iter().next() {
                if camera.target.is_some() {
                    logger::log(&format!("📷 Rig target lost, switching to subject {:?}", subject));
                }
                camera.target = Some(subject);
                camera.pending_snap = true;
            }
        }

        if camera.target != camera.acquired {
            let is_primary = primary.entity == Some(entity);
            let crossfade = rebuild_zone_stack(
                &mut camera,
                transform.translation,
                is_primary,
                &zones,
                &mut linked,
                config.default_music_fade_secs,
            );
            if let Some(crossfade) = crossfade {
                music.write(crossfade);
            }
            camera.acquired = camera.target;
            camera.pending_snap = true;
        }

        if !camera.pending_snap {
            continue;
        }

        let Some(target) = camera.target else {
            continue;
        };
        let Ok((target_transform, velocity)) = targets.get(target) else {
            continue;
        };

        let sample = sample_target(target_transform, velocity);
        let zone = camera
            .rig
            .top_zone()
            .cloned()
            .or_else(|| zone_containing(sample.position, &zones));
        let bounds = effective_bounds(&camera, &bounds_sources);

        transform.translation =
            CameraRig::snap_position(&sample, &camera.settings, zone.as_ref(), bounds.as_ref());
        camera.pending_snap = false;
    }
}

/// Стек зон для новой цели
///
/// Зоны старой цели снимаются (их Exit больше не придёт — trigger'ы идут
/// только от цели rig'а). Primary rig сразу получает зоны, в которых новая
/// цель уже стоит (по `ZoneOccupancy`). Transition не нужен: следом идёт snap.
fn rebuild_zone_stack(
    camera: &mut FollowCamera,
    position: Vec3,
    is_primary: bool,
    zones: &ZoneQuery,
    linked: &mut Query<&mut ZoneLinked>,
    fade_secs: f32,
) -> Option<MusicCrossfade> {
    let cleared = camera.rig.clear_zones();
    if !is_primary {
        return None;
    }

    for active in &cleared {
        if let Ok((_, zone, _, _)) = zones.get(active.zone) {
            set_linked(zone, false, linked);
        }
    }

    let mut crossfade = None;
    if let Some(target) = camera.target {
        for (zone_entity, zone, zone_transform, occupancy) in zones.iter() {
            if !occupancy.subjects.contains(&target) {
                continue;
            }
            let pushed = camera.rig.push_zone(zone.activate(zone_entity, zone_transform), position);
            crossfade = pushed.or(crossfade);
            set_linked(zone, true, linked);
        }
    }
    camera.rig.cancel_transition();

    if camera.rig.zones().is_empty() && !cleared.is_empty() {
        crossfade = camera.default_crossfade(fade_secs);
    }
    crossfade
}

/// Система: SetCameraOffset → новый offset + snap primary rig'а
pub fn apply_offset_changes(
    mut events: EventReader<SetCameraOffset>,
    primary: Res<PrimaryRig>,
    mut rigs: Query<&mut FollowCamera>,
) {
    for event in events.read() {
        let Some(entity) = primary.entity else {
            continue;
        };
        if let Ok(mut camera) = rigs.get_mut(entity) {
            camera.settings.offset = event.offset;
            camera.pending_snap = true;
        }
    }
}

/// Система: движение rig'ов в PostUpdate
pub fn advance_rigs_late(
    time: Res<Time>,
    mut rigs: Query<(&mut FollowCamera, &mut Transform)>,
    targets: TargetQuery,
    bounds_sources: Query<&RenderBounds>,
) {
    advance_rigs(RigUpdateMode::Late, time.delta_secs(), &mut rigs, &targets, &bounds_sources);
}

/// Система: движение rig'ов в FixedUpdate
pub fn advance_rigs_fixed(
    time: Res<Time>,
    mut rigs: Query<(&mut FollowCamera, &mut Transform)>,
    targets: TargetQuery,
    bounds_sources: Query<&RenderBounds>,
) {
    advance_rigs(RigUpdateMode::Fixed, time.delta_secs(), &mut rigs, &targets, &bounds_sources);
}

fn advance_rigs(
    mode: RigUpdateMode,
    dt: f32,
    rigs: &mut Query<(&mut FollowCamera, &mut Transform)>,
    targets: &TargetQuery,
    bounds_sources: &Query<&RenderBounds>,
) {
    for (mut camera, mut transform) in rigs.iter_mut() {
        if camera.update_mode != mode || camera.pending_snap {
            continue;
        }

        // Нет цели → пропускаем кадр (acquire_targets найдёт новую)
        let Some(target) = camera.target else {
            continue;
        };
        let Ok((target_transform, velocity)) = targets.get(target) else {
            continue;
        };

        let sample = sample_target(target_transform, velocity);
        let bounds = effective_bounds(&camera, bounds_sources);

        let camera = &mut *camera;
        let mut position = camera.rig.tick(transform.translation, dt, &sample, &camera.settings);
        if let Some(bounds) = bounds {
            position = camera.settings.lens.bounded_position(position, &bounds);
        }
        transform.translation = position;
    }
}

fn effective_bounds(camera: &FollowCamera, sources: &Query<&RenderBounds>) -> Option<RigBounds> {
    camera
        .bounds_source
        .and_then(|source| sources.get(source).ok())
        .map(|render_bounds| render_bounds.0)
        .or(camera.bounds)
}

/// Первая зона, чей volume пересекает probe вокруг точки
fn zone_containing(point: Vec3, zones: &ZoneQuery) -> Option<ActiveZone> {
    zones
        .iter()
        .find(|(_, zone, transform, _)| zone.contains(transform, point, SUBJECT_PROBE_RADIUS))
        .map(|(entity, zone, transform, _)| zone.activate(entity, transform))
}
