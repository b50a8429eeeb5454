//! Zone systems: overlap detection → ZoneTrigger → push/pop на стеке rig'а

use bevy::prelude::*;

use super::components::{CameraSubject, FollowCamera, PrimaryRig};
use super::zone::{CameraZone, TriggerKind, ZoneLinked, ZoneOccupancy, ZoneTrigger};
use crate::config::SimulationConfig;
use crate::effects::MusicCrossfade;
use crate::logger;

/// Система: overlap queries вместо physics trigger callbacks
///
/// Для каждой зоны с volume сравнивает текущих subjects внутри с occupancy
/// прошлого кадра и пишет Enter/Exit. Despawned subject → Exit.
pub fn detect_zone_overlaps(
    mut zones: Query<(Entity, &CameraZone, &Transform, &mut ZoneOccupancy)>,
    subjects: Query<(Entity, &Transform), (With<CameraSubject>, Without<CameraZone>)>,
    mut triggers: EventWriter<ZoneTrigger>,
) {
    for (zone_entity, zone, zone_transform, mut occupancy) in zones.iter_mut() {
        if zone.volume.is_none() {
            continue;
        }

        let inside: Vec<Entity> = subjects
            .iter()
            .filter(|(_, transform)| zone.contains(zone_transform, transform.translation, 0.0))
            .map(|(entity, _)| entity)
            .collect();

        for &subject in occupancy.subjects.iter().filter(|s| !inside.contains(*s)) {
            triggers.write(ZoneTrigger {
                zone: zone_entity,
                subject,
                kind: TriggerKind::Exit,
            });
        }
        for &subject in inside.iter().filter(|s| !occupancy.subjects.contains(*s)) {
            triggers.write(ZoneTrigger {
                zone: zone_entity,
                subject,
                kind: TriggerKind::Enter,
            });
        }

        if occupancy.subjects != inside {
            occupancy.subjects = inside;
        }
    }
}

/// Система: ZoneTrigger → push/pop на стеке primary rig'а
///
/// Реагирует только на цель rig'а. Enter включает linked behaviours,
/// Exit выключает. Нет rig'а / зоны — no-op.
pub fn handle_zone_triggers(
    mut triggers: EventReader<ZoneTrigger>,
    primary: Res<PrimaryRig>,
    mut rigs: Query<(&mut FollowCamera, &Transform)>,
    zones: Query<(&CameraZone, &Transform), Without<FollowCamera>>,
    mut linked: Query<&mut ZoneLinked>,
    mut music: EventWriter<MusicCrossfade>,
    config: Res<SimulationConfig>,
) {
    for trigger in triggers.read() {
        let Some(rig_entity) = primary.entity else {
            continue;
        };
        let Ok((mut camera, camera_transform)) = rigs.get_mut(rig_entity) else {
            continue;
        };
        if camera.target != Some(trigger.subject) {
            continue;
        }

        let position = camera_transform.translation;
        let zone = zones.get(trigger.zone).ok();

        let crossfade = match trigger.kind {
            TriggerKind::Enter => {
                let Some((zone, zone_transform)) = zone else {
                    continue;
                };
                logger::log(&format!("📷 Enter camera zone {:?}", trigger.zone));
                camera.rig.push_zone(zone.activate(trigger.zone, zone_transform), position)
            }
            TriggerKind::Exit => {
                logger::log(&format!("📷 Exit camera zone {:?}", trigger.zone));
                let fallback = camera.default_crossfade(config.default_music_fade_secs);
                camera.rig.remove_zone(trigger.zone, position, fallback)
            }
        };

        if let Some(crossfade) = crossfade {
            music.write(crossfade);
        }

        if let Some((zone, _)) = zone {
            set_linked(zone, trigger.kind == TriggerKind::Enter, &mut linked);
        }
    }
}

/// Включает/выключает linked behaviours зоны
pub(crate) fn set_linked(zone: &CameraZone, enabled: bool, linked: &mut Query<&mut ZoneLinked>) {
    for &behaviour in &zone.linked {
        if let Ok(mut linked_behaviour) = linked.get_mut(behaviour) {
            linked_behaviour.enabled = enabled;
        }
    }
}

/// Система: anchors активных зон следуют за Transform зоны
pub fn sync_zone_anchors(
    mut rigs: Query<&mut FollowCamera>,
    zones: Query<(&CameraZone, &Transform), (Changed<Transform>, Without<FollowCamera>)>,
) {
    for mut camera in rigs.iter_mut() {
        if camera.rig.zones().is_empty() {
            continue;
        }

        let moved: Vec<(Entity, Vec3)> = camera
            .rig
            .zones()
            .iter()
            .filter_map(|active| {
                let (zone, transform) = zones.get(active.zone).ok()?;
                let anchor = zone.anchor(transform);
                (anchor != active.anchor).then_some((active.zone, anchor))
            })
            .collect();

        for (zone, anchor) in moved {
            camera.rig.refresh_zone_anchor(zone, anchor);
        }
    }
}
