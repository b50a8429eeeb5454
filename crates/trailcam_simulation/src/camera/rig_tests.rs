//! Tests for camera rig core.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use crate::camera::bounds::{CameraLens, RigBounds};
    use crate::camera::rig::*;
    use crate::effects::MusicCrossfade;

    /// Speed настолько большой, что lerp t клампится в 1 → tracking без задержки
    fn snappy_settings() -> FollowSettings {
        FollowSettings {
            offset: Vec3::new(0.0, 0.0, 1.0),
            speed: 1000.0,
            move_start_distance: 0.0,
            velocity_adjustment: Vec3::ZERO,
            ..default()
        }
    }

    fn zone(id: u32, anchor: Vec3, axis_lock: Vec3, transition_time: f32) -> ActiveZone {
        ActiveZone {
            zone: Entity::from_raw(id),
            anchor,
            axis_lock,
            transition_time,
            music: None,
        }
    }

    #[test]
    fn test_stationary_target_inside_dead_zone_keeps_position() {
        let settings = FollowSettings::default(); // move_start_distance = 1.0
        let mut rig = CameraRig::default();
        let target = TargetSample::at(Vec3::new(3.0, 2.0, 0.0));
        let start = target.position + settings.offset + Vec3::new(0.5, 0.0, 0.0);

        let mut position = start;
        for _ in 0..10 {
            position = rig.tick(position, 1.0 / 60.0, &target, &settings);
        }

        assert_eq!(position, start);
    }

    #[test]
    fn test_tracking_lerps_toward_ideal() {
        let settings = FollowSettings::default();
        let mut rig = CameraRig::default();
        let target = TargetSample::at(Vec3::new(10.0, 0.0, 0.0));

        // Камера в ideal позиции для цели в (0,0,0)
        let position = rig.tick(Vec3::new(0.0, 0.0, 1.0), 0.1, &target, &settings);

        // t = dt * speed = 0.1 → 10% пути
        assert!((position.x - 1.0).abs() < 1e-5, "x = {}", position.x);
        assert!((position.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_lerp_factor_is_clamped() {
        let settings = FollowSettings {
            speed: 50.0,
            ..default()
        };
        let mut rig = CameraRig::default();
        let target = TargetSample::at(Vec3::new(10.0, 4.0, 0.0));

        let position = rig.tick(Vec3::ZERO, 1.0, &target, &settings);

        assert_eq!(position, target.position + settings.offset);
    }

    #[test]
    fn test_velocity_lead_scales_per_axis() {
        let settings = FollowSettings::default(); // adjustment (0.2, 0, 0)
        let target = TargetSample::moving(Vec3::ZERO, Vec3::new(10.0, 5.0, 0.0));

        assert_eq!(settings.velocity_lead(&target), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_planar_lead_pulls_camera_back() {
        let settings = FollowSettings {
            offset: Vec3::new(0.0, 0.0, 10.0),
            velocity_adjustment: Vec3::new(0.2, 0.0, 0.5),
            ..default()
        };
        let target = TargetSample {
            position: Vec3::ZERO,
            velocity: Vec3::new(10.0, 0.0, 0.0),
            planar: true,
        };

        // lead = (2, 0, 0), отъезд назад = |lead| * 0.5 = 1 по +Z
        assert_eq!(settings.velocity_lead(&target), Vec3::new(2.0, 0.0, 1.0));
    }

    #[test]
    fn test_zone_transition_locks_x_while_y_tracks() {
        let settings = snappy_settings();
        let mut rig = CameraRig::default();
        let mut position = Vec3::new(0.0, 0.0, 1.0);

        let anchor = Vec3::new(20.0, 50.0, 150.0);
        rig.push_zone(zone(1, anchor, Vec3::new(0.0, 1.0, 1.0), 1.0), position);
        assert!(rig.is_transitioning());

        // dt = 0.25 → 4 кадра на transition
        for frame in 1..=4 {
            let target = TargetSample::at(Vec3::new(0.0, frame as f32, 0.0));
            position = rig.tick(position, 0.25, &target, &settings);

            let expected_x = 20.0 * (frame as f32 * 0.25);
            assert!(
                (position.x - expected_x).abs() < 1e-4,
                "frame {}: x = {}, expected {}",
                frame,
                position.x,
                expected_x
            );
            // Y/Z — обычный tracking (не anchor)
            assert_eq!(position.y, frame as f32);
            assert_eq!(position.z, 1.0);
        }

        assert!(!rig.is_transitioning());

        // Steady state: X остаётся на anchor
        let target = TargetSample::at(Vec3::new(-7.0, 9.0, 0.0));
        position = rig.tick(position, 0.25, &target, &settings);
        assert_eq!(position, Vec3::new(20.0, 9.0, 1.0));
    }

    #[test]
    fn test_partial_lock_transition_ends_without_jump() {
        let settings = FollowSettings {
            offset: Vec3::ZERO,
            ..snappy_settings()
        };
        let mut rig = CameraRig::default();
        let target = TargetSample::at(Vec3::new(4.0, 0.0, 0.0));
        let mut position = target.position;

        // Половина X от зоны, половина от tracking: steady x = 20 + (4 - 20) * 0.5 = 12
        rig.push_zone(zone(1, Vec3::new(20.0, 0.0, 0.0), Vec3::new(0.5, 1.0, 1.0), 1.0), position);

        let mut xs = Vec::new();
        for _ in 0..5 {
            position = rig.tick(position, 0.25, &target, &settings);
            xs.push(position.x);
        }

        assert_eq!(xs, vec![6.0, 8.0, 10.0, 12.0, 12.0]);
        assert!(!rig.is_transitioning());
    }

    #[test]
    fn test_clear_zones_drops_stack_and_transition() {
        let mut rig = CameraRig::default();
        rig.push_zone(zone(1, Vec3::X, Vec3::ZERO, 1.0), Vec3::ZERO);
        rig.push_zone(zone(2, Vec3::Y, Vec3::ZERO, 1.0), Vec3::ZERO);

        let cleared = rig.clear_zones();

        assert_eq!(cleared.len(), 2);
        assert!(rig.zones().is_empty());
        assert!(!rig.is_transitioning());
    }

    #[test]
    fn test_zone_exit_cancels_transition_immediately() {
        let settings = snappy_settings();
        let mut rig = CameraRig::default();
        let mut position = Vec3::new(0.0, 0.0, 1.0);
        let target = TargetSample::at(Vec3::ZERO);

        let entered = zone(1, Vec3::new(20.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0), 1.0);
        rig.push_zone(entered, position);
        position = rig.tick(position, 0.25, &target, &settings);
        assert!((position.x - 5.0).abs() < 1e-4);

        rig.remove_zone(Entity::from_raw(1), position, None);
        assert!(!rig.is_transitioning());
        assert!(rig.zones().is_empty());

        // Следующий кадр — обычный tracking без зоны
        position = rig.tick(position, 0.25, &target, &settings);
        assert_eq!(position, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_duplicate_push_is_noop() {
        let mut rig = CameraRig::default();
        let mut first = zone(3, Vec3::X, Vec3::ZERO, 1.0);
        first.music = Some("cave".to_string());

        assert!(rig.push_zone(first.clone(), Vec3::ZERO).is_some());
        assert!(rig.push_zone(first, Vec3::ONE).is_none());

        assert_eq!(rig.zones().len(), 1);
        assert_eq!(rig.transition().map(|t| t.start), Some(Vec3::ZERO));
    }

    #[test]
    fn test_push_requests_zone_music_with_transition_fade() {
        let mut rig = CameraRig::default();
        let mut entered = zone(1, Vec3::ZERO, Vec3::ONE, 2.5);
        entered.music = Some("boss_theme".to_string());

        let crossfade = rig.push_zone(entered, Vec3::ZERO);

        assert_eq!(
            crossfade,
            Some(MusicCrossfade {
                clip: "boss_theme".to_string(),
                fade_secs: 2.5,
            })
        );
    }

    #[test]
    fn test_removing_last_zone_returns_default_music() {
        let mut rig = CameraRig::default();
        rig.push_zone(zone(1, Vec3::ZERO, Vec3::ONE, 1.0), Vec3::ZERO);

        let fallback = MusicCrossfade {
            clip: "overworld".to_string(),
            fade_secs: 0.5,
        };
        let crossfade = rig.remove_zone(Entity::from_raw(1), Vec3::ZERO, Some(fallback.clone()));

        assert_eq!(crossfade, Some(fallback));
    }

    #[test]
    fn test_removing_inner_zone_transitions_to_remaining_top() {
        let mut rig = CameraRig::default();
        let mut outer = zone(1, Vec3::new(-5.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0), 1.0);
        outer.music = Some("outer".to_string());
        rig.push_zone(outer, Vec3::ZERO);
        rig.push_zone(zone(2, Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0), 0.5), Vec3::ZERO);

        let position = Vec3::new(3.0, 0.0, 1.0);
        let crossfade = rig.remove_zone(Entity::from_raw(2), position, None);

        assert_eq!(crossfade.map(|c| c.clip), Some("outer".to_string()));
        assert_eq!(rig.top_zone().map(|z| z.zone), Some(Entity::from_raw(1)));
        let transition = rig.transition().copied().unwrap();
        assert_eq!(transition.start, position);
        assert_eq!(transition.duration, 1.0);
        assert_eq!(transition.elapsed, 0.0);
    }

    #[test]
    fn test_removing_unknown_zone_is_noop() {
        let mut rig = CameraRig::default();
        rig.push_zone(zone(1, Vec3::ZERO, Vec3::ONE, 1.0), Vec3::ZERO);

        let crossfade = rig.remove_zone(Entity::from_raw(9), Vec3::ZERO, None);

        assert!(crossfade.is_none());
        assert!(rig.is_transitioning());
        assert_eq!(rig.zones().len(), 1);
    }

    #[test]
    fn test_zero_duration_transition_completes_on_first_tick() {
        let settings = snappy_settings();
        let mut rig = CameraRig::default();
        rig.push_zone(zone(1, Vec3::new(8.0, 8.0, 8.0), Vec3::ZERO, 0.0), Vec3::ZERO);

        let position = rig.tick(Vec3::ZERO, 0.016, &TargetSample::at(Vec3::ZERO), &settings);

        assert_eq!(position, Vec3::new(8.0, 8.0, 8.0));
        assert!(!rig.is_transitioning());
    }

    #[test]
    fn test_refresh_anchor_moves_locked_axis() {
        let settings = snappy_settings();
        let mut rig = CameraRig::default();
        rig.push_zone(zone(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0), 0.0), Vec3::ZERO);
        rig.refresh_zone_anchor(Entity::from_raw(1), Vec3::new(6.0, 0.0, 0.0));

        let position = rig.tick(Vec3::ZERO, 0.1, &TargetSample::at(Vec3::ZERO), &settings);

        assert_eq!(position.x, 6.0);
    }

    #[test]
    fn test_easing_curves_hit_endpoints() {
        for easing in [
            TransitionEasing::Linear,
            TransitionEasing::QuadIn,
            TransitionEasing::QuadOut,
            TransitionEasing::QuadInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
        }
        assert_eq!(TransitionEasing::QuadInOut.apply(0.5), 0.5);
        assert_eq!(TransitionEasing::QuadIn.apply(0.5), 0.25);
    }

    #[test]
    fn test_snap_prefers_zone_over_bounds() {
        let settings = FollowSettings {
            offset: Vec3::new(0.0, 0.0, 10.0),
            lens: CameraLens::Orthographic { half_height: 1.0, aspect: 1.0 },
            ..default()
        };
        let target = TargetSample::at(Vec3::new(50.0, 0.0, 0.0));
        let bounds = RigBounds::new(Vec3::splat(-10.0), Vec3::splat(10.0));
        let inside = zone(1, Vec3::new(30.0, 3.0, 0.0), Vec3::new(0.0, 1.0, 1.0), 1.0);

        let zoned = CameraRig::snap_position(&target, &settings, Some(&inside), Some(&bounds));
        assert_eq!(zoned, Vec3::new(30.0, 0.0, 10.0));

        let bounded = CameraRig::snap_position(&target, &settings, None, Some(&bounds));
        assert_eq!(bounded, Vec3::new(9.0, 0.0, 10.0));
    }
}
