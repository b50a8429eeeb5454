//! Headless демо trailcam
//!
//! Subject идёт вправо через камерную зону, камера следует за ним.
//! Опционально: путь к TOML конфигу первым аргументом.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use trailcam_simulation::camera::{CameraZone, FollowCamera, ZoneVolume};
use trailcam_simulation::{create_headless_app_with_config, CameraSubject, SimulationConfig, SimulationPlugin};

#[derive(Component)]
struct Walker {
    speed: f32,
}

fn walk(time: Res<Time>, mut walkers: Query<(&Walker, &mut Transform)>) {
    for (walker, mut transform) in walkers.iter_mut() {
        transform.translation.x += walker.speed * time.delta_secs();
    }
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    println!("Starting trailcam headless simulation (seed: {})", config.seed);

    let mut app = create_headless_app_with_config(config);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(1.0 / 60.0)))
        .add_systems(Update, walk);

    let subject = app
        .world_mut()
        .spawn((CameraSubject, Walker { speed: 4.0 }, Transform::default()))
        .id();

    app.world_mut().spawn(FollowCamera::following(subject));

    app.world_mut().spawn((
        CameraZone {
            offset: Vec3::new(0.0, 2.0, 12.0),
            axis_lock: Vec3::new(0.0, 1.0, 1.0),
            transition_time: 1.5,
            volume: Some(ZoneVolume::Rect {
                half_extents: Vec2::new(5.0, 5.0),
            }),
            ..default()
        },
        Transform::from_xyz(20.0, 0.0, 0.0),
    ));

    // 10 секунд симуляции
    for tick in 0..600 {
        app.update();

        if tick % 60 == 0 {
            let mut cameras = app.world_mut().query::<(&FollowCamera, &Transform)>();
            for (camera, transform) in cameras.iter(app.world()) {
                println!(
                    "Tick {}: camera {:?} (zones: {}, transitioning: {})",
                    tick,
                    transform.translation,
                    camera.rig.zones().len(),
                    camera.rig.is_transitioning()
                );
            }
        }
    }

    println!("Simulation complete!");
}
