//! Locomotion в headless App: детерминированные fixed-тики без wall-clock
//!
//! Полный цикл: spawn_avatar → guard готовности рига → движение
//! (kinematic интеграция и physics velocity-команды).

use std::time::Duration;

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use wayfarer_controller::locomotion::{kinematic_move, physics_drive};
use wayfarer_controller::{
    create_headless_app, spawn_avatar, AvatarConfig, InputState, LocomotionMode, MotionVector,
    YawRig,
};

const DT: f32 = 1.0 / 60.0;

fn create_app() -> App {
    let mut app = create_headless_app();
    app.add_systems(FixedUpdate, (kinematic_move, physics_drive).chain());
    app
}

/// Ручной прогон fixed-тиков: advance_by вместо wall-clock
fn tick(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_secs_f32(DT));
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn spawn_test_avatar(app: &mut App, config: &AvatarConfig) -> Entity {
    let root = {
        let mut commands = app.world_mut().commands();
        spawn_avatar(&mut commands, config, Vec3::ZERO).root
    };
    app.world_mut().flush();
    root
}

fn kinematic_config() -> AvatarConfig {
    AvatarConfig {
        mode: LocomotionMode::Kinematic,
        animated: false,
        ..Default::default()
    }
}

#[test]
fn forward_moves_along_minus_z() {
    let mut app = create_app();
    let root = spawn_test_avatar(&mut app, &kinematic_config());

    app.world_mut().resource_mut::<InputState>().forward = true;
    tick(&mut app, 60); // ровно секунда симуляции

    let transform = app.world().entity(root).get::<Transform>().unwrap();
    assert!((transform.translation.z + 5.0).abs() < 1e-3);
    assert!(transform.translation.x.abs() < 1e-6);
    assert!(transform.translation.y.abs() < 1e-6);

    let motion = app.world().entity(root).get::<MotionVector>().unwrap();
    assert!((motion.0 - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
}

#[test]
fn diagonal_speed_equals_axial_speed() {
    let mut app = create_app();
    let root = spawn_test_avatar(&mut app, &kinematic_config());

    {
        let mut input = app.world_mut().resource_mut::<InputState>();
        input.forward = true;
        input.right = true;
    }
    tick(&mut app, 60);

    let transform = app.world().entity(root).get::<Transform>().unwrap();
    assert!((transform.translation.length() - 5.0).abs() < 1e-3);
}

#[test]
fn movement_is_noop_before_rig_ready() {
    let mut app = create_app();
    // animated=true: RigReady появится только после bind скелета,
    // которого в этом App никогда не случится
    let root = spawn_test_avatar(
        &mut app,
        &AvatarConfig {
            mode: LocomotionMode::Kinematic,
            animated: true,
            ..Default::default()
        },
    );

    app.world_mut().resource_mut::<InputState>().forward = true;
    tick(&mut app, 30);

    let transform = app.world().entity(root).get::<Transform>().unwrap();
    assert_eq!(transform.translation, Vec3::ZERO);
}

#[test]
fn physics_drive_preserves_vertical_velocity() {
    let mut app = create_app();
    let root = spawn_test_avatar(
        &mut app,
        &AvatarConfig {
            mode: LocomotionMode::Physics,
            animated: false,
            ..Default::default()
        },
    );

    // падаем: вертикаль выставлена "гравитацией"
    app.world_mut()
        .entity_mut(root)
        .get_mut::<Velocity>()
        .unwrap()
        .linvel
        .y = -3.0;

    app.world_mut().resource_mut::<InputState>().forward = true;
    tick(&mut app, 1);

    let velocity = app.world().entity(root).get::<Velocity>().unwrap();
    assert!((velocity.linvel.x).abs() < 1e-5);
    assert!((velocity.linvel.y + 3.0).abs() < 1e-6); // вертикаль не тронута
    assert!((velocity.linvel.z + 5.0).abs() < 1e-5);
}

#[test]
fn physics_drive_stops_horizontals_without_input() {
    let mut app = create_app();
    let root = spawn_test_avatar(
        &mut app,
        &AvatarConfig {
            mode: LocomotionMode::Physics,
            animated: false,
            ..Default::default()
        },
    );

    app.world_mut().resource_mut::<InputState>().forward = true;
    tick(&mut app, 5);

    app.world_mut().resource_mut::<InputState>().forward = false;
    tick(&mut app, 1);

    let velocity = app.world().entity(root).get::<Velocity>().unwrap();
    assert_eq!(velocity.linvel.x, 0.0);
    assert_eq!(velocity.linvel.z, 0.0);

    let motion = app.world().entity(root).get::<MotionVector>().unwrap();
    assert_eq!(motion.0, Vec3::ZERO);
}

#[test]
fn yaw_rotates_movement_frame() {
    let mut app = create_app();
    let root = spawn_test_avatar(&mut app, &kinematic_config());

    // поворот на 90° влево: forward смотрит в мировой -X
    app.world_mut()
        .entity_mut(root)
        .get_mut::<YawRig>()
        .unwrap()
        .yaw = std::f32::consts::FRAC_PI_2;

    app.world_mut().resource_mut::<InputState>().forward = true;
    tick(&mut app, 60);

    let transform = app.world().entity(root).get::<Transform>().unwrap();
    assert!((transform.translation.x + 5.0).abs() < 1e-3);
    assert!(transform.translation.z.abs() < 1e-3);
}
