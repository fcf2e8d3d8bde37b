//! WAYFARER client: окно, сцена, физика и аватар от первого лица
//!
//! Сцена минимальная: плоскость с коллайдером, свет и один аватар.
//! Вся логика контроллера живёт в wayfarer_controller.

mod avatar;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use avatar::PlayerAvatarPlugin;
use wayfarer_controller::AvatarControllerPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "WAYFARER — First Person".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics step в FixedUpdate: velocity-команды контроллера
        // попадают в тот же тик симуляции
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(AvatarControllerPlugin)
        .add_plugins(PlayerAvatarPlugin)
        .add_systems(Startup, setup_scene)
        .run();
}

/// Плоскость 40x40m со статичным коллайдером + освещение
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(20.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.4, 0.45))),
        Transform::IDENTITY,
    ));
    // Коллайдер отдельной entity: верхняя грань совпадает с видимой плоскостью
    commands.spawn((
        RigidBody::Fixed,
        Collider::cuboid(20.0, 0.05, 20.0),
        Transform::from_xyz(0.0, -0.05, 0.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_4,
            -std::f32::consts::FRAC_PI_4,
            0.0,
        )),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
        affects_lightmapped_meshes: false,
    });
}
