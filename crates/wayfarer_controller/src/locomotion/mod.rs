//! Locomotion: input flags → движение в мире
//!
//! # Архитектура
//! - Оба режима работают в FixedUpdate (60Hz) ДО rapier physics step:
//!   velocity-команды попадают в тот же тик симуляции
//! - Kinematic: прямая интеграция позиции корня рига
//! - Physics: горизонтальная velocity на body, вертикаль не трогаем
//!   (гравитация и коллизии остаются за rapier)
//! - Guard: With<RigReady> — движение до инициализации рига это no-op

use bevy::prelude::*;
use bevy_rapier3d::plugin::PhysicsSet;
use bevy_rapier3d::prelude::Velocity;

use crate::components::*;

pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<LocomotionController>()
            .register_type::<MotionVector>()
            .add_systems(
                FixedUpdate,
                (kinematic_move, physics_drive)
                    .chain()
                    .before(PhysicsSet::SyncBackend),
            );
    }
}

/// Локальный вектор движения из флагов:
/// forward → -Z, backward → +Z, left → -X, right → +X.
/// Нормализован — диагональ НЕ быстрее осевого движения.
/// Противоположные флаги взаимно гасятся.
pub fn movement_vector(input: &InputState) -> Vec3 {
    let mut dir = Vec3::ZERO;
    if input.forward {
        dir.z -= 1.0;
    }
    if input.backward {
        dir.z += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    dir.normalize_or_zero()
}

/// Мировая горизонтальная velocity: локальный вектор, повёрнутый на yaw.
/// Pitch в расчёте не участвует.
pub fn world_velocity(input: &InputState, yaw: f32, speed: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * movement_vector(input) * speed
}

/// Kinematic mode: position += velocity * dt на корне рига
pub fn kinematic_move(
    input: Res<InputState>,
    time: Res<Time<Fixed>>,
    mut query: Query<
        (
            &LocomotionController,
            &YawRig,
            &mut Transform,
            &mut MotionVector,
        ),
        With<RigReady>,
    >,
) {
    let dt = time.delta_secs();
    for (controller, rig, mut transform, mut motion) in query.iter_mut() {
        if controller.mode != LocomotionMode::Kinematic {
            continue;
        }
        let velocity = world_velocity(&input, rig.yaw, controller.speed);
        transform.translation += velocity * dt;
        motion.0 = velocity;
    }
}

/// Physics mode: горизонтальная velocity-команда на body каждый тик.
/// Без input горизонталь явно зануляется — остановка мгновенная,
/// не зависящая от damping'а.
pub fn physics_drive(
    input: Res<InputState>,
    mut query: Query<
        (
            &LocomotionController,
            &YawRig,
            &mut Velocity,
            &mut MotionVector,
        ),
        With<RigReady>,
    >,
) {
    for (controller, rig, mut velocity, mut motion) in query.iter_mut() {
        if controller.mode != LocomotionMode::Physics {
            continue;
        }
        if input.any_direction() {
            let v = world_velocity(&input, rig.yaw, controller.speed);
            velocity.linvel.x = v.x;
            velocity.linvel.z = v.z;
            motion.0 = v;
        } else {
            velocity.linvel.x = 0.0;
            velocity.linvel.z = 0.0;
            motion.0 = Vec3::ZERO;
        }
    }
}
