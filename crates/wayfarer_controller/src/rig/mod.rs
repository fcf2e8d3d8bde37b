//! Camera rig: yaw/pitch двухузловая иерархия, mouse look, spawn/teardown
//!
//! # Архитектура
//! - Yaw (heading) живёт на корне аватара — поворачивается всё тело
//! - Pitch (взгляд) живёт на child pivot, clamped [-90°, +60°]
//! - Камера хоста аттачится ПОД pitch pivot: её локальный offset либо
//!   фиксированный, либо каждый frame обнуляется head tracker'ом
//!   (позицию тогда несёт сам pivot) — режимы взаимоисключающие

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, LockedAxes, RigidBody, Velocity};

use crate::components::*;
use crate::logger;
use crate::ControllerSet;

/// Радианы на pixel движения мыши
pub const MOUSE_SENSITIVITY: f32 = 0.002;
/// Нижний предел pitch: взгляд вертикально вниз
pub const PITCH_MIN: f32 = -std::f32::consts::FRAC_PI_2;
/// Верхний предел pitch: вверх ограничен сильнее, чтобы камера
/// не заглядывала за спину модели
pub const PITCH_MAX: f32 = std::f32::consts::FRAC_PI_3;

pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Player>()
            .register_type::<YawRig>()
            .register_type::<PitchPivot>()
            .add_systems(Update, apply_mouse_look.in_set(ControllerSet::Look))
            .add_systems(Update, teardown_avatar);
    }
}

/// Параметры spawn аватара
#[derive(Debug, Clone)]
pub struct AvatarConfig {
    pub mode: LocomotionMode,
    /// Горизонтальная скорость, m/s
    pub speed: f32,
    /// Локальный offset камеры под pivot. Режимы взаимоисключающие:
    /// без head tracking это постоянная позиция глаза; с настроенным
    /// tracking'ом — только placeholder до bind скелета, дальше позицию
    /// несёт pivot, а offset обнуляется каждый frame.
    pub camera_offset: Vec3,
    pub capsule_half_height: f32,
    pub capsule_radius: f32,
    pub head_tracking: HeadTracker,
    pub bone_overrides: BoneOverrideSet,
    /// true — ждать асинхронный skeleton bind перед RigReady;
    /// false — риг готов сразу (аватар без модели/анимаций)
    pub animated: bool,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            mode: LocomotionMode::Physics,
            speed: 5.0,
            // pre-bind placeholder: head tracking в дефолте активен,
            // после bind этот offset обнуляется tracker'ом
            camera_offset: Vec3::new(0.0, 1.6, 0.2),
            capsule_half_height: 0.5,
            capsule_radius: 0.4,
            head_tracking: HeadTracker::default(),
            bone_overrides: BoneOverrideSet::prop_arm_right(),
            animated: true,
        }
    }
}

/// Узлы созданного рига
#[derive(Debug, Clone, Copy)]
pub struct AvatarNodes {
    pub root: Entity,
    pub pitch_pivot: Entity,
}

/// Создаёт иерархию аватара: root (yaw) → pitch pivot.
/// Модель и камеру хост подвешивает сам (см. [`attach_camera`]).
pub fn spawn_avatar(commands: &mut Commands, config: &AvatarConfig, position: Vec3) -> AvatarNodes {
    let pitch_pivot = commands
        .spawn((PitchPivot::default(), Transform::default(), Visibility::default()))
        .id();

    let mut root = commands.spawn((
        Player,
        YawRig::default(),
        LocomotionController {
            mode: config.mode,
            speed: config.speed,
        },
        MotionVector::default(),
        RigNodes { pitch_pivot },
        config.bone_overrides.clone(),
        config.head_tracking.clone(),
        Transform::from_translation(position),
        Visibility::default(),
    ));
    root.add_child(pitch_pivot);

    if config.mode == LocomotionMode::Physics {
        root.insert((
            RigidBody::Dynamic,
            Collider::capsule_y(config.capsule_half_height, config.capsule_radius),
            Velocity::zero(),
            // Physics не может опрокинуть капсулу: yaw принадлежит ригу
            LockedAxes::ROTATION_LOCKED,
        ));
    }

    if !config.animated {
        root.insert(RigReady);
    }

    let root = root.id();
    logger::log_info("📷 Avatar rig spawned");
    AvatarNodes { root, pitch_pivot }
}

/// Прикрепляет камеру хоста под pitch pivot.
/// Ownership: у камеры один родитель, re-parent забирает её у сцены.
pub fn attach_camera(commands: &mut Commands, nodes: &AvatarNodes, camera: Entity, offset: Vec3) {
    commands
        .entity(camera)
        .insert((RigCamera, Transform::from_translation(offset)));
    commands.entity(nodes.pitch_pivot).add_child(camera);
}

/// Частичное применение look delta: yaw свободный, pitch clamped.
/// Знаки: движение мыши вправо/вниз уменьшает yaw/pitch.
pub fn apply_look_delta(yaw: f32, pitch: f32, delta: Vec2) -> (f32, f32) {
    let yaw = yaw - delta.x * MOUSE_SENSITIVITY;
    let pitch = (pitch - delta.y * MOUSE_SENSITIVITY).clamp(PITCH_MIN, PITCH_MAX);
    (yaw, pitch)
}

/// Mouse look: накопленный delta → yaw на корне, pitch на pivot.
/// Delta забирается с обнулением — каждый pixel учитывается ровно раз.
pub fn apply_mouse_look(
    mut input: ResMut<InputState>,
    mut roots: Query<(&mut YawRig, &mut Transform, &RigNodes), Without<PitchPivot>>,
    mut pivots: Query<(&mut PitchPivot, &mut Transform), Without<YawRig>>,
) {
    let delta = input.take_mouse_delta();
    if delta == Vec2::ZERO {
        return;
    }

    for (mut rig, mut root_transform, nodes) in roots.iter_mut() {
        let Ok((mut pivot, mut pivot_transform)) = pivots.get_mut(nodes.pitch_pivot) else {
            continue;
        };

        let (yaw, pitch) = apply_look_delta(rig.yaw, pivot.pitch, delta);
        rig.yaw = yaw;
        pivot.pitch = pitch;

        root_transform.rotation = Quat::from_rotation_y(yaw);
        pivot_transform.rotation = Quat::from_rotation_x(pitch);
    }
}

/// Teardown по маркеру DespawnAvatar: камера отцепляется от pivot
/// (возвращается сцене), риг despawn'ится рекурсивно.
pub fn teardown_avatar(
    mut commands: Commands,
    requests: Query<(Entity, &RigNodes), With<DespawnAvatar>>,
    children: Query<&Children>,
    cameras: Query<(), With<RigCamera>>,
) {
    for (root, nodes) in requests.iter() {
        if let Ok(kids) = children.get(nodes.pitch_pivot) {
            let mut attached: Vec<Entity> = Vec::new();
            attached.extend(kids.iter());
            for child in attached {
                if cameras.contains(child) {
                    commands.entity(child).remove::<ChildOf>();
                    commands.entity(child).remove::<RigCamera>();
                }
            }
        }
        commands.entity(root).despawn();
        logger::log_info("📷 Avatar rig despawned, камера возвращена сцене");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_clamps_and_stays_clamped() {
        let mut yaw = 0.0;
        let mut pitch = 0.0;

        // долго смотрим вниз — pitch упирается в предел без overshoot
        for _ in 0..200 {
            (yaw, pitch) = apply_look_delta(yaw, pitch, Vec2::new(0.0, 50.0));
        }
        assert_eq!(pitch, PITCH_MIN);

        (yaw, pitch) = apply_look_delta(yaw, pitch, Vec2::new(0.0, 50.0));
        assert_eq!(pitch, PITCH_MIN);
        let _ = yaw;
    }

    #[test]
    fn pitch_up_limit_is_lower_than_down() {
        let mut pitch = 0.0;
        for _ in 0..200 {
            (_, pitch) = apply_look_delta(0.0, pitch, Vec2::new(0.0, -50.0));
        }
        assert_eq!(pitch, PITCH_MAX);
        assert!(PITCH_MAX < -PITCH_MIN);
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut yaw = 0.0;
        let mut pitch = 0.0;
        for _ in 0..200 {
            (yaw, pitch) = apply_look_delta(yaw, pitch, Vec2::new(50.0, 0.0));
        }
        // 200 * 50px * 0.002 = 20 радиан — далеко за пределами одного оборота
        assert!((yaw + 20.0).abs() < 1e-3);
        assert_eq!(pitch, 0.0);
    }

    #[test]
    fn look_delta_scales_by_sensitivity() {
        let (yaw, pitch) = apply_look_delta(0.0, 0.0, Vec2::new(10.0, -10.0));
        assert!((yaw + 10.0 * MOUSE_SENSITIVITY).abs() < 1e-7);
        assert!((pitch - 10.0 * MOUSE_SENSITIVITY).abs() < 1e-7);
    }
}
