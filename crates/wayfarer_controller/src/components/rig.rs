//! Узлы camera rig: yaw/pitch иерархия и маркеры жизненного цикла

use bevy::prelude::*;

/// Yaw-узел рига (корень аватара): heading вокруг вертикальной оси.
///
/// Yaw не ограничен и является единственной системой отсчёта
/// для locomotion — тело поворачивается целиком, вместе с моделью.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct YawRig {
    /// Радианы вокруг Y
    pub yaw: f32,
}

/// Pitch-узел (child yaw-узла): взгляд вверх/вниз, clamped.
/// Pitch НЕ влияет на направление движения.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PitchPivot {
    /// Радианы вокруг X, в пределах [PITCH_MIN, PITCH_MAX]
    pub pitch: f32,
}

/// Маркер: камера хоста, прикреплённая под pitch pivot
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct RigCamera;

/// Ссылки на узлы рига (живёт на корне аватара)
#[derive(Component, Debug, Clone, Copy)]
pub struct RigNodes {
    pub pitch_pivot: Entity,
}

/// Маркер: риг (и скелет, если аватар анимированный) инициализирован.
/// До появления маркера команды движения и blend — no-op, не ошибки.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct RigReady;

/// Маркер-запрос на teardown аватара: камера отцепляется и возвращается
/// сцене, риг despawn'ится рекурсивно.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DespawnAvatar;
