//! Конфигурация движения аватара

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Режим locomotion. Выбирается при spawn и не переключается в рантайме:
/// это варианты конфигурации, а не параллельные code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum LocomotionMode {
    /// Прямая интеграция позиции: position += direction * speed * dt.
    /// Без гравитации и коллизий, для сцен без physics.
    Kinematic,
    /// Velocity-команды на rapier body каждый fixed tick.
    /// Гравитация и коллизии остаются за physics engine.
    Physics,
}

/// Контроллер движения (на корне аватара)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LocomotionController {
    pub mode: LocomotionMode,
    /// Горизонтальная скорость, m/s
    pub speed: f32,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self {
            mode: LocomotionMode::Physics,
            speed: 5.0,
        }
    }
}

/// Горизонтальная velocity, применённая в последний fixed tick.
/// Вход для animation blender'а: |v| > epsilon означает "движемся".
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MotionVector(pub Vec3);
