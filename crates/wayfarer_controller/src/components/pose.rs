//! Bone overrides и head tracking — конфигурация pose-коррекции

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Один bone override: имя кости + фиксированный локальный поворот.
/// Euler XYZ в радианах, как в риггерских таблицах.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneOverride {
    pub bone: String,
    pub euler_xyz: [f32; 3],
}

impl BoneOverride {
    pub fn new(bone: impl Into<String>, x: f32, y: f32, z: f32) -> Self {
        Self {
            bone: bone.into(),
            euler_xyz: [x, y, z],
        }
    }

    pub fn rotation(&self) -> Quat {
        let [x, y, z] = self.euler_xyz;
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }
}

/// Группа bone overrides + one-time hide mesh-узла.
///
/// Resolve по именам выполняется один раз при bind скелета.
/// Policy: all-or-nothing — если хоть одна кость не нашлась, вся группа
/// отключается (частично применённая поза хуже дефолтной).
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoneOverrideSet {
    pub overrides: Vec<BoneOverride>,
    /// Узел меша, который прячется при bind (например, своя голова в FPS)
    pub hide_mesh: Option<String>,
}

impl BoneOverrideSet {
    /// Поза правой руки "держит предмет перед собой"
    pub fn prop_arm_right() -> Self {
        Self {
            overrides: vec![
                BoneOverride::new("UpperArmR", -std::f32::consts::FRAC_PI_3, 0.0, 0.1),
                BoneOverride::new("LowerArmR", -std::f32::consts::FRAC_PI_6, 0.0, 0.05),
            ],
            hide_mesh: None,
        }
    }
}

/// Resolved override-группа: (bone entity, rotation).
/// Применяется каждый frame после animation evaluation.
#[derive(Component, Debug, Clone)]
pub struct ResolvedBoneOverrides(pub Vec<(Entity, Quat)>);

/// Конфигурация head tracking: глаз следует за анимированной головой
/// (дыхание, покачивание при беге) вместо статичного offset'а.
#[derive(Component, Debug, Clone)]
pub struct HeadTracker {
    /// Имя head bone; None — tracking выключен, камера на fallback offset
    pub bone: Option<String>,
    /// Позиция глаза относительно корня рига, когда кость не resolved
    pub fallback_offset: Vec3,
}

impl Default for HeadTracker {
    fn default() -> Self {
        Self {
            bone: Some("Head".to_string()),
            fallback_offset: Vec3::new(0.0, 1.6, 0.0),
        }
    }
}
