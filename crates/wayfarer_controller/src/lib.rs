//! WAYFARER Avatar Controller — first-person контроллер аватара на Bevy ECS
//!
//! # Архитектура
//! - **input** — снятие host input в poll-once ресурс (keyboard flags,
//!   mouse deltas под pointer-lock gate)
//! - **rig** — yaw/pitch двухузловой camera rig + spawn/teardown аватара
//! - **locomotion** — движение в FixedUpdate (kinematic интеграция или
//!   velocity-команды на rapier body)
//! - **animation** — skeleton bind, AnimationGraph, Idle/Run crossfade
//! - **pose** — bone overrides и head tracking ПОСЛЕ animation evaluation
//!
//! # Жизненный цикл
//! spawn_avatar → (async) skeleton resolve + clip bind → RigReady →
//! per-frame input/look/blend + fixed-tick movement.
//! До RigReady команды движения — no-op, не ошибки.
//!
//! Порядок кадра: Update (Input → Look → Blend) → FixedUpdate (movement,
//! до physics step) → PostUpdate (overrides → head tracking → propagate).

pub mod animation;
pub mod components;
pub mod input;
pub mod locomotion;
pub mod logger;
pub mod pose;
pub mod rig;

pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use rig::{attach_camera, spawn_avatar, AvatarConfig, AvatarNodes};

use bevy::prelude::*;

/// Порядок controller-систем внутри Update
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    /// Снятие host input (keyboard flags, mouse deltas, pointer lock)
    Input,
    /// Применение mouse look к yaw/pitch узлам
    Look,
    /// Skeleton binding + animation state machine
    Blend,
}

/// Полный стек контроллера: input, rig, locomotion, animation, pose.
///
/// Physics plugin НЕ входит — хост сам решает добавлять ли rapier
/// (headless тесты и kinematic-only сцены живут без него).
pub struct AvatarControllerPlugin;

impl Plugin for AvatarControllerPlugin {
    fn build(&self, app: &mut App) {
        logger::init_logger();

        app.insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                Update,
                (
                    ControllerSet::Input,
                    ControllerSet::Look,
                    ControllerSet::Blend,
                )
                    .chain(),
            )
            .add_plugins((
                input::InputTrackerPlugin,
                rig::CameraRigPlugin,
                locomotion::LocomotionPlugin,
                animation::AnimationBlendPlugin,
                pose::PoseOverridePlugin,
            ));

        logger::log_info("✅ AvatarControllerPlugin initialized (fixed tick 60Hz)");
    }
}

/// Минимальный headless App для интеграционных тестов:
/// ресурсы контроллера без окна, рендера и wall-clock.
/// Системы тест добавляет сам и гоняет fixed-тики детерминированно.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .init_resource::<InputState>()
        .init_resource::<PointerLock>()
        .insert_resource(Time::<Fixed>::from_hz(60.0));
    app
}
