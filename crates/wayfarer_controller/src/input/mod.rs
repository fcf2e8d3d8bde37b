//! Input tracking: keyboard flags, mouse deltas, pointer lock
//!
//! # Архитектура
//! - Host input (winit события) → InputState resource (poll-once канал)
//! - Keyboard flags живут независимо от pointer lock
//! - Mouse deltas аккумулируются ТОЛЬКО пока lock активен; без lock
//!   события дренируются и отбрасываются, иначе накопленный хвост
//!   "выстрелит" рывком камеры при следующем захвате
//!
//! # Pointer lock
//! - LMB click → запрос CursorGrabMode::Locked (асинхронный, платформа
//!   может отказать — тогда состояние просто остаётся unlocked)
//! - Escape → release
//! - sync_pointer_lock каждый frame выводит фактическое состояние из окна

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::components::{InputState, PointerLock};
use crate::logger;
use crate::ControllerSet;

pub struct InputTrackerPlugin;

impl Plugin for InputTrackerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<PointerLock>()
            .add_systems(
                Update,
                (
                    request_pointer_lock,
                    sync_pointer_lock,
                    track_keyboard,
                    track_mouse,
                )
                    .chain()
                    .in_set(ControllerSet::Input),
            );
    }
}

/// Запрос и release pointer lock по пользовательскому вводу.
/// Retry после отказа платформы не делаем — нужен новый click.
pub fn request_pointer_lock(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    lock: Res<PointerLock>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    if mouse.just_pressed(MouseButton::Left) && !lock.locked {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }

    if keys.just_pressed(KeyCode::Escape) && lock.locked {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Фактическое состояние lock из окна (захват мог не состояться)
pub fn sync_pointer_lock(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut lock: ResMut<PointerLock>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let locked_now = matches!(
        window.cursor_options.grab_mode,
        CursorGrabMode::Locked | CursorGrabMode::Confined
    );

    if locked_now != lock.locked {
        lock.locked = locked_now;
        if locked_now {
            logger::log_info("🔒 Pointer lock захвачен");
        } else {
            logger::log_info("🔓 Pointer lock отпущен");
        }
    }
}

/// WASD → direction flags. Снимаем pressed-состояние, не события:
/// удержание клавиши — это состояние кадра.
pub fn track_keyboard(keys: Res<ButtonInput<KeyCode>>, mut state: ResMut<InputState>) {
    state.forward = keys.pressed(KeyCode::KeyW);
    state.backward = keys.pressed(KeyCode::KeyS);
    state.left = keys.pressed(KeyCode::KeyA);
    state.right = keys.pressed(KeyCode::KeyD);
}

/// Mouse deltas под lock gate
pub fn track_mouse(
    mut motion: EventReader<MouseMotion>,
    lock: Res<PointerLock>,
    mut state: ResMut<InputState>,
) {
    if lock.locked {
        for ev in motion.read() {
            state.mouse_delta += ev.delta;
        }
    } else {
        motion.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_app() -> App {
        let mut app = App::new();
        app.init_resource::<InputState>()
            .init_resource::<PointerLock>()
            .add_event::<MouseMotion>()
            .add_systems(Update, track_mouse);
        app
    }

    fn accumulated(app: &App) -> Vec2 {
        app.world().resource::<InputState>().mouse_delta
    }

    #[test]
    fn unlocked_motion_is_discarded_not_buffered() {
        let mut app = create_app();

        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(5.0, 3.0),
        });
        app.update();
        assert_eq!(accumulated(&app), Vec2::ZERO);

        // захват после факта: дренированные события не выстреливают задним числом
        app.world_mut().resource_mut::<PointerLock>().locked = true;
        app.update();
        assert_eq!(accumulated(&app), Vec2::ZERO);
    }

    #[test]
    fn locked_motion_accumulates_across_frames() {
        let mut app = create_app();
        app.world_mut().resource_mut::<PointerLock>().locked = true;

        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(2.0, -1.0),
        });
        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(1.0, 1.0),
        });
        app.update();
        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(0.5, 0.0),
        });
        app.update();

        assert_eq!(accumulated(&app), Vec2::new(3.5, 0.0));
    }

    #[test]
    fn losing_lock_stops_accumulation() {
        let mut app = create_app();
        app.world_mut().resource_mut::<PointerLock>().locked = true;

        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(1.0, 0.0),
        });
        app.update();

        app.world_mut().resource_mut::<PointerLock>().locked = false;
        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(10.0, 10.0),
        });
        app.update();

        assert_eq!(accumulated(&app), Vec2::new(1.0, 0.0));
    }
}
