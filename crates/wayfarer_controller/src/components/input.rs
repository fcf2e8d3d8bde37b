//! Input state — poll-once канал между host input и системами контроллера

use bevy::prelude::*;

/// Снимок ввода игрока. Мутируется input-системами каждый frame,
/// консьюмеры читают актуальное состояние (latest value wins).
///
/// # Координаты
/// forward → -Z, backward → +Z, left → -X, right → +X
/// (локальное пространство yaw-узла)
///
/// Mouse deltas аккумулируются между потреблениями и забираются через
/// [`take_mouse_delta`](Self::take_mouse_delta) (обнуление при чтении),
/// чтобы look не терял движение при неровном порядке событий.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Накопленный сырой mouse delta (pixels). Пишется только под pointer lock.
    pub mouse_delta: Vec2,
}

impl InputState {
    /// true если активен хоть один direction flag
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Забирает накопленный mouse delta и сбрасывает его в ноль
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }
}

/// Фактическое состояние pointer lock.
///
/// Захват асинхронный и может быть отклонён платформой, поэтому поле
/// выводится из окна каждый frame, а не выставляется по факту запроса.
/// Locked и Confined оба считаются "захвачено" (Wayland/X11 fallback).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerLock {
    pub locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_mouse_delta_resets_accumulator() {
        let mut state = InputState::default();
        state.mouse_delta += Vec2::new(3.0, -2.0);
        state.mouse_delta += Vec2::new(1.0, 1.0);

        assert_eq!(state.take_mouse_delta(), Vec2::new(4.0, -1.0));
        assert_eq!(state.take_mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn any_direction_tracks_flags() {
        let mut state = InputState::default();
        assert!(!state.any_direction());

        state.left = true;
        assert!(state.any_direction());
    }
}
