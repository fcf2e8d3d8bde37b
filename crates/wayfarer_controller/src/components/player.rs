use bevy::prelude::*;

/// Маркер: entity управляется игроком через host input.
///
/// В обычной сцене контроллер один, но системы фильтруют по маркеру
/// и компонентам рига, а не по "единственности" — несколько аватаров
/// (например, split-screen) не ломают ни одну систему.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;
