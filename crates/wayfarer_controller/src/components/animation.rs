//! Clip handles и blend state аватара

use bevy::animation::graph::AnimationNodeIndex;
use bevy::prelude::*;

/// Clip handles, поставляются хостом после загрузки ассетов.
/// Bind ждёт пока все заявленные handles реально загрузятся.
#[derive(Component, Debug, Clone, Default)]
pub struct AvatarClips {
    pub idle: Option<Handle<AnimationClip>>,
    pub run: Option<Handle<AnimationClip>>,
}

/// Состояние locomotion-анимации. Только два состояния,
/// промежуточных нет — crossfade дотягивает сам.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum LocomotionAnimState {
    #[default]
    Idle,
    Run,
}

/// Blend state machine (живёт на entity с AnimationPlayer).
///
/// Node indices заполняются при bind; если хоть один clip отсутствует,
/// blending целиком отключён — [`transition_target`](Self::transition_target)
/// всегда None, остальной контроллер работает как обычно.
#[derive(Component, Debug, Clone)]
pub struct AvatarAnimations {
    pub idle: Option<AnimationNodeIndex>,
    pub run: Option<AnimationNodeIndex>,
    pub state: LocomotionAnimState,
}

impl AvatarAnimations {
    /// Какой transition запустить для текущего флага движения.
    /// None — либо clips не хватает, либо состояние уже целевое
    /// (transition стреляет один раз на edge, не каждый frame).
    pub fn transition_target(
        &self,
        moving: bool,
    ) -> Option<(LocomotionAnimState, AnimationNodeIndex)> {
        let idle = self.idle?;
        let run = self.run?;
        let (target, node) = if moving {
            (LocomotionAnimState::Run, run)
        } else {
            (LocomotionAnimState::Idle, idle)
        };
        if target == self.state {
            None
        } else {
            Some((target, node))
        }
    }
}

/// Связка корня аватара со скелетом (вставляется при resolve)
#[derive(Component, Debug, Clone, Copy)]
pub struct BoundSkeleton {
    /// Entity с AnimationPlayer внутри заспавненной модели
    pub player: Entity,
    /// Head bone, если head tracking настроен и кость нашлась
    pub head_bone: Option<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anims(state: LocomotionAnimState) -> AvatarAnimations {
        AvatarAnimations {
            idle: Some(AnimationNodeIndex::new(1)),
            run: Some(AnimationNodeIndex::new(2)),
            state,
        }
    }

    #[test]
    fn transition_fires_once_per_edge() {
        let mut a = anims(LocomotionAnimState::Idle);

        let (state, node) = a.transition_target(true).unwrap();
        assert_eq!(state, LocomotionAnimState::Run);
        assert_eq!(node, AnimationNodeIndex::new(2));

        // состояние обновлено — повторный запрос с тем же флагом молчит
        a.state = state;
        assert!(a.transition_target(true).is_none());

        let (state, node) = a.transition_target(false).unwrap();
        assert_eq!(state, LocomotionAnimState::Idle);
        assert_eq!(node, AnimationNodeIndex::new(1));
    }

    #[test]
    fn missing_clip_disables_blending() {
        let mut a = anims(LocomotionAnimState::Idle);
        a.run = None;

        assert!(a.transition_target(true).is_none());
        assert!(a.transition_target(false).is_none());
    }
}
