//! Animation blending: Idle/Run state machine поверх AnimationGraph
//!
//! # Архитектура
//! - bind_animations (Update, Blend set): ждёт resolved скелет и
//!   загруженные clips, фильтрует треки override-костей, строит graph,
//!   стартует Idle и вставляет RigReady на корень
//! - blend_locomotion (Update, Blend set): |MotionVector| против epsilon →
//!   crossfade; transition стреляет один раз на смену состояния
//!
//! # Guards
//! - Отсутствует любой из clips → blending целиком отключён,
//!   look/movement/pose продолжают работать
//! - До bind: blend-запросы no-op (нет AvatarAnimations)

pub mod clip_filter;

pub use clip_filter::strip_bone_tracks;

use std::collections::HashSet;
use std::time::Duration;

use bevy::animation::graph::{AnimationGraph, AnimationGraphHandle, AnimationNodeIndex};
use bevy::animation::transition::AnimationTransitions;
use bevy::animation::{AnimationTarget, AnimationTargetId};
use bevy::prelude::*;

use crate::components::*;
use crate::logger;
use crate::pose::resolve_skeleton;
use crate::ControllerSet;

/// Длительность crossfade между Idle и Run
pub const CROSSFADE: Duration = Duration::from_millis(200);

/// Порог "движемся" по квадрату длины velocity (отсечка float-шума)
pub const MOVE_EPSILON_SQ: f32 = 0.01;

pub struct AnimationBlendPlugin;

impl Plugin for AnimationBlendPlugin {
    fn build(&self, app: &mut App) {
        // resolve → bind → blend: bind требует BoundSkeleton того же кадра
        app.add_systems(
            Update,
            (resolve_skeleton, bind_animations, blend_locomotion)
                .chain()
                .in_set(ControllerSet::Blend),
        );
    }
}

/// true когда все заявленные clip handles реально загрузились
fn clips_loaded(avatar_clips: &AvatarClips, clips: &Assets<AnimationClip>) -> bool {
    let pending =
        |h: &Option<Handle<AnimationClip>>| h.as_ref().is_some_and(|h| clips.get(h).is_none());
    !(pending(&avatar_clips.idle) || pending(&avatar_clips.run))
}

fn add_filtered_clip(
    graph: &mut AnimationGraph,
    handle: &Option<Handle<AnimationClip>>,
    excluded: &HashSet<AnimationTargetId>,
    clips: &mut Assets<AnimationClip>,
) -> Option<AnimationNodeIndex> {
    let handle = handle.as_ref()?;
    let filtered = {
        let source = clips.get(handle)?;
        strip_bone_tracks(source, excluded)
    };
    let filtered = clips.add(filtered);
    let root = graph.root;
    Some(graph.add_clip(filtered, 1.0, root))
}

/// Одноразовый bind анимаций аватара.
///
/// # Действия
/// - Дождаться загрузки всех заявленных clips
/// - Собрать excluded target ids из resolved override-костей
///   и отфильтровать треки (см. [`strip_bone_tracks`])
/// - Построить AnimationGraph, вставить transitions + state machine
/// - Запустить Idle и пометить корень RigReady
pub fn bind_animations(
    mut commands: Commands,
    roots: Query<
        (
            Entity,
            &BoundSkeleton,
            &AvatarClips,
            Option<&ResolvedBoneOverrides>,
        ),
        Without<RigReady>,
    >,
    targets: Query<&AnimationTarget>,
    mut players: Query<&mut AnimationPlayer>,
    mut clips: ResMut<Assets<AnimationClip>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    for (root, skeleton, avatar_clips, overrides) in roots.iter() {
        if !clips_loaded(avatar_clips, &clips) {
            continue;
        }

        let Ok(mut player) = players.get_mut(skeleton.player) else {
            continue;
        };

        // Кости override-системы исключаются из данных анимации.
        // Target ids берём с заспавненного скелета: glTF хэширует полный
        // путь имён, from_name по одному имени сюда не попадёт.
        let excluded: HashSet<AnimationTargetId> = overrides
            .map(|resolved| {
                resolved
                    .0
                    .iter()
                    .filter_map(|(bone, _)| targets.get(*bone).ok().map(|t| t.id))
                    .collect()
            })
            .unwrap_or_default();

        let mut graph = AnimationGraph::new();
        let idle = add_filtered_clip(&mut graph, &avatar_clips.idle, &excluded, &mut clips);
        let run = add_filtered_clip(&mut graph, &avatar_clips.run, &excluded, &mut clips);

        let mut transitions = AnimationTransitions::new();
        match idle {
            Some(idle_node) => {
                // Idle стартует без fade — аватар появляется уже в позе
                transitions.play(&mut player, idle_node, Duration::ZERO).repeat();
            }
            None => logger::log_warning("⚠️ Idle clip отсутствует — blending отключён"),
        }
        if run.is_none() {
            logger::log_warning("⚠️ Run clip отсутствует — blending отключён");
        }

        commands.entity(skeleton.player).insert((
            AnimationGraphHandle(graphs.add(graph)),
            transitions,
            AvatarAnimations {
                idle,
                run,
                state: LocomotionAnimState::Idle,
            },
        ));
        commands.entity(root).insert(RigReady);
        logger::log_info("✅ Avatar animations bound, rig ready");
    }
}

/// Состояние движения → crossfade.
/// Повторный вызов с тем же состоянием — no-op (guard в state machine),
/// поэтому transitions не рестартуют каждый frame.
pub fn blend_locomotion(
    roots: Query<(&MotionVector, &BoundSkeleton), With<RigReady>>,
    mut players: Query<(
        &mut AnimationPlayer,
        &mut AnimationTransitions,
        &mut AvatarAnimations,
    )>,
) {
    for (motion, skeleton) in roots.iter() {
        let Ok((mut player, mut transitions, mut anims)) = players.get_mut(skeleton.player)
        else {
            continue;
        };

        let moving = motion.0.length_squared() > MOVE_EPSILON_SQ;
        if let Some((state, node)) = anims.transition_target(moving) {
            transitions.play(&mut player, node, CROSSFADE).repeat();
            anims.state = state;
        }
    }
}
