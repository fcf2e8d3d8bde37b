//! Pose-коррекция: skeleton resolve, bone overrides, head tracking
//!
//! # Schedule
//! - resolve_skeleton вызывается из Blend-цепочки в Update
//!   (регистрируется AnimationBlendPlugin — bind зависит от результата)
//! - apply_bone_overrides и track_head работают в PostUpdate:
//!   после animation evaluation, до transform propagation.
//!   Override видит финальную позу тика и безусловно побеждает её.

pub mod head_tracker;

use bevy::app::Animation;
use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::components::*;
use crate::logger;

pub struct PoseOverridePlugin;

impl Plugin for PoseOverridePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            (apply_bone_overrides, head_tracker::track_head)
                .chain()
                .after(Animation)
                .before(TransformSystem::TransformPropagate),
        );
    }
}

/// Обходит потомков root в ширину; root в выдачу не попадает
pub(crate) fn find_descendant(
    root: Entity,
    children: &Query<&Children>,
    mut pred: impl FnMut(Entity) -> bool,
) -> Option<Entity> {
    let mut queue: Vec<Entity> = Vec::new();
    if let Ok(kids) = children.get(root) {
        queue.extend(kids.iter());
    }
    let mut cursor = 0;
    while cursor < queue.len() {
        let entity = queue[cursor];
        cursor += 1;
        if pred(entity) {
            return Some(entity);
        }
        if let Ok(kids) = children.get(entity) {
            queue.extend(kids.iter());
        }
    }
    None
}

/// Поиск узла скелета по имени (Name компонент из glTF)
pub(crate) fn find_named(
    root: Entity,
    name: &str,
    children: &Query<&Children>,
    names: &Query<&Name>,
) -> Option<Entity> {
    find_descendant(root, children, |entity| {
        names.get(entity).map(|n| n.as_str()) == Ok(name)
    })
}

/// Одноразовый resolve скелета, когда заспавнилась scene instance.
///
/// # Действия
/// - Найти AnimationPlayer среди потомков (скелет готов)
/// - Resolve bone-override группу по именам: all-or-nothing —
///   частично применённая поза хуже дефолтной
/// - Resolve head bone (не нашлась — fallback offset, не ошибка)
/// - One-time hide указанного mesh-узла
/// - Вставить BoundSkeleton; аватару без clips сразу дать RigReady
pub fn resolve_skeleton(
    mut commands: Commands,
    roots: Query<
        (Entity, &BoneOverrideSet, &HeadTracker, Has<AvatarClips>),
        (With<YawRig>, Without<BoundSkeleton>, Without<RigReady>),
    >,
    children: Query<&Children>,
    names: Query<&Name>,
    players: Query<(), With<AnimationPlayer>>,
    mut visibilities: Query<&mut Visibility>,
) {
    for (root, override_set, head_cfg, has_clips) in roots.iter() {
        // Scene spawn асинхронный: до появления player'а скелета ещё нет
        let Some(player) = find_descendant(root, &children, |e| players.contains(e)) else {
            continue;
        };

        // All-or-nothing resolve override-группы
        let mut resolved = Vec::with_capacity(override_set.overrides.len());
        let mut missing = None;
        for o in &override_set.overrides {
            match find_named(root, &o.bone, &children, &names) {
                Some(bone) => resolved.push((bone, o.rotation())),
                None => {
                    missing = Some(o.bone.clone());
                    break;
                }
            }
        }
        if let Some(bone) = missing {
            logger::log_warning(&format!(
                "⚠️ Кость '{}' не найдена — override-группа отключена целиком",
                bone
            ));
        } else if !resolved.is_empty() {
            commands.entity(root).insert(ResolvedBoneOverrides(resolved));
        }

        let head_bone = head_cfg
            .bone
            .as_deref()
            .and_then(|name| find_named(root, name, &children, &names));
        if head_cfg.bone.is_some() && head_bone.is_none() {
            logger::log_warning("⚠️ Head bone не найдена — камера на fallback offset");
        }

        if let Some(mesh_name) = override_set.hide_mesh.as_deref() {
            if let Some(mesh) = find_named(root, mesh_name, &children, &names) {
                if let Ok(mut visibility) = visibilities.get_mut(mesh) {
                    *visibility = Visibility::Hidden;
                }
            }
        }

        commands.entity(root).insert(BoundSkeleton { player, head_bone });
        // Без clips ждать нечего: риг готов сразу после resolve
        if !has_clips {
            commands.entity(root).insert(RigReady);
        }
        logger::log_info("✅ Avatar skeleton resolved");
    }
}

/// Каждый frame ПОСЛЕ анимации: безусловная перезапись локального
/// rotation на resolved костях. Контракт: override всегда побеждает mixer.
pub fn apply_bone_overrides(
    roots: Query<&ResolvedBoneOverrides>,
    mut transforms: Query<&mut Transform>,
) {
    for overrides in roots.iter() {
        for (bone, rotation) in &overrides.0 {
            if let Ok(mut transform) = transforms.get_mut(*bone) {
                transform.rotation = *rotation;
            }
        }
    }
}
