//! Head tracking: глаз следует за анимированной головой (дыхание,
//! покачивание при беге) вместо статичного rig offset'а
//!
//! Каждый frame между анимацией и transform propagation:
//! 1. Пересчитать мировую позицию head bone вручную — GlobalTransform
//!    на этом этапе кадра ещё прошлотиковый
//! 2. Перевести её в локальное пространство корня рига
//! 3. Записать в translation pitch pivot'а; собственный offset камеры
//!    обнулить (позицию несёт pivot)
//! Кость не resolved → pivot встаёт на fallback offset.

use bevy::math::Affine3A;
use bevy::prelude::*;

use crate::components::*;

/// Композиция локальных Transform вверх по цепочке предков.
/// Forced recompute мировой матрицы до propagation.
pub(crate) fn world_affine(
    entity: Entity,
    child_of: &Query<&ChildOf>,
    transforms: &Query<&Transform, (Without<PitchPivot>, Without<RigCamera>)>,
) -> Affine3A {
    let mut chain: Vec<Affine3A> = Vec::new();
    let mut current = Some(entity);
    while let Some(e) = current {
        if let Ok(transform) = transforms.get(e) {
            chain.push(transform.compute_affine());
        }
        current = child_of.get(e).ok().map(|c| c.parent());
    }
    chain.iter().rev().fold(Affine3A::IDENTITY, |acc, a| acc * *a)
}

pub fn track_head(
    roots: Query<(Entity, &BoundSkeleton, &HeadTracker, &RigNodes), With<RigReady>>,
    child_of: Query<&ChildOf>,
    transforms: Query<&Transform, (Without<PitchPivot>, Without<RigCamera>)>,
    mut pivots: Query<
        (&mut Transform, Option<&Children>),
        (With<PitchPivot>, Without<RigCamera>),
    >,
    mut cameras: Query<&mut Transform, (With<RigCamera>, Without<PitchPivot>)>,
) {
    for (root, skeleton, cfg, nodes) in roots.iter() {
        // Tracking выключен конфигом — камера остаётся на своём offset
        if cfg.bone.is_none() {
            continue;
        }

        let eye_local = match skeleton.head_bone {
            Some(head) => {
                let head_world = world_affine(head, &child_of, &transforms);
                let rig_world = world_affine(root, &child_of, &transforms);
                rig_world
                    .inverse()
                    .transform_point3(head_world.translation.into())
            }
            None => cfg.fallback_offset,
        };

        let Ok((mut pivot_transform, pivot_children)) = pivots.get_mut(nodes.pitch_pivot) else {
            continue;
        };
        pivot_transform.translation = eye_local;

        // Позицию теперь несёт pivot — локальный offset камеры обнуляется
        if let Some(kids) = pivot_children {
            let mut attached: Vec<Entity> = Vec::new();
            attached.extend(kids.iter());
            for child in attached {
                if let Ok(mut camera) = cameras.get_mut(child) {
                    camera.translation = Vec3::ZERO;
                }
            }
        }
    }
}
