//! Load-time фильтрация клипов: удаление треков excluded-костей
//!
//! Кости, которыми владеет override-система, не должны встречаться в
//! данных анимации — иначе mixer и override каждый frame дерутся за позу.
//! Фильтруем один раз при bind, а не боремся в рантайме.

use std::collections::HashSet;

use bevy::animation::{AnimationClip, AnimationTargetId};

/// Производный clip: копия source без curves, чей target в excluded.
/// Оставшиеся треки переносятся как есть, длительность не меняется.
pub fn strip_bone_tracks(
    source: &AnimationClip,
    excluded: &HashSet<AnimationTargetId>,
) -> AnimationClip {
    let mut filtered = source.clone();
    filtered.curves_mut().retain(|id, _| !excluded.contains(id));
    filtered
}
