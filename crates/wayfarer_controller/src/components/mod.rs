//! ECS компоненты и ресурсы контроллера
//!
//! Организация по доменам:
//! - player: маркер управляемой entity
//! - input: poll-once состояние ввода (InputState, PointerLock)
//! - rig: узлы camera rig (YawRig, PitchPivot, RigNodes, RigReady)
//! - locomotion: режимы движения (LocomotionMode, LocomotionController)
//! - animation: clip handles и blend state (AvatarClips, AvatarAnimations)
//! - pose: bone overrides и head tracking (BoneOverrideSet, HeadTracker)

pub mod animation;
pub mod input;
pub mod locomotion;
pub mod player;
pub mod pose;
pub mod rig;

pub use animation::*;
pub use input::*;
pub use locomotion::*;
pub use player::*;
pub use pose::*;
pub use rig::*;
