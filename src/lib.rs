//! Avatar Dresser
//!
//! Moves the bones of a clothing article onto an avatar's armature so the
//! clothing deforms with the avatar. Bones are matched by exact name first,
//! then through a table of common humanoid naming conventions.

pub mod error;
pub mod hierarchy;
pub mod import;
pub mod retarget;
pub mod scene;
pub mod settings;

pub use error::{HierarchyError, RetargetError};
pub use hierarchy::{Bone, BoneId, Hierarchy};
pub use retarget::{DressReport, SkinBinding, TargetSkeleton, dress, retarget};
pub use scene::{Scene, SkinnedMesh};
pub use settings::DresserSettings;
