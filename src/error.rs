use thiserror::Error;

use crate::hierarchy::BoneId;

/// Errors raised while editing a bone hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("bone {0} does not exist in the hierarchy")]
    UnknownBone(BoneId),

    #[error("cannot parent {child} under {parent}: {parent} is a descendant of {child}")]
    WouldCycle { child: BoneId, parent: BoneId },
}

/// Fatal errors for a retarget or dress run.
///
/// Unmatched bones are never reported through this type; they are collected
/// in the run's outcome instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetargetError {
    #[error("target skeleton root {0} does not exist in the hierarchy")]
    MissingTargetRoot(BoneId),

    #[error("avatar has no armature named \"{name}\"")]
    MissingArmature { name: String },

    #[error("skin binding \"{binding}\" references unknown bone {bone}")]
    UnknownBindingBone { binding: String, bone: BoneId },

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}
