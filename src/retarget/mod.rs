mod binding;
mod dress;
mod matcher;
mod naming;
mod table;
mod types;
mod walk;

use crate::{error::RetargetError, hierarchy::Hierarchy, settings::DresserSettings};

// Re-export public types for callers of this module.
pub use binding::{BoneDecision, Resolution, SkinBinding, SkinBindingRewriter};
pub use dress::{dress, write_manual_fix_checklist};
pub use matcher::{BoneMatcher, find_target_bone};
pub use naming::normalize;
pub use table::{ALIAS_GROUPS, CanonicalBoneTable, HumanBone};
pub use types::{DressReport, MeshReport};
pub use walk::{RetargetOutcome, SkeletonRetargeter, TargetSkeleton, VisitedSet};

// ─── Public API ───────────────────────────────────────────────────────────────

/// Retarget a single binding onto `target` with a fresh visited set.
pub fn retarget(
    hierarchy: &mut Hierarchy,
    binding: &SkinBinding,
    target: &TargetSkeleton<'_>,
    settings: &DresserSettings,
) -> Result<RetargetOutcome, RetargetError> {
    SkeletonRetargeter::new(target, settings).retarget(hierarchy, binding, &mut VisitedSet::new())
}
