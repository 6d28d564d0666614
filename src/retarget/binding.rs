use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hierarchy::BoneId;

/// Bone references of one piece of skinned geometry.
///
/// Skin weights index into `bones`, so slot order is meaningful and must
/// survive retargeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinBinding {
    pub name: String,
    pub bones: Vec<BoneId>,
    pub root_bone: Option<BoneId>,
}

impl SkinBinding {
    pub fn new(name: impl Into<String>, bones: Vec<BoneId>, root_bone: Option<BoneId>) -> Self {
        Self {
            name: name.into(),
            bones,
            root_bone,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// How a visited source bone was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The bone is replaced by `target` in the binding.
    Matched { target: BoneId },
    /// The bone keeps its identity and now hangs under `parent`.
    Inherited { parent: BoneId },
    /// Neither the bone nor its parent is known to the target skeleton.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneDecision {
    pub bone: BoneId,
    pub name: String,
    pub resolution: Resolution,
}

/// Write retarget decisions back into a binding.
pub struct SkinBindingRewriter;

impl SkinBindingRewriter {
    /// Replace every slot (and the root) whose bone was matched; all other
    /// slots keep their bone. Length and order are unchanged.
    pub fn apply(binding: &SkinBinding, decisions: &[BoneDecision]) -> SkinBinding {
        let replacements: HashMap<BoneId, BoneId> = decisions
            .iter()
            .filter_map(|decision| match decision.resolution {
                Resolution::Matched { target } => Some((decision.bone, target)),
                Resolution::Inherited { .. } | Resolution::Unresolved => None,
            })
            .collect();
        let replace = |bone: BoneId| replacements.get(&bone).copied().unwrap_or(bone);

        SkinBinding {
            name: binding.name.clone(),
            bones: binding.bones.iter().copied().map(replace).collect(),
            root_bone: binding.root_bone.map(replace),
        }
    }
}
