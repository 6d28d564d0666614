use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use super::{
    binding::{BoneDecision, Resolution, SkinBinding, SkinBindingRewriter},
    matcher::BoneMatcher,
    table::CanonicalBoneTable,
};
use crate::{
    error::RetargetError,
    hierarchy::{BoneId, Hierarchy},
    settings::DresserSettings,
};

// ─── Target skeleton ──────────────────────────────────────────────────────────

/// Read-only view of the rig bones are retargeted onto.
///
/// Names are indexed once at construction; on duplicate names the bone met
/// first in pre-order wins.
#[derive(Debug, Clone)]
pub struct TargetSkeleton<'a> {
    root: BoneId,
    bones: Vec<BoneId>,
    index: HashMap<String, BoneId>,
    matcher: BoneMatcher<'a>,
}

impl TargetSkeleton<'static> {
    pub fn new(hierarchy: &Hierarchy, root: BoneId) -> Result<Self, RetargetError> {
        Self::with_table(hierarchy, root, CanonicalBoneTable::standard())
    }
}

impl<'a> TargetSkeleton<'a> {
    pub fn with_table(
        hierarchy: &Hierarchy,
        root: BoneId,
        table: &'a CanonicalBoneTable,
    ) -> Result<Self, RetargetError> {
        if !hierarchy.contains(root) {
            return Err(RetargetError::MissingTargetRoot(root));
        }

        let bones = hierarchy.descendants(root);
        let mut index = HashMap::new();
        for bone in &bones {
            if let Some(name) = hierarchy.name(*bone) {
                index.entry(name.to_string()).or_insert(*bone);
            }
        }
        let matcher = BoneMatcher::new(table, bones.iter().filter_map(|bone| hierarchy.name(*bone)));

        Ok(Self {
            root,
            bones,
            index,
            matcher,
        })
    }

    pub fn root(&self) -> BoneId {
        self.root
    }

    /// Target bones in pre-order, root first.
    pub fn bones(&self) -> &[BoneId] {
        &self.bones
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<BoneId> {
        self.index.get(name).copied()
    }

    /// Exact-name lookup, then canonical alias matching when `semantic` is set.
    pub fn resolve(&self, name: &str, semantic: bool) -> Option<BoneId> {
        if let Some(bone) = self.get(name) {
            return Some(bone);
        }
        if !semantic {
            return None;
        }
        self.matcher
            .find_target_bone(name)
            .and_then(|target| self.get(target))
    }

    /// First target bone currently parented directly to the root.
    pub fn fallback_root(&self, hierarchy: &Hierarchy) -> Option<BoneId> {
        self.bones
            .iter()
            .copied()
            .find(|bone| hierarchy.parent(*bone) == Some(self.root))
    }
}

// ─── Visited names ────────────────────────────────────────────────────────────

/// Bone names already decided during one binding's walk.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    names: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `name` was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ─── Outcome ──────────────────────────────────────────────────────────────────

/// Result of retargeting one skin binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetargetOutcome {
    /// Rewritten binding: same length and slot order as the input.
    pub binding: SkinBinding,
    /// Names of bones left for manual handling.
    pub unresolved: BTreeSet<String>,
    /// One entry per processed bone, in the order decisions were made.
    pub decisions: Vec<BoneDecision>,
}

impl RetargetOutcome {
    fn unchanged(binding: &SkinBinding) -> Self {
        Self {
            binding: binding.clone(),
            unresolved: BTreeSet::new(),
            decisions: Vec::new(),
        }
    }

    pub fn matched_count(&self) -> usize {
        self.count(|resolution| matches!(resolution, Resolution::Matched { .. }))
    }

    pub fn inherited_count(&self) -> usize {
        self.count(|resolution| matches!(resolution, Resolution::Inherited { .. }))
    }

    fn count(&self, predicate: impl Fn(&Resolution) -> bool) -> usize {
        self.decisions
            .iter()
            .filter(|decision| predicate(&decision.resolution))
            .count()
    }
}

// ─── Retargeter ───────────────────────────────────────────────────────────────

/// Reparents a binding's bones onto a target skeleton.
#[derive(Debug, Clone, Copy)]
pub struct SkeletonRetargeter<'t> {
    target: &'t TargetSkeleton<'t>,
    semantic_matching: bool,
    keep_world: bool,
}

impl<'t> SkeletonRetargeter<'t> {
    pub fn new(target: &'t TargetSkeleton<'t>, settings: &DresserSettings) -> Self {
        Self {
            target,
            semantic_matching: settings.semantic_matching,
            keep_world: settings.preserve_world_transform,
        }
    }

    /// Walk every bone of `binding` in slot order and reparent it onto the
    /// target skeleton.
    ///
    /// `visited` is cleared first; it only lives for this binding.
    pub fn retarget(
        &self,
        hierarchy: &mut Hierarchy,
        binding: &SkinBinding,
        visited: &mut VisitedSet,
    ) -> Result<RetargetOutcome, RetargetError> {
        visited.clear();
        if binding.is_empty() {
            return Ok(RetargetOutcome::unchanged(binding));
        }

        check_binding(hierarchy, binding)?;

        let mut walk = Walk {
            target: self.target,
            semantic_matching: self.semantic_matching,
            keep_world: self.keep_world,
            hierarchy: &mut *hierarchy,
            in_binding: binding.bones.iter().copied().collect(),
            visited,
            decisions: Vec::new(),
            unresolved: BTreeSet::new(),
        };
        for bone in &binding.bones {
            walk.visit(*bone);
        }
        let Walk {
            decisions,
            unresolved,
            ..
        } = walk;

        let mut rewritten = SkinBindingRewriter::apply(binding, &decisions);
        if rewritten.root_bone.is_none() {
            rewritten.root_bone = self.target.fallback_root(hierarchy);
            if let Some(root) = rewritten.root_bone {
                log::debug!(
                    "{}: root bone defaults to {}",
                    binding.name,
                    hierarchy.name(root).unwrap_or_default()
                );
            }
        }

        Ok(RetargetOutcome {
            binding: rewritten,
            unresolved,
            decisions,
        })
    }
}

/// Fail when `binding` references a bone missing from `hierarchy`.
pub(super) fn check_binding(
    hierarchy: &Hierarchy,
    binding: &SkinBinding,
) -> Result<(), RetargetError> {
    match binding
        .bones
        .iter()
        .chain(binding.root_bone.iter())
        .copied()
        .find(|bone| !hierarchy.contains(*bone))
    {
        Some(bone) => Err(RetargetError::UnknownBindingBone {
            binding: binding.name.clone(),
            bone,
        }),
        None => Ok(()),
    }
}

struct Walk<'w, 't> {
    target: &'t TargetSkeleton<'t>,
    semantic_matching: bool,
    keep_world: bool,
    hierarchy: &'w mut Hierarchy,
    in_binding: HashSet<BoneId>,
    visited: &'w mut VisitedSet,
    decisions: Vec<BoneDecision>,
    unresolved: BTreeSet<String>,
}

impl Walk<'_, '_> {
    fn visit(&mut self, bone: BoneId) {
        let Some(name) = self.hierarchy.name(bone).map(ToOwned::to_owned) else {
            return;
        };
        if !self.visited.insert(&name) {
            return;
        }

        if let Some(target) = self.resolve(&name) {
            self.adopt(bone, name, target);
        } else if let Some(target) = self
            .hierarchy
            .parent(bone)
            .and_then(|parent| self.resolve_bone(parent))
        {
            self.inherit(bone, name, target);
        } else {
            log::warn!("Bone {name} not found in armature - handle manually");
            self.skip_subtree(bone, name);
        }
    }

    /// `bone` itself exists in the target: hand its children over, then swap
    /// it for `target` in the binding.
    fn adopt(&mut self, bone: BoneId, name: String, target: BoneId) {
        log::debug!("Bone {name} matched {}", self.bone_name(target));

        let children = self.hierarchy.children(bone).to_vec();
        for child in children {
            if self.hierarchy.parent(child) != Some(bone) || !self.in_binding.contains(&child) {
                continue;
            }

            self.visit(child);

            // Re-read: the recursive call may already have moved the child.
            if self.hierarchy.parent(child) == Some(bone) {
                if let Err(err) = self.hierarchy.set_parent(child, Some(target), self.keep_world) {
                    let child_name = self.bone_name(child);
                    log::warn!("Bone {child_name} could not follow {name}: {err}");
                    self.unresolved.insert(child_name);
                }
            }
        }

        self.decisions.push(BoneDecision {
            bone,
            name,
            resolution: Resolution::Matched { target },
        });
    }

    /// `bone` is unknown but its parent is: hang it under the parent's target.
    fn inherit(&mut self, bone: BoneId, name: String, parent: BoneId) {
        if let Err(err) = self.hierarchy.set_parent(bone, Some(parent), self.keep_world) {
            log::warn!("Bone {name} could not be parented: {err} - handle manually");
            self.skip_subtree(bone, name);
            return;
        }
        log::info!("Bone {name} parenting to {}", self.bone_name(parent));

        self.decisions.push(BoneDecision {
            bone,
            name,
            resolution: Resolution::Inherited { parent },
        });

        let children = self.hierarchy.children(bone).to_vec();
        for child in children {
            if self.hierarchy.parent(child) == Some(bone) {
                self.visit(child);
            }
        }
    }

    /// Leave `bone` and its unknown descendants untouched and report them.
    ///
    /// Descendants that resolve on their own are left for their own visit,
    /// together with everything below them.
    fn skip_subtree(&mut self, bone: BoneId, name: String) {
        self.unresolved.insert(name.clone());
        self.decisions.push(BoneDecision {
            bone,
            name,
            resolution: Resolution::Unresolved,
        });

        let mut stack: Vec<BoneId> = self.hierarchy.children(bone).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(name) = self.hierarchy.name(current).map(ToOwned::to_owned) else {
                continue;
            };
            if self.resolve(&name).is_some() || !self.visited.insert(&name) {
                continue;
            }

            self.unresolved.insert(name.clone());
            self.decisions.push(BoneDecision {
                bone: current,
                name,
                resolution: Resolution::Unresolved,
            });
            stack.extend(self.hierarchy.children(current).iter().rev().copied());
        }
    }

    fn resolve(&self, name: &str) -> Option<BoneId> {
        self.target.resolve(name, self.semantic_matching)
    }

    fn resolve_bone(&self, bone: BoneId) -> Option<BoneId> {
        self.hierarchy
            .name(bone)
            .and_then(|name| self.resolve(name))
    }

    fn bone_name(&self, bone: BoneId) -> String {
        self.hierarchy.name(bone).unwrap_or_default().to_string()
    }
}
