use std::fmt;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::error::HierarchyError;

/// Handle to a bone stored in a [`Hierarchy`].
///
/// Bones are identified by their arena slot, never by name: two bones may
/// share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoneId(usize);

impl BoneId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub(crate) const fn offset(self, by: usize) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single joint node.
#[derive(Debug, Clone)]
pub struct Bone {
    name: String,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    local: Matrix4<f32>,
}

impl Bone {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn local_transform(&self) -> &Matrix4<f32> {
        &self.local
    }
}

/// Arena owning every bone of a scene.
///
/// Parent links are plain handles into the arena. [`Hierarchy::set_parent`]
/// refuses edits that would close a cycle, so walking parent links always
/// terminates.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    bones: Vec<Bone>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn contains(&self, id: BoneId) -> bool {
        id.0 < self.bones.len()
    }

    /// Add a bone with an identity local transform.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
    ) -> Result<BoneId, HierarchyError> {
        self.add_bone_with_transform(name, parent, Matrix4::identity())
    }

    pub fn add_bone_with_transform(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
        local: Matrix4<f32>,
    ) -> Result<BoneId, HierarchyError> {
        if let Some(parent) = parent {
            self.check(parent)?;
        }

        let id = BoneId(self.bones.len());
        self.bones.push(Bone {
            name: name.into(),
            parent,
            children: Vec::new(),
            local,
        });
        if let Some(parent) = parent {
            self.bones[parent.0].children.push(id);
        }
        Ok(id)
    }

    pub fn get(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.0)
    }

    pub fn name(&self, id: BoneId) -> Option<&str> {
        self.get(id).map(Bone::name)
    }

    pub fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.get(id).and_then(Bone::parent)
    }

    /// Direct children in insertion order; empty for unknown handles.
    pub fn children(&self, id: BoneId) -> &[BoneId] {
        self.get(id).map(Bone::children).unwrap_or_default()
    }

    /// First direct child of `parent` carrying `name`.
    pub fn find_child(&self, parent: BoneId, name: &str) -> Option<BoneId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|child| self.name(*child) == Some(name))
    }

    pub fn roots(&self) -> impl Iterator<Item = BoneId> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.parent.is_none())
            .map(|(index, _)| BoneId(index))
    }

    /// Pre-order list of `id` and everything below it.
    pub fn descendants(&self, id: BoneId) -> Vec<BoneId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// True when `ancestor` lies strictly above `node`.
    pub fn is_ancestor(&self, ancestor: BoneId, node: BoneId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Compose local transforms from the root down to `id`.
    pub fn world_matrix(&self, id: BoneId) -> Matrix4<f32> {
        let Some(bone) = self.get(id) else {
            return Matrix4::identity();
        };

        let mut world = bone.local;
        let mut current = bone.parent;
        while let Some(parent) = current {
            let parent_bone = &self.bones[parent.0];
            world = parent_bone.local * world;
            current = parent_bone.parent;
        }
        world
    }

    pub fn set_local_transform(
        &mut self,
        id: BoneId,
        local: Matrix4<f32>,
    ) -> Result<(), HierarchyError> {
        self.check(id)?;
        self.bones[id.0].local = local;
        Ok(())
    }

    /// Move `child` (with its subtree) under `parent`, or detach it when
    /// `parent` is `None`. The child is appended after existing siblings.
    ///
    /// With `keep_world` the child's local transform is recomputed so that its
    /// world transform is unchanged.
    pub fn set_parent(
        &mut self,
        child: BoneId,
        parent: Option<BoneId>,
        keep_world: bool,
    ) -> Result<(), HierarchyError> {
        self.check(child)?;
        if let Some(parent) = parent {
            self.check(parent)?;
            if parent == child || self.is_ancestor(child, parent) {
                return Err(HierarchyError::WouldCycle { child, parent });
            }
        }

        if self.bones[child.0].parent == parent {
            return Ok(());
        }

        let world = keep_world.then(|| self.world_matrix(child));

        if let Some(old_parent) = self.bones[child.0].parent.take() {
            self.bones[old_parent.0]
                .children
                .retain(|sibling| *sibling != child);
        }
        if let Some(parent) = parent {
            self.bones[parent.0].children.push(child);
        }
        self.bones[child.0].parent = parent;

        if let Some(world) = world {
            let parent_world = parent
                .map(|parent| self.world_matrix(parent))
                .unwrap_or_else(Matrix4::identity);
            match parent_world.try_inverse() {
                Some(inverse) => self.bones[child.0].local = inverse * world,
                None => log::warn!(
                    "parent of {} has a singular world transform; keeping local transform",
                    self.bones[child.0].name
                ),
            }
        }

        Ok(())
    }

    /// Move every bone of `other` into this arena. Returns the offset that was
    /// added to `other`'s handles.
    pub fn append(&mut self, other: Hierarchy) -> usize {
        let offset = self.bones.len();
        self.bones.extend(other.bones.into_iter().map(|bone| Bone {
            name: bone.name,
            parent: bone.parent.map(|parent| parent.offset(offset)),
            children: bone
                .children
                .into_iter()
                .map(|child| child.offset(offset))
                .collect(),
            local: bone.local,
        }));
        offset
    }

    fn check(&self, id: BoneId) -> Result<(), HierarchyError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(HierarchyError::UnknownBone(id))
        }
    }
}
