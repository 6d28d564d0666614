use serde::Serialize;

use crate::{
    hierarchy::{BoneId, Hierarchy},
    retarget::SkinBinding,
};

/// A piece of skinned geometry and the bones driving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkinnedMesh {
    pub name: String,
    /// Node carrying the mesh, when the source format has one.
    pub node: Option<BoneId>,
    pub binding: SkinBinding,
}

impl SkinnedMesh {
    /// Node used to decide which subtree the mesh belongs to.
    pub fn anchor(&self) -> Option<BoneId> {
        self.node
            .or(self.binding.root_bone)
            .or_else(|| self.binding.bones.first().copied())
    }
}

/// Bones plus the skinned meshes that reference them.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub hierarchy: Hierarchy,
    pub meshes: Vec<SkinnedMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `other` into this scene. Returns the handle offset applied to
    /// `other`'s bones.
    pub fn merge(&mut self, other: Scene) -> usize {
        let offset = self.hierarchy.append(other.hierarchy);
        let shift = |bone: BoneId| bone.offset(offset);

        self.meshes
            .extend(other.meshes.into_iter().map(|mesh| SkinnedMesh {
                name: mesh.name,
                node: mesh.node.map(shift),
                binding: SkinBinding {
                    name: mesh.binding.name,
                    bones: mesh.binding.bones.into_iter().map(shift).collect(),
                    root_bone: mesh.binding.root_bone.map(shift),
                },
            }));
        offset
    }

    /// Meshes whose anchor is `root` or lies below it.
    pub fn meshes_under(&self, root: BoneId) -> Vec<usize> {
        self.meshes
            .iter()
            .enumerate()
            .filter(|(_, mesh)| {
                mesh.anchor().is_some_and(|anchor| {
                    anchor == root || self.hierarchy.is_ancestor(root, anchor)
                })
            })
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_scenes_when_merging_then_mesh_handles_are_shifted() {
        let mut avatar = Scene::new();
        let avatar_root = avatar.hierarchy.add_bone("Avatar", None).expect("avatar");
        avatar
            .hierarchy
            .add_bone("Armature", Some(avatar_root))
            .expect("armature");

        let mut article = Scene::new();
        let cloth = article.hierarchy.add_bone("Cloth", None).expect("cloth");
        let hips = article.hierarchy.add_bone("Hips", Some(cloth)).expect("hips");
        let body = article.hierarchy.add_bone("Body", Some(cloth)).expect("body");
        article.meshes.push(SkinnedMesh {
            name: "Body".to_string(),
            node: Some(body),
            binding: SkinBinding::new("Body", vec![hips], Some(hips)),
        });

        let offset = avatar.merge(article);

        assert_eq!(offset, 2);
        let mesh = &avatar.meshes[0];
        assert_eq!(mesh.node, Some(BoneId::new(4)));
        assert_eq!(mesh.binding.bones, vec![BoneId::new(3)]);
        assert_eq!(mesh.binding.root_bone, Some(BoneId::new(3)));
        assert_eq!(avatar.hierarchy.name(BoneId::new(3)), Some("Hips"));
    }

    #[test]
    fn given_meshes_in_two_subtrees_when_filtering_then_only_matching_subtree_is_listed() {
        let mut scene = Scene::new();
        let left = scene.hierarchy.add_bone("Left", None).expect("left");
        let right = scene.hierarchy.add_bone("Right", None).expect("right");
        let left_bone = scene.hierarchy.add_bone("Bone", Some(left)).expect("left bone");
        let right_bone = scene.hierarchy.add_bone("Bone", Some(right)).expect("right bone");
        scene.meshes.push(SkinnedMesh {
            name: "A".to_string(),
            node: None,
            binding: SkinBinding::new("A", vec![left_bone], None),
        });
        scene.meshes.push(SkinnedMesh {
            name: "B".to_string(),
            node: None,
            binding: SkinBinding::new("B", vec![right_bone], None),
        });

        assert_eq!(scene.meshes_under(right), vec![1]);
        assert_eq!(scene.meshes_under(left), vec![0]);
    }
}
