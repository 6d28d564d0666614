use std::path::Path;

use anyhow::{Context, Result};
use gltf::{Document, Gltf};
use nalgebra::Matrix4;

use crate::{
    hierarchy::BoneId,
    retarget::SkinBinding,
    scene::{Scene, SkinnedMesh},
};

/// A glTF document flattened into a [`Scene`] under one synthetic root.
#[derive(Debug, Clone)]
pub struct ImportedScene {
    pub scene: Scene,
    pub root: BoneId,
}

/// Read a `.gltf`/`.glb` file. The synthetic root is named after the file stem.
pub fn load_scene(path: &Path) -> Result<ImportedScene> {
    let gltf = Gltf::open(path)
        .with_context(|| format!("failed to read glTF: {}", path.display()))?;
    let root_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Scene");

    scene_from_document(&gltf.document, root_name)
        .with_context(|| format!("failed to import scene: {}", path.display()))
}

/// Build a scene from an already parsed document.
///
/// Every node becomes a bone; unnamed nodes are called `node_<index>`.
/// Each skin becomes one [`SkinnedMesh`], anchored at the first node that
/// uses it.
pub fn scene_from_document(document: &Document, root_name: &str) -> Result<ImportedScene> {
    let mut scene = Scene::new();
    let hierarchy = &mut scene.hierarchy;
    let root = hierarchy.add_bone(root_name, None)?;

    let mut bones = Vec::with_capacity(document.nodes().count());
    for node in document.nodes() {
        let name = node
            .name()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node_{}", node.index()));
        let local = Matrix4::from(node.transform().matrix());
        bones.push(hierarchy.add_bone_with_transform(name, None, local)?);
    }

    for parent in document.nodes() {
        for child in parent.children() {
            hierarchy
                .set_parent(bones[child.index()], Some(bones[parent.index()]), false)
                .with_context(|| {
                    format!("node {} cannot be a child of node {}", child.index(), parent.index())
                })?;
        }
    }
    for bone in &bones {
        if hierarchy.parent(*bone).is_none() {
            hierarchy.set_parent(*bone, Some(root), false)?;
        }
    }

    for skin in document.skins() {
        let carrier = document
            .nodes()
            .find(|node| node.skin().is_some_and(|used| used.index() == skin.index()));
        let name = skin
            .name()
            .or_else(|| carrier.as_ref().and_then(|node| node.name()))
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("skin_{}", skin.index()));

        let joints: Vec<BoneId> = skin.joints().map(|joint| bones[joint.index()]).collect();
        let root_bone = skin.skeleton().map(|node| bones[node.index()]);
        log::debug!("Imported skin {name} with {} joints", joints.len());

        scene.meshes.push(SkinnedMesh {
            name: name.clone(),
            node: carrier.map(|node| bones[node.index()]),
            binding: SkinBinding::new(name, joints, root_bone),
        });
    }

    Ok(ImportedScene { scene, root })
}
