use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::{
    types::{DressReport, MeshReport},
    walk::{SkeletonRetargeter, TargetSkeleton, VisitedSet, check_binding},
};
use crate::{
    error::{HierarchyError, RetargetError},
    hierarchy::BoneId,
    scene::Scene,
    settings::DresserSettings,
};

/// Retarget every skinned mesh of `article_root` onto the avatar's armature.
///
/// The armature is looked up among the direct children of `avatar_root`.
/// All preconditions are checked before the scene is touched, so an error
/// leaves the scene unchanged.
pub fn dress(
    scene: &mut Scene,
    avatar_root: BoneId,
    article_root: BoneId,
    settings: &DresserSettings,
) -> Result<DressReport, RetargetError> {
    if !scene.hierarchy.contains(avatar_root) {
        return Err(RetargetError::MissingTargetRoot(avatar_root));
    }
    if !scene.hierarchy.contains(article_root) {
        return Err(HierarchyError::UnknownBone(article_root).into());
    }
    let armature = scene
        .hierarchy
        .find_child(avatar_root, &settings.armature_name)
        .ok_or_else(|| RetargetError::MissingArmature {
            name: settings.armature_name.clone(),
        })?;

    let selected = scene.meshes_under(article_root);
    for index in &selected {
        check_binding(&scene.hierarchy, &scene.meshes[*index].binding)?;
    }

    let Scene { hierarchy, meshes } = scene;
    let target = TargetSkeleton::new(hierarchy, armature)?;
    let retargeter = SkeletonRetargeter::new(&target, settings);

    let mut report = DressReport {
        avatar: hierarchy.name(avatar_root).unwrap_or_default().to_string(),
        article: hierarchy.name(article_root).unwrap_or_default().to_string(),
        armature: settings.armature_name.clone(),
        meshes: Vec::with_capacity(selected.len()),
    };

    let mut visited = VisitedSet::new();
    for index in selected {
        let mesh = &mut meshes[index];
        let outcome = retargeter.retarget(hierarchy, &mesh.binding, &mut visited)?;

        if settings.relocate_meshes
            && let Some(node) = mesh.node
            && let Err(err) =
                hierarchy.set_parent(node, Some(avatar_root), settings.preserve_world_transform)
        {
            log::warn!("Mesh {} could not be moved under the avatar: {err}", mesh.name);
        }

        log::info!(
            "Dressed {}: {} matched, {} inherited, {} unresolved",
            mesh.name,
            outcome.matched_count(),
            outcome.inherited_count(),
            outcome.unresolved.len()
        );

        report.meshes.push(MeshReport {
            mesh: mesh.name.clone(),
            bone_count: outcome.binding.bones.len(),
            matched_bones: outcome.matched_count(),
            inherited_bones: outcome.inherited_count(),
            unresolved_bones: outcome.unresolved.iter().cloned().collect(),
            root_bone: outcome
                .binding
                .root_bone
                .and_then(|root| hierarchy.name(root))
                .map(ToOwned::to_owned),
        });
        mesh.binding = outcome.binding;
    }

    Ok(report)
}

/// Write a markdown checklist of the bones that still need manual work.
pub fn write_manual_fix_checklist(checklist_path: &Path, report: &DressReport) -> Result<()> {
    let mut content = String::new();
    content.push_str("# Avatar Dresser Manual Fix Checklist\n\n");
    content.push_str("## Summary\n\n");
    content.push_str(&format!("- Avatar: `{}`\n", report.avatar));
    content.push_str(&format!("- Article: `{}`\n", report.article));
    content.push_str(&format!("- Armature: `{}`\n", report.armature));
    content.push_str(&format!("- Meshes: `{}`\n", report.meshes.len()));
    content.push_str(&format!(
        "- Unresolved bones: `{}`\n\n",
        report.unresolved_count()
    ));

    content.push_str("## Bones to Handle Manually\n\n");
    if report.is_complete() {
        content.push_str("- None\n");
    } else {
        for mesh in &report.meshes {
            if mesh.unresolved_bones.is_empty() {
                continue;
            }
            content.push_str(&format!("### {}\n\n", mesh.mesh));
            for bone in &mesh.unresolved_bones {
                content.push_str(&format!("- [ ] Parent `{bone}` to an armature bone\n"));
            }
            content.push('\n');
        }
    }

    fs::write(checklist_path, content).with_context(|| {
        format!(
            "failed to write manual fix checklist: {}",
            checklist_path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{retarget::SkinBinding, scene::SkinnedMesh};

    struct Dressing {
        scene: Scene,
        avatar: BoneId,
        article: BoneId,
    }

    fn scene_with(armature_name: &str) -> Dressing {
        let mut scene = Scene::new();
        let h = &mut scene.hierarchy;
        let avatar = h.add_bone("Avatar", None).expect("avatar");
        let armature = h.add_bone(armature_name, Some(avatar)).expect("armature");
        let hips = h.add_bone("Hips", Some(armature)).expect("hips");
        let spine = h.add_bone("Spine", Some(hips)).expect("spine");
        h.add_bone("Chest", Some(spine)).expect("chest");
        h.add_bone("Body", Some(avatar)).expect("body");

        let article = h.add_bone("Outfit", None).expect("outfit");
        let cloth_armature = h.add_bone("Armature", Some(article)).expect("cloth armature");
        let cloth_hips = h.add_bone("hips", Some(cloth_armature)).expect("cloth hips");
        let cloth_chest = h.add_bone("Chest", Some(cloth_hips)).expect("cloth chest");
        let skirt = h.add_bone("Skirt_Root", Some(cloth_hips)).expect("skirt");
        let skirt_end = h.add_bone("Skirt_End", Some(skirt)).expect("skirt end");
        let ribbon = h.add_bone("Ribbon", Some(article)).expect("ribbon");
        let shirt = h.add_bone("Shirt", Some(article)).expect("shirt");
        let skirt_mesh = h.add_bone("Skirt", Some(article)).expect("skirt mesh");

        scene.meshes.push(SkinnedMesh {
            name: "Shirt".to_string(),
            node: Some(shirt),
            binding: SkinBinding::new("Shirt", vec![cloth_hips, cloth_chest], Some(cloth_hips)),
        });
        scene.meshes.push(SkinnedMesh {
            name: "Skirt".to_string(),
            node: Some(skirt_mesh),
            binding: SkinBinding::new(
                "Skirt",
                vec![skirt, skirt_end, cloth_hips, ribbon],
                None,
            ),
        });

        Dressing {
            scene,
            avatar,
            article,
        }
    }

    fn parents(scene: &Scene) -> Vec<Option<BoneId>> {
        (0..scene.hierarchy.len())
            .map(|index| scene.hierarchy.parent(BoneId::new(index)))
            .collect()
    }

    #[test]
    fn given_article_when_dressing_then_every_mesh_is_retargeted_and_relocated() {
        let mut dressing = scene_with("Armature");
        let hips = BoneId::new(2);
        let chest = BoneId::new(4);

        let report = dress(
            &mut dressing.scene,
            dressing.avatar,
            dressing.article,
            &DresserSettings::default(),
        )
        .expect("dress");

        assert_eq!(report.avatar, "Avatar");
        assert_eq!(report.article, "Outfit");
        assert_eq!(report.meshes.len(), 2);

        let shirt = &dressing.scene.meshes[0];
        assert_eq!(shirt.binding.bones, vec![hips, chest]);
        assert_eq!(shirt.binding.root_bone, Some(hips));
        assert_eq!(report.meshes[0].matched_bones, 2);
        assert_eq!(report.meshes[0].root_bone.as_deref(), Some("Hips"));
        assert_eq!(
            dressing.scene.hierarchy.parent(shirt.node.expect("shirt node")),
            Some(dressing.avatar)
        );

        let skirt = &report.meshes[1];
        assert_eq!(skirt.bone_count, 4);
        assert_eq!(skirt.inherited_bones, 1);
        assert_eq!(skirt.root_bone.as_deref(), Some("Hips"));
        let skirt_root = dressing.scene.meshes[1].binding.bones[0];
        assert_eq!(dressing.scene.hierarchy.parent(skirt_root), Some(hips));
    }

    #[test]
    fn given_unknown_bones_when_dressing_then_they_are_reported_unresolved() {
        let mut dressing = scene_with("Armature");

        let report = dress(
            &mut dressing.scene,
            dressing.avatar,
            dressing.article,
            &DresserSettings::default(),
        )
        .expect("dress");

        // Skirt_End hangs under an inherited bone, which the armature cannot name.
        assert_eq!(
            report.meshes[1].unresolved_bones,
            vec!["Ribbon".to_string(), "Skirt_End".to_string()]
        );
        assert!(report.meshes[0].unresolved_bones.is_empty());
        assert!(!report.is_complete());
        assert_eq!(report.unresolved_count(), 2);
    }

    #[test]
    fn given_avatar_without_armature_when_dressing_then_scene_is_untouched() {
        let mut dressing = scene_with("Skeleton");
        let before = parents(&dressing.scene);
        let bindings_before = dressing.scene.meshes.clone();

        let result = dress(
            &mut dressing.scene,
            dressing.avatar,
            dressing.article,
            &DresserSettings::default(),
        );

        assert_eq!(
            result,
            Err(RetargetError::MissingArmature {
                name: "Armature".to_string()
            })
        );
        assert_eq!(parents(&dressing.scene), before);
        assert_eq!(dressing.scene.meshes, bindings_before);
    }

    #[test]
    fn given_custom_armature_name_when_dressing_then_it_is_used() {
        let mut dressing = scene_with("Skeleton");
        let settings = DresserSettings {
            armature_name: "Skeleton".to_string(),
            relocate_meshes: false,
            ..DresserSettings::default()
        };

        let report = dress(
            &mut dressing.scene,
            dressing.avatar,
            dressing.article,
            &settings,
        )
        .expect("dress");

        assert_eq!(report.armature, "Skeleton");
        let shirt_node = dressing.scene.meshes[0].node.expect("shirt node");
        assert_eq!(dressing.scene.hierarchy.parent(shirt_node), Some(dressing.article));
    }

    #[test]
    fn given_avatar_below_mesh_node_when_dressing_then_mesh_stays_and_is_still_reported() {
        // Outfit > {Shirt > Avatar > Armature > Hips, Hips(src)}
        let mut scene = Scene::new();
        let h = &mut scene.hierarchy;
        let article = h.add_bone("Outfit", None).expect("outfit");
        let shirt = h.add_bone("Shirt", Some(article)).expect("shirt");
        let avatar = h.add_bone("Avatar", Some(shirt)).expect("avatar");
        let armature = h.add_bone("Armature", Some(avatar)).expect("armature");
        let hips = h.add_bone("Hips", Some(armature)).expect("hips");
        let cloth_hips = h.add_bone("Hips", Some(article)).expect("cloth hips");
        scene.meshes.push(SkinnedMesh {
            name: "Shirt".to_string(),
            node: Some(shirt),
            binding: SkinBinding::new("Shirt", vec![cloth_hips], Some(cloth_hips)),
        });

        let report =
            dress(&mut scene, avatar, article, &DresserSettings::default()).expect("dress");

        assert_eq!(scene.hierarchy.parent(shirt), Some(article));
        assert_eq!(report.meshes.len(), 1);
        assert_eq!(report.meshes[0].mesh, "Shirt");
        assert_eq!(report.meshes[0].matched_bones, 1);
        assert_eq!(scene.meshes[0].binding.bones, vec![hips]);
    }

    #[test]
    fn given_report_with_unresolved_bones_when_writing_checklist_then_each_bone_is_listed() {
        let report = DressReport {
            avatar: "Avatar".to_string(),
            article: "Outfit".to_string(),
            armature: "Armature".to_string(),
            meshes: vec![MeshReport {
                mesh: "Skirt".to_string(),
                bone_count: 3,
                matched_bones: 1,
                inherited_bones: 1,
                unresolved_bones: vec!["Ribbon".to_string()],
                root_bone: Some("Hips".to_string()),
            }],
        };
        let mut path = std::env::temp_dir();
        path.push(format!("avatar-dresser-checklist-{}.md", std::process::id()));

        write_manual_fix_checklist(&path, &report).expect("write checklist");
        let content = std::fs::read_to_string(&path).expect("read checklist");
        let _ = std::fs::remove_file(&path);

        assert!(content.contains("### Skirt"));
        assert!(content.contains("- [ ] Parent `Ribbon` to an armature bone"));
        assert!(content.contains("- Unresolved bones: `1`"));
    }
}
