use serde::Serialize;

/// Per-mesh summary of a dress run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeshReport {
    pub mesh: String,
    pub bone_count: usize,
    pub matched_bones: usize,
    pub inherited_bones: usize,
    /// Bones left for manual handling, sorted by name.
    pub unresolved_bones: Vec<String>,
    pub root_bone: Option<String>,
}

/// Full report returned after dressing an avatar with one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DressReport {
    pub avatar: String,
    pub article: String,
    pub armature: String,
    pub meshes: Vec<MeshReport>,
}

impl DressReport {
    /// True when every bone of every mesh found a home on the armature.
    pub fn is_complete(&self) -> bool {
        self.meshes
            .iter()
            .all(|mesh| mesh.unresolved_bones.is_empty())
    }

    pub fn unresolved_count(&self) -> usize {
        self.meshes
            .iter()
            .map(|mesh| mesh.unresolved_bones.len())
            .sum()
    }
}
