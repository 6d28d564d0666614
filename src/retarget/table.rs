use std::{collections::HashMap, fmt, sync::OnceLock};

use serde::{Deserialize, Serialize};

use super::naming::normalize;

// ─── Canonical joints ─────────────────────────────────────────────────────────

/// Rig-agnostic identifier of a humanoid joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HumanBone {
    Hips,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
    LeftToes,
    RightToes,
    LeftEye,
    RightEye,
    Jaw,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
}

impl HumanBone {
    pub fn as_str(&self) -> &'static str {
        match self {
            HumanBone::Hips => "Hips",
            HumanBone::LeftUpperLeg => "LeftUpperLeg",
            HumanBone::RightUpperLeg => "RightUpperLeg",
            HumanBone::LeftLowerLeg => "LeftLowerLeg",
            HumanBone::RightLowerLeg => "RightLowerLeg",
            HumanBone::LeftFoot => "LeftFoot",
            HumanBone::RightFoot => "RightFoot",
            HumanBone::Spine => "Spine",
            HumanBone::Chest => "Chest",
            HumanBone::UpperChest => "UpperChest",
            HumanBone::Neck => "Neck",
            HumanBone::Head => "Head",
            HumanBone::LeftShoulder => "LeftShoulder",
            HumanBone::RightShoulder => "RightShoulder",
            HumanBone::LeftUpperArm => "LeftUpperArm",
            HumanBone::RightUpperArm => "RightUpperArm",
            HumanBone::LeftLowerArm => "LeftLowerArm",
            HumanBone::RightLowerArm => "RightLowerArm",
            HumanBone::LeftHand => "LeftHand",
            HumanBone::RightHand => "RightHand",
            HumanBone::LeftToes => "LeftToes",
            HumanBone::RightToes => "RightToes",
            HumanBone::LeftEye => "LeftEye",
            HumanBone::RightEye => "RightEye",
            HumanBone::Jaw => "Jaw",
            HumanBone::LeftThumbProximal => "LeftThumbProximal",
            HumanBone::LeftThumbIntermediate => "LeftThumbIntermediate",
            HumanBone::LeftThumbDistal => "LeftThumbDistal",
            HumanBone::LeftIndexProximal => "LeftIndexProximal",
            HumanBone::LeftIndexIntermediate => "LeftIndexIntermediate",
            HumanBone::LeftIndexDistal => "LeftIndexDistal",
            HumanBone::LeftMiddleProximal => "LeftMiddleProximal",
            HumanBone::LeftMiddleIntermediate => "LeftMiddleIntermediate",
            HumanBone::LeftMiddleDistal => "LeftMiddleDistal",
            HumanBone::LeftRingProximal => "LeftRingProximal",
            HumanBone::LeftRingIntermediate => "LeftRingIntermediate",
            HumanBone::LeftRingDistal => "LeftRingDistal",
            HumanBone::LeftLittleProximal => "LeftLittleProximal",
            HumanBone::LeftLittleIntermediate => "LeftLittleIntermediate",
            HumanBone::LeftLittleDistal => "LeftLittleDistal",
            HumanBone::RightThumbProximal => "RightThumbProximal",
            HumanBone::RightThumbIntermediate => "RightThumbIntermediate",
            HumanBone::RightThumbDistal => "RightThumbDistal",
            HumanBone::RightIndexProximal => "RightIndexProximal",
            HumanBone::RightIndexIntermediate => "RightIndexIntermediate",
            HumanBone::RightIndexDistal => "RightIndexDistal",
            HumanBone::RightMiddleProximal => "RightMiddleProximal",
            HumanBone::RightMiddleIntermediate => "RightMiddleIntermediate",
            HumanBone::RightMiddleDistal => "RightMiddleDistal",
            HumanBone::RightRingProximal => "RightRingProximal",
            HumanBone::RightRingIntermediate => "RightRingIntermediate",
            HumanBone::RightRingDistal => "RightRingDistal",
            HumanBone::RightLittleProximal => "RightLittleProximal",
            HumanBone::RightLittleIntermediate => "RightLittleIntermediate",
            HumanBone::RightLittleDistal => "RightLittleDistal",
        }
    }
}

impl fmt::Display for HumanBone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Alias groups ─────────────────────────────────────────────────────────────

/// Known spellings per joint across common rigging conventions.
///
/// Within a row, earlier spellings win when a target rig exposes several of
/// them.
pub const ALIAS_GROUPS: [(HumanBone, &[&str]); 55] = [
    (HumanBone::Hips, &["Hips", "Hip", "Pelvis"]),
    (
        HumanBone::LeftUpperLeg,
        &["LeftUpperLeg", "UpperLeg_Left", "UpperLeg_L", "Leg_Left", "Leg_L", "Thigh_L"],
    ),
    (
        HumanBone::RightUpperLeg,
        &["RightUpperLeg", "UpperLeg_Right", "UpperLeg_R", "Leg_Right", "Leg_R", "Thigh_R"],
    ),
    (
        HumanBone::LeftLowerLeg,
        &["LeftLowerLeg", "LowerLeg_Left", "LowerLeg_L", "Knee_Left", "Knee_L", "Shin_L"],
    ),
    (
        HumanBone::RightLowerLeg,
        &["RightLowerLeg", "LowerLeg_Right", "LowerLeg_R", "Knee_Right", "Knee_R", "Shin_R"],
    ),
    (HumanBone::LeftFoot, &["LeftFoot", "Foot_Left", "Foot_L"]),
    (HumanBone::RightFoot, &["RightFoot", "Foot_Right", "Foot_R"]),
    (HumanBone::Spine, &["Spine"]),
    (HumanBone::Chest, &["Chest"]),
    (HumanBone::UpperChest, &["UpperChest", "Chest_Upper"]),
    (HumanBone::Neck, &["Neck"]),
    (HumanBone::Head, &["Head"]),
    (HumanBone::LeftShoulder, &["LeftShoulder", "Shoulder_Left", "Shoulder_L"]),
    (HumanBone::RightShoulder, &["RightShoulder", "Shoulder_Right", "Shoulder_R"]),
    (
        HumanBone::LeftUpperArm,
        &["LeftUpperArm", "UpperArm_Left", "UpperArm_L", "Arm_Left", "Arm_L"],
    ),
    (
        HumanBone::RightUpperArm,
        &["RightUpperArm", "UpperArm_Right", "UpperArm_R", "Arm_Right", "Arm_R"],
    ),
    (
        HumanBone::LeftLowerArm,
        &["LeftLowerArm", "LowerArm_Left", "LowerArm_L", "Forearm_Left", "Forearm_L", "Elbow_L"],
    ),
    (
        HumanBone::RightLowerArm,
        &["RightLowerArm", "LowerArm_Right", "LowerArm_R", "Forearm_Right", "Forearm_R", "Elbow_R"],
    ),
    (HumanBone::LeftHand, &["LeftHand", "Hand_Left", "Hand_L", "Wrist_L"]),
    (HumanBone::RightHand, &["RightHand", "Hand_Right", "Hand_R", "Wrist_R"]),
    (
        HumanBone::LeftToes,
        &["LeftToes", "Toes_Left", "Toe_Left", "ToeIK_L", "Toes_L", "Toe_L"],
    ),
    (
        HumanBone::RightToes,
        &["RightToes", "Toes_Right", "Toe_Right", "ToeIK_R", "Toes_R", "Toe_R"],
    ),
    (HumanBone::LeftEye, &["LeftEye", "Eye_Left", "Eye_L"]),
    (HumanBone::RightEye, &["RightEye", "Eye_Right", "Eye_R"]),
    (HumanBone::Jaw, &["Jaw"]),
    (
        HumanBone::LeftThumbProximal,
        &["LeftThumbProximal", "ProximalThumb_Left", "ProximalThumb_L", "Thumb1_L"],
    ),
    (
        HumanBone::LeftThumbIntermediate,
        &["LeftThumbIntermediate", "IntermediateThumb_Left", "IntermediateThumb_L", "Thumb2_L"],
    ),
    (
        HumanBone::LeftThumbDistal,
        &["LeftThumbDistal", "DistalThumb_Left", "DistalThumb_L", "Thumb3_L"],
    ),
    (
        HumanBone::LeftIndexProximal,
        &["LeftIndexProximal", "ProximalIndex_Left", "ProximalIndex_L", "Index1_L"],
    ),
    (
        HumanBone::LeftIndexIntermediate,
        &["LeftIndexIntermediate", "IntermediateIndex_Left", "IntermediateIndex_L", "Index2_L"],
    ),
    (
        HumanBone::LeftIndexDistal,
        &["LeftIndexDistal", "DistalIndex_Left", "DistalIndex_L", "Index3_L"],
    ),
    (
        HumanBone::LeftMiddleProximal,
        &["LeftMiddleProximal", "ProximalMiddle_Left", "ProximalMiddle_L", "Middle1_L"],
    ),
    (
        HumanBone::LeftMiddleIntermediate,
        &["LeftMiddleIntermediate", "IntermediateMiddle_Left", "IntermediateMiddle_L", "Middle2_L"],
    ),
    (
        HumanBone::LeftMiddleDistal,
        &["LeftMiddleDistal", "DistalMiddle_Left", "DistalMiddle_L", "Middle3_L"],
    ),
    (
        HumanBone::LeftRingProximal,
        &["LeftRingProximal", "ProximalRing_Left", "ProximalRing_L", "Ring1_L"],
    ),
    (
        HumanBone::LeftRingIntermediate,
        &["LeftRingIntermediate", "IntermediateRing_Left", "IntermediateRing_L", "Ring2_L"],
    ),
    (
        HumanBone::LeftRingDistal,
        &["LeftRingDistal", "DistalRing_Left", "DistalRing_L", "Ring3_L"],
    ),
    (
        HumanBone::LeftLittleProximal,
        &["LeftLittleProximal", "ProximalLittle_Left", "ProximalLittle_L", "Little1_L"],
    ),
    (
        HumanBone::LeftLittleIntermediate,
        &["LeftLittleIntermediate", "IntermediateLittle_Left", "IntermediateLittle_L", "Little2_L"],
    ),
    (
        HumanBone::LeftLittleDistal,
        &["LeftLittleDistal", "DistalLittle_Left", "DistalLittle_L", "Little3_L"],
    ),
    (
        HumanBone::RightThumbProximal,
        &["RightThumbProximal", "ProximalThumb_Right", "ProximalThumb_R", "Thumb1_R"],
    ),
    (
        HumanBone::RightThumbIntermediate,
        &["RightThumbIntermediate", "IntermediateThumb_Right", "IntermediateThumb_R", "Thumb2_R"],
    ),
    (
        HumanBone::RightThumbDistal,
        &["RightThumbDistal", "DistalThumb_Right", "DistalThumb_R", "Thumb3_R"],
    ),
    (
        HumanBone::RightIndexProximal,
        &["RightIndexProximal", "ProximalIndex_Right", "ProximalIndex_R", "Index1_R"],
    ),
    (
        HumanBone::RightIndexIntermediate,
        &["RightIndexIntermediate", "IntermediateIndex_Right", "IntermediateIndex_R", "Index2_R"],
    ),
    (
        HumanBone::RightIndexDistal,
        &["RightIndexDistal", "DistalIndex_Right", "DistalIndex_R", "Index3_R"],
    ),
    (
        HumanBone::RightMiddleProximal,
        &["RightMiddleProximal", "ProximalMiddle_Right", "ProximalMiddle_R", "Middle1_R"],
    ),
    (
        HumanBone::RightMiddleIntermediate,
        &["RightMiddleIntermediate", "IntermediateMiddle_Right", "IntermediateMiddle_R", "Middle2_R"],
    ),
    (
        HumanBone::RightMiddleDistal,
        &["RightMiddleDistal", "DistalMiddle_Right", "DistalMiddle_R", "Middle3_R"],
    ),
    (
        HumanBone::RightRingProximal,
        &["RightRingProximal", "ProximalRing_Right", "ProximalRing_R", "Ring1_R"],
    ),
    (
        HumanBone::RightRingIntermediate,
        &["RightRingIntermediate", "IntermediateRing_Right", "IntermediateRing_R", "Ring2_R"],
    ),
    (
        HumanBone::RightRingDistal,
        &["RightRingDistal", "DistalRing_Right", "DistalRing_R", "Ring3_R"],
    ),
    (
        HumanBone::RightLittleProximal,
        &["RightLittleProximal", "ProximalLittle_Right", "ProximalLittle_R", "Little1_R"],
    ),
    (
        HumanBone::RightLittleIntermediate,
        &["RightLittleIntermediate", "IntermediateLittle_Right", "IntermediateLittle_R", "Little2_R"],
    ),
    (
        HumanBone::RightLittleDistal,
        &["RightLittleDistal", "DistalLittle_Right", "DistalLittle_R", "Little3_R"],
    ),
];

// ─── Table ────────────────────────────────────────────────────────────────────

/// Immutable alias registry built from ordered alias groups.
#[derive(Debug, Clone, Default)]
pub struct CanonicalBoneTable {
    by_alias: HashMap<String, HumanBone>,
    aliases: HashMap<HumanBone, Vec<String>>,
}

impl CanonicalBoneTable {
    /// Process-wide table built from [`ALIAS_GROUPS`] on first use.
    pub fn standard() -> &'static CanonicalBoneTable {
        static TABLE: OnceLock<CanonicalBoneTable> = OnceLock::new();
        TABLE.get_or_init(|| CanonicalBoneTable::from_groups(&ALIAS_GROUPS))
    }

    pub fn from_groups(groups: &[(HumanBone, &[&str])]) -> Self {
        let mut table = Self::default();
        for (bone, aliases) in groups {
            for alias in aliases.iter() {
                table.register(normalize(alias), *bone);
            }
        }
        table
    }

    // A key re-registered by a later group points at that later joint.
    fn register(&mut self, key: String, bone: HumanBone) {
        self.by_alias.insert(key.clone(), bone);
        let names = self.aliases.entry(bone).or_default();
        if !names.contains(&key) {
            names.push(key);
        }
    }

    /// Map any spelling to its canonical joint.
    pub fn resolve(&self, name: &str) -> Option<HumanBone> {
        self.by_alias.get(&normalize(name)).copied()
    }

    /// Normalized aliases of `bone` in registration order.
    pub fn aliases_for(&self, bone: HumanBone) -> &[String] {
        self.aliases
            .get(&bone)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of canonical joints with at least one alias.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
