use std::collections::HashMap;

use super::{naming::normalize, table::CanonicalBoneTable};

/// Semantic lookup of source bone names against one target skeleton.
///
/// Only canonical alias resolution happens here; exact-name hits are the
/// caller's cheaper first attempt.
#[derive(Debug, Clone)]
pub struct BoneMatcher<'a> {
    table: &'a CanonicalBoneTable,
    // normalized target name -> target name as spelled in the rig
    targets: HashMap<String, String>,
}

impl<'a> BoneMatcher<'a> {
    pub fn new<I, S>(table: &'a CanonicalBoneTable, target_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut targets = HashMap::new();
        for name in target_names {
            let name = name.as_ref();
            targets
                .entry(normalize(name))
                .or_insert_with(|| name.to_string());
        }
        Self { table, targets }
    }

    /// Return the target spelling of the joint `source_name` denotes, trying
    /// the joint's aliases in registration order.
    pub fn find_target_bone(&self, source_name: &str) -> Option<&str> {
        let bone = self.table.resolve(source_name)?;
        self.table
            .aliases_for(bone)
            .iter()
            .find_map(|alias| self.targets.get(alias))
            .map(String::as_str)
    }
}

/// One-shot lookup against the standard alias table.
pub fn find_target_bone<S: AsRef<str>>(source_name: &str, target_names: &[S]) -> Option<String> {
    BoneMatcher::new(CanonicalBoneTable::standard(), target_names)
        .find_target_bone(source_name)
        .map(ToOwned::to_owned)
}
