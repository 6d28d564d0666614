/// Characters ignored when comparing bone names.
const SEPARATORS: [char; 3] = ['_', '.', ' '];

/// Canonicalize a raw bone name into a matching key.
///
/// Two names refer to the same bone concept iff their keys are equal.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|ch| !SEPARATORS.contains(ch))
        .flat_map(char::to_lowercase)
        .collect()
}
