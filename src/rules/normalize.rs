/// Canonical form of an entry name: lower case, trimmed, and with every
/// internal run of whitespace replaced by a single underscore.
///
/// `"  Sample Type "` becomes `"sample_type"`. Applying it twice is a no-op.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
