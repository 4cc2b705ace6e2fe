use crate::config::ALLOWED_EXTENSIONS;

/// True if `name` ends in an allowed image extension (case-insensitive).
pub fn is_allowed_image(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Merge ticked candidate tags with the free-text custom tag field.
///
/// Candidates are lowercased. Custom tags are split on commas and trimmed
/// but otherwise kept as typed; empty pieces are dropped.
pub fn collect_tags<S: AsRef<str>>(selections: &[S], input: &str) -> Vec<String> {
    let selected = selections.iter().map(|s| s.as_ref().to_lowercase());
    let custom = input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string);
    selected.chain(custom).collect()
}
