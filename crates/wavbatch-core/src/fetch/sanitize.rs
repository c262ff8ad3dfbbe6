//! Filename sanitization for user-supplied output names.

/// Characters that are not allowed in an output name on common filesystems.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum output name length, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Sanitizes a custom output name.
///
/// - Replaces each of `<>:"/\|?*` with `_` (one for one, no collapsing)
/// - Truncates to [`MAX_NAME_CHARS`] characters (never splits a UTF-8 sequence)
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .take(MAX_NAME_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_each_forbidden_char() {
        assert_eq!(sanitize_filename("My:Song/Title*?"), "My_Song_Title__");
        assert_eq!(sanitize_filename(r#"a<b>c"d\e|f"#), "a_b_c_d_e_f");
    }

    #[test]
    fn leaves_clean_names_alone() {
        assert_eq!(sanitize_filename("Artist - Track (Live)"), "Artist - Track (Live)");
    }

    #[test]
    fn truncates_to_exactly_100() {
        let long = "x".repeat(250);
        assert_eq!(sanitize_filename(&long).chars().count(), 100);
        let exact = "y".repeat(100);
        assert_eq!(sanitize_filename(&exact), exact);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let long = "é".repeat(120);
        let out = sanitize_filename(&long);
        assert_eq!(out.chars().count(), 100);
        assert_eq!(out.len(), 200);
    }
}
