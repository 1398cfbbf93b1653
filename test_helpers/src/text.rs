//! Text normalisation for comparing generated code.

/// Drop all whitespace so token streams compare independently of spacing.
///
/// `TokenStream::to_string` inserts spaces between most tokens; generated
/// artifacts and `quote!` expectations both collapse to the same text.
#[must_use]
pub fn compact(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Whether `haystack` contains `needle` once whitespace is ignored.
#[must_use]
pub fn contains_compact(haystack: &str, needle: &str) -> bool {
    compact(haystack).contains(&compact(needle))
}

/// Byte offset of `needle` in the compacted `haystack`, if present.
///
/// Useful for asserting the relative order of generated statements.
#[must_use]
pub fn compact_position(haystack: &str, needle: &str) -> Option<usize> {
    compact(haystack).find(&compact(needle))
}

#[cfg(test)]
mod tests {
    use super::{compact, compact_position, contains_compact};

    #[test]
    fn compact_removes_token_spacing() {
        assert_eq!(
            compact("impl :: layerconf :: LayeredMerge for X { }"),
            "impl::layerconf::LayeredMergeforX{}"
        );
    }

    #[test]
    fn contains_ignores_whitespace_differences() {
        assert!(contains_compact("let  a =\n 1 ;", "let a = 1;"));
        assert!(!contains_compact("let a = 1;", "let b = 1;"));
    }

    #[test]
    fn positions_reflect_order() {
        let text = "first ( ) ; second ( ) ;";
        assert!(compact_position(text, "first();") < compact_position(text, "second();"));
    }
}
