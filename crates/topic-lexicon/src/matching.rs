//! The term-matching convention shared by every table consumer.

/// Substring match, except that very short terms ("tea", "caa", "lei")
/// must sit on word boundaries so they do not fire inside longer words
/// like "teatro" or "leitura".
///
/// Expects `text` to already be lowercased, like the tables themselves.
pub fn contains_term(text: &str, term: &str) -> bool {
    if term.chars().count() > 4 {
        return text.contains(term);
    }
    for (start, _) in text.match_indices(term) {
        let before = text[..start].chars().next_back();
        let after = text[start + term.len()..].chars().next();
        let boundary_before = before.map_or(true, |c| !c.is_alphanumeric());
        let boundary_after = after.map_or(true, |c| !c.is_alphanumeric());
        if boundary_before && boundary_after {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_terms_match_as_substrings() {
        assert!(contains_term("crianças autistas na escola", "autis"));
        assert!(contains_term("pessoas diagnosticadas", "diagnostic"));
    }

    #[test]
    fn test_short_terms_require_word_boundaries() {
        assert!(contains_term("pessoas com tea no brasil", "tea"));
        assert!(contains_term("tea: o espectro", "tea"));
        assert!(!contains_term("grupo de teatro local", "tea"));
        assert!(!contains_term("roteador", "tea"));
        assert!(!contains_term("leitura na escola", "lei"));
        assert!(contains_term("a lei garante", "lei"));
    }

    #[test]
    fn test_boundaries_handle_accented_neighbors() {
        // Accented letters are alphanumeric and must block the match.
        assert!(!contains_term("ateá alguma coisa", "tea"));
    }
}
