/// Split a line into whitespace-delimited words.
///
/// Runs of Unicode whitespace separate words and empty pieces are dropped.
/// No normalization happens: `The` and `the`, or `mat` and `mat.`, are
/// different words.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}

/// Number of words on a line, without materializing them
pub fn count_words(line: &str) -> usize {
    tokenize(line).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_collapses_whitespace_runs() {
        let words: Vec<_> = tokenize("  the\tcat   sat\r\n").collect();
        assert_eq!(words, vec!["the", "cat", "sat"]);
    }

    #[test]
    fn test_tokenize_is_case_and_punctuation_sensitive() {
        let words: Vec<_> = tokenize("The the mat. mat").collect();
        assert_eq!(words, vec!["The", "the", "mat.", "mat"]);
    }

    #[test]
    fn test_count_words_empty_and_blank_lines() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \t  "), 0);
        assert_eq!(count_words("one"), 1);
    }
}
