use std::sync::LazyLock;

use regex::Regex;

use crate::stopwords::is_stopword;

/// Tokens of this many characters or fewer are dropped.
const MAX_DROPPED_TOKEN_CHARS: usize = 2;

static NON_WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("static regex is valid"));

/// Normalize `text` into tokens, joining `n` consecutive words for n-grams.
///
/// Lowercases, replaces every run of non-word characters with a space, splits
/// on Unicode whitespace, then drops short tokens and stopwords. With `n > 1`
/// each window of `n` surviving words becomes one space-joined token; fewer
/// than `n` surviving words yield no tokens. `n == 0` behaves like `n == 1`.
pub fn tokenize(text: &str, n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD_RUN.replace_all(&lowered, " ");

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > MAX_DROPPED_TOKEN_CHARS)
        .filter(|word| !is_stopword(word))
        .collect();

    if n <= 1 {
        return words.into_iter().map(ToOwned::to_owned).collect();
    }
    words.windows(n).map(|window| window.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn punctuation_runs_become_separators() {
        assert_eq!(
            tokenize("Rust/Go--Kubernetes!!!Terraform", 1),
            vec!["rust", "kubernetes", "terraform"]
        );
    }

    #[test]
    fn underscores_are_word_characters() {
        assert_eq!(tokenize("snake_case names", 1), vec!["snake_case", "names"]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(tokenize("né élan ab", 1), vec!["élan"]);
    }

    #[test]
    fn zero_window_is_unigrams() {
        assert_eq!(tokenize("distributed systems", 0), vec!["distributed", "systems"]);
    }
}
