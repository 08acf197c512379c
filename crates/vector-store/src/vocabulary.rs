use std::collections::HashMap;

/// Ordered word list with a reverse index.
///
/// Row `i` of the embedding matrix belongs to `words()[i]`. Lookups are
/// case-insensitive; when the same word occurs twice the first row wins.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            index.entry(word.to_lowercase()).or_insert(i);
        }
        Self { words, index }
    }

    /// Parses the newline-delimited vocabulary file. Every line is a row, so
    /// interior blank lines are kept to preserve row alignment.
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines().map(str::trim))
    }

    #[must_use]
    pub fn lookup(&self, word: &str) -> Option<usize> {
        if let Some(&i) = self.index.get(word) {
            return Some(i);
        }
        self.index.get(&word.to_lowercase()).copied()
    }

    #[must_use]
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Parses a plain word list (stopwords, board words): one word per line,
/// surrounding whitespace trimmed, blank lines dropped.
#[must_use]
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_is_case_insensitive() {
        let vocab = Vocabulary::new(["cold", "ice", "fire"]);
        assert_eq!(vocab.lookup("ice"), Some(1));
        assert_eq!(vocab.lookup("ICE"), Some(1));
        assert_eq!(vocab.lookup("Fire"), Some(2));
        assert_eq!(vocab.lookup("water"), None);
    }

    #[test]
    fn duplicate_words_resolve_to_first_row() {
        let vocab = Vocabulary::new(["cold", "ice", "cold"]);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.lookup("cold"), Some(0));
    }

    #[test]
    fn from_lines_keeps_row_alignment() {
        let vocab = Vocabulary::from_lines("the\n\nof\r\nand\n");
        assert_eq!(vocab.words(), &["the", "", "of", "and"]);
        assert_eq!(vocab.lookup("and"), Some(3));
    }

    #[test]
    fn word_list_drops_blank_lines() {
        let words = parse_word_list("  AFRICA\n\nAGENT \n\n");
        assert_eq!(words, vec!["AFRICA".to_string(), "AGENT".to_string()]);
    }
}
