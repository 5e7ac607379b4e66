pub mod loader;

pub use loader::load_corpus;

/// One (problem, verse) pair. Both fields are guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    problem: String,
    verse: String,
}

impl CorpusEntry {
    /// Returns `None` when either field is empty or whitespace only.
    pub fn new(problem: impl Into<String>, verse: impl Into<String>) -> Option<Self> {
        let problem = problem.into();
        let verse = verse.into();
        if problem.trim().is_empty() || verse.trim().is_empty() {
            return None;
        }
        Some(Self { problem, verse })
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn verse(&self) -> &str {
        &self.verse
    }
}

/// Ordered, immutable collection of entries. The position of an entry is its
/// identity for the rest of the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CorpusEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn problems(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(CorpusEntry::problem)
    }
}

impl FromIterator<CorpusEntry> for Corpus {
    fn from_iter<I: IntoIterator<Item = CorpusEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Header names of the two required columns, stored normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusColumns {
    pub problem: String,
    pub verse: String,
}

impl CorpusColumns {
    pub fn new(problem: &str, verse: &str) -> Self {
        Self {
            problem: normalize_header(problem),
            verse: normalize_header(verse),
        }
    }
}

impl Default for CorpusColumns {
    fn default() -> Self {
        Self::new("problem", "shloka_combined")
    }
}

pub(crate) fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_rejects_blank_fields() {
        assert!(CorpusEntry::new("", "verse").is_none());
        assert!(CorpusEntry::new("problem", "  \t").is_none());
        assert!(CorpusEntry::new("problem", "verse").is_some());
    }

    #[test]
    fn entry_keeps_text_untrimmed() {
        let entry = CorpusEntry::new(" मन अस्थिर ", "श्लोक").unwrap();
        assert_eq!(entry.problem(), " मन अस्थिर ");
        assert_eq!(entry.verse(), "श्लोक");
    }

    #[test]
    fn corpus_preserves_order() {
        let corpus: Corpus = [("a", "1"), ("b", "2"), ("c", "3")]
            .into_iter()
            .filter_map(|(p, v)| CorpusEntry::new(p, v))
            .collect();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.problems().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(corpus.get(1).map(CorpusEntry::verse), Some("2"));
        assert!(corpus.get(3).is_none());
    }

    #[test]
    fn columns_are_normalised() {
        let columns = CorpusColumns::new("  Problem ", "SHLOKA_Combined");
        assert_eq!(columns, CorpusColumns::default());
    }
}
