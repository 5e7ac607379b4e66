use std::collections::HashSet;

/// Short Marathi function words that carry no meaning for matching.
pub const MARATHI_STOP_WORDS: [&str; 15] = [
    "आहे",
    "कसे",
    "नाही",
    "मध्ये",
    "हे",
    "त्या",
    "कधी",
    "पण",
    "होते",
    "मी",
    "आणि",
    "त्यामुळे",
    "का",
    "काय",
    "कुठे",
];

/// Normalises free text before it is embedded: strips punctuation, drops stop
/// words and collapses whitespace.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    stop_words: HashSet<String>,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::with_stop_words(MARATHI_STOP_WORDS)
    }
}

impl TextPreprocessor {
    pub fn with_stop_words<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: stop_words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn preprocess(&self, text: &str) -> String {
        let stripped: String = text.chars().filter(|c| !is_punctuation(*c)).collect();

        stripped
            .split_whitespace()
            .filter(|token| !self.is_stop_word(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// ASCII punctuation, Devanagari danda and double danda, and the general
/// punctuation block (dashes, curly quotes, ellipsis, primes).
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c, '\u{0964}' | '\u{0965}')
        || matches!(c, '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}')
}
