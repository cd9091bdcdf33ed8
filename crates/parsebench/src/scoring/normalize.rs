use std::fmt;

/// Canonical comparison form of a text: lower-cased tokens with ASCII
/// punctuation removed, joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whitespace-split, lower-cased, punctuation-stripped tokens. Tokens left
/// empty after stripping are dropped.
pub fn normalize_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| !c.is_ascii_punctuation())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

pub fn normalize(text: &str) -> NormalizedText {
    NormalizedText(normalize_tokens(text).join(" "))
}
