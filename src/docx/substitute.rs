//! `{{key}}` placeholder substitution

use serde::Serialize;

/// Placeholder values, applied in a single pass.
///
/// Each key `k` is matched as the literal token `{{k}}`. Substituted values
/// are never rescanned, so a value that happens to contain another token is
/// copied through verbatim.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    tokens: Vec<(String, String)>,
}

impl Replacements {
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut replacements = Self::default();
        for (key, value) in pairs {
            replacements.insert(key, value);
        }
        replacements
    }

    /// Add or overwrite a key, keeping first-insertion order
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let token = format!("{{{{{}}}}}", key.as_ref());
        let value = value.into();
        match self.tokens.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.tokens.push((token, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Substitute every known token in `text`.
    ///
    /// Returns the new text and the number of tokens replaced. Unknown
    /// `{{...}}` sequences are left alone.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        let mut count = 0;

        while let Some(idx) = rest.find("{{") {
            out.push_str(&rest[..idx]);
            let candidate = &rest[idx..];
            match self
                .tokens
                .iter()
                .find(|(token, _)| candidate.starts_with(token.as_str()))
            {
                Some((token, value)) => {
                    out.push_str(value);
                    rest = &candidate[token.len()..];
                    count += 1;
                }
                None => {
                    // Step one brace so "{{{key}}" still finds "{{key}}"
                    out.push('{');
                    rest = &candidate[1..];
                }
            }
        }
        out.push_str(rest);
        (out, count)
    }
}

/// What a substitution pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionSummary {
    pub paragraphs_visited: usize,
    pub paragraphs_changed: usize,
    pub tokens_replaced: usize,
    pub parts_changed: Vec<String>,
}
