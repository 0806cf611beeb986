//! Localization of object names.
//!
//! English names come from the name files; localized names are derived from
//! them through a [`Translator`] whenever the locale changes.

use std::collections::HashMap;

/// Maps an English name to its localized form.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> String;
}

/// Leaves every name in English.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Lookup-table translator; names missing from the table stay in English.
#[derive(Debug, Clone, Default)]
pub struct DictionaryTranslator {
    entries: HashMap<String, String>,
}

impl DictionaryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, english: impl Into<String>, localized: impl Into<String>) {
        self.entries.insert(english.into(), localized.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for DictionaryTranslator {
    fn translate(&self, text: &str) -> String {
        self.entries
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_pass_through() {
        let tr = DictionaryTranslator::from_pairs([("Crab Nebula", "Krabbennebel")]);
        assert_eq!(tr.translate("Crab Nebula"), "Krabbennebel");
        assert_eq!(tr.translate("Ring Nebula"), "Ring Nebula");
        assert_eq!(IdentityTranslator.translate("Ring Nebula"), "Ring Nebula");
    }
}
