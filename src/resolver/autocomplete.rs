//! Completion of partially typed identifiers and names.

use crate::catalogs::Catalog;
use crate::store::ObjectStore;

/// Prefix families each catalog answers to. A catalog only contributes
/// completions when the typed text starts with one of its family prefixes
/// and with none of its exclusions.
fn family(catalog: Catalog) -> (&'static str, &'static [&'static str]) {
    match catalog {
        Catalog::M => ("M", &["ME"]),
        Catalog::C => ("C", &["CR", "CE", "CO"]),
        Catalog::Sh2 => ("SH", &[]),
        other => (other.search_prefix(), &[]),
    }
}

fn catalog_accepts(catalog: Catalog, upper_prefix: &str) -> bool {
    let (head, exclusions) = family(catalog);
    upper_prefix.starts_with(head) && !exclusions.iter().any(|ex| upper_prefix.starts_with(ex))
}

/// Whether `name` matches the typed `prefix`, ignoring case.
///
/// Without `whole_words_only` the prefix may appear anywhere in the name;
/// with it, the prefix must start the name or one of its words.
pub fn match_object_name(name: &str, prefix: &str, whole_words_only: bool) -> bool {
    let name = name.to_uppercase();
    let prefix = prefix.to_uppercase();
    if prefix.is_empty() {
        return false;
    }
    if !whole_words_only {
        return name.contains(&prefix);
    }
    let mut previous: Option<char> = None;
    for (i, ch) in name.char_indices() {
        let word_start = previous.map_or(true, |p| !p.is_alphanumeric());
        if word_start && ch.is_alphanumeric() && name[i..].starts_with(&prefix) {
            return true;
        }
        previous = Some(ch);
    }
    false
}

/// Completions for `prefix`, sorted and capped at `max_results`.
///
/// Each object contributes at most one spelling per catalog: the compact
/// form (`M31`) when it starts with the prefix, else the spaced form
/// (`M 31`). Proper names and aliases, English or localized, are added
/// when they match per [`match_object_name`].
pub fn autocomplete(
    store: &ObjectStore,
    prefix: &str,
    max_results: usize,
    whole_words_only: bool,
    use_english_names: bool,
) -> Vec<String> {
    let trimmed = prefix.trim_start();
    if max_results == 0 || trimmed.is_empty() {
        return Vec::new();
    }
    let upper = trimmed.to_uppercase();

    let mut result = Vec::new();
    for catalog in Catalog::ALL {
        if !catalog_accepts(catalog, &upper) {
            continue;
        }
        for (_, record) in store.iter() {
            let Some(designator) = record.catalog_numbers.designation(catalog) else {
                continue;
            };
            let designator = designator.to_string();
            let compact = catalog.compact_form(&designator);
            if compact.to_uppercase().starts_with(&upper) {
                result.push(compact);
                continue;
            }
            let spaced = catalog.spaced_form(&designator);
            if spaced.to_uppercase().starts_with(&upper) {
                result.push(spaced);
            }
        }
    }

    for (_, record) in store.iter() {
        let (name, aliases) = if use_english_names {
            (record.english_name(), record.name_aliases())
        } else {
            (record.localized_name(), record.localized_name_aliases())
        };
        if !name.is_empty() && match_object_name(name, trimmed, whole_words_only) {
            result.push(name.to_string());
        }
        for alias in aliases {
            if match_object_name(alias, trimmed, whole_words_only) {
                result.push(alias.clone());
            }
        }
    }

    result.sort();
    result.dedup();
    result.truncate(max_results);
    result
}
