//! Listing candidate field names present in a document.

use std::collections::BTreeSet;

use super::rules::patterns::MARKDOWN_EMPHASIS;
use super::rules::split_lines;

/// Longest key, in words, still considered a field label.
const MAX_KEY_WORDS: usize = 4;

/// Keys of `key: value` lines across all pages, sorted and de-duplicated.
///
/// Markdown emphasis is removed first; keys longer than four words are
/// treated as prose and skipped.
pub fn discover_field_names<S: AsRef<str>>(pages: &[S]) -> Vec<String> {
    let mut names = BTreeSet::new();

    for page in pages {
        for line in split_lines(page.as_ref()) {
            let line = MARKDOWN_EMPHASIS.replace_all(line, "");
            let Some((key, _)) = line.trim().split_once(':') else {
                continue;
            };

            let key = key.trim();
            if !key.is_empty() && key.split_whitespace().count() <= MAX_KEY_WORDS {
                names.insert(key.to_string());
            }
        }
    }

    names.into_iter().collect()
}
