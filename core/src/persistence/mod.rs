//! Posting-list persistence.
//!
//! Each term's postings live as a flat sequence of little-endian 32-bit integers in a file at
//! `root/field/last_character_of_term/term`, with field and term strings sanitized so every
//! non-alphanumeric character becomes `_` before the path is built. A missing file is not an
//! error — it is treated as an empty term.

mod directory;

pub use directory::FilesystemPostingStore;

use {crate::error::QueryError, async_trait::async_trait};

/// Storage for posting lists, keyed by `(field, term)`. Kept as a trait, mirroring this crate's
/// existing split between a storage trait and a filesystem-backed implementor, so tests can swap
/// in an in-memory store without touching a real filesystem.
#[async_trait]
pub trait PostingStore: Send + Sync {
    /// Loads the posting list for `(field, term)`. Returns an empty list if no file exists yet.
    async fn load(&self, field: &str, term: &str) -> Result<Vec<i32>, QueryError>;

    /// Appends `ids` to the posting list for `(field, term)`, creating the file (and its parent
    /// directories) if necessary.
    async fn append(&self, field: &str, term: &str, ids: &[i32]) -> Result<(), QueryError>;
}

/// Replaces every character that is not an ASCII alphanumeric with `_`, used for both the field
/// and term path components so arbitrary term text can't escape the store's root or collide with
/// reserved path characters.
pub(crate) fn sanitize(component: &str) -> String {
    component.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

/// The directory name Lucene-style term paths bucket files under: the term's last character
/// (sanitized the same way the term itself is), or `_` for an empty term.
pub(crate) fn last_char_bucket(sanitized_term: &str) -> String {
    sanitized_term.chars().last().map(|c| c.to_string()).unwrap_or_else(|| "_".to_string())
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq};

    #[test]
    fn sanitizes_non_alphanumeric_characters() {
        assert_eq!(sanitize("foo/bar baz!"), "foo_bar_baz_");
        assert_eq!(sanitize("plain123"), "plain123");
    }

    #[test]
    fn buckets_by_last_character() {
        assert_eq!(last_char_bucket("hello"), "o");
        assert_eq!(last_char_bucket(""), "_");
    }
}
