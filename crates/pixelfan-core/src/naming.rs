//! Artifact naming
//!
//! Every derived artifact's storage key is a pure function of the source key
//! (plus stage and size name). All key layout is centralized here so the
//! workers stay consistent and reprocessing the same event always targets the
//! same keys.

use crate::constants::{CONVERTED_PREFIX, RESIZED_PREFIX};

/// The derived name of a source key: basename with directory and extension
/// stripped. `photos/aaa.png` -> `aaa`. Used as the join key across the
/// metadata record, the converted artifact, and the resized artifact set.
///
/// A basename that is *only* an extension (`.hidden`) is kept whole rather
/// than reduced to an empty name.
pub fn derived_name(key: &str) -> &str {
    let base = file_name(key);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

/// Basename of a key, extension kept. `photos/aaa.png` -> `aaa.png`.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Key of the format-normalized artifact for a source key.
pub fn converted_key(source_key: &str) -> String {
    format!("{}{}.jpg", CONVERTED_PREFIX, derived_name(source_key))
}

/// Key of one resized artifact for a source key and size name.
pub fn resized_key(source_key: &str, size_name: &str) -> String {
    format!(
        "{}{}/{}.jpg",
        RESIZED_PREFIX,
        derived_name(source_key),
        size_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_name_strips_directory_and_extension() {
        assert_eq!(derived_name("photos/aaa.jpg"), "aaa");
        assert_eq!(derived_name("aaa.png"), "aaa");
        assert_eq!(derived_name("aaa"), "aaa");
    }

    #[test]
    fn test_derived_name_nested_directories() {
        assert_eq!(derived_name("a/b/c/photo.gif"), "photo");
    }

    #[test]
    fn test_derived_name_multiple_dots() {
        assert_eq!(derived_name("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn test_derived_name_dotfile_kept_whole() {
        assert_eq!(derived_name(".hidden"), ".hidden");
    }

    #[test]
    fn test_file_name_keeps_extension() {
        assert_eq!(file_name("photos/aaa.jpg"), "aaa.jpg");
        assert_eq!(file_name("aaa.jpg"), "aaa.jpg");
    }

    #[test]
    fn test_artifact_keys() {
        assert_eq!(converted_key("photos/aaa.png"), "converted/aaa.jpg");
        assert_eq!(
            resized_key("photos/aaa.png", "thumbnail"),
            "resized/aaa/thumbnail.jpg"
        );
        assert_eq!(resized_key("aaa", "large"), "resized/aaa/large.jpg");
    }

    #[test]
    fn test_artifact_keys_are_stable_across_calls() {
        assert_eq!(converted_key("x/y.png"), converted_key("x/y.png"));
        assert_eq!(
            resized_key("x/y.png", "medium"),
            resized_key("x/y.png", "medium")
        );
    }
}
