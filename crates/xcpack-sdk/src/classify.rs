//! Success detection from xcodebuild's human-readable output.
//!
//! xcodebuild is driven through a shell and its exit status is not observed,
//! so each step is judged by a fixed literal marker in the captured text.
//! Matching is case-sensitive and performs no normalization.

/// Printed by `xcodebuild clean` on success.
pub const CLEAN_SUCCEEDED: &str = "** CLEAN SUCCEEDED **";

/// Printed by `xcodebuild archive` on success.
pub const ARCHIVE_SUCCEEDED: &str = "** ARCHIVE SUCCEEDED **";

/// Substring printed by `xcodebuild -create-xcframework` on success.
pub const MERGE_SUCCEEDED: &str = "successfully";

/// Returns `true` when `raw_text` contains `expected_marker`.
///
/// ```
/// use xcpack_sdk::classify::{classify, ARCHIVE_SUCCEEDED};
///
/// assert!(classify("...\n** ARCHIVE SUCCEEDED **\n", ARCHIVE_SUCCEEDED));
/// assert!(!classify("** ARCHIVE FAILED **", ARCHIVE_SUCCEEDED));
/// ```
pub fn classify(raw_text: &str, expected_marker: &str) -> bool {
    raw_text.contains(expected_marker)
}

/// Clean output must contain [`CLEAN_SUCCEEDED`]; empty output is a failure.
pub fn clean_succeeded(raw_text: &str) -> bool {
    classify(raw_text, CLEAN_SUCCEEDED)
}

/// Archive output must contain [`ARCHIVE_SUCCEEDED`]; empty output is a failure.
pub fn archive_succeeded(raw_text: &str) -> bool {
    classify(raw_text, ARCHIVE_SUCCEEDED)
}

/// `-create-xcframework` may succeed silently, so empty output passes.
pub fn merge_succeeded(raw_text: &str) -> bool {
    raw_text.is_empty() || classify(raw_text, MERGE_SUCCEEDED)
}
