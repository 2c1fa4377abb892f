//! Additive heuristic scoring.
//!
//! Each rule contributes a fixed amount to the score; rules are independent
//! and order does not matter. The score is unbounded above and never short
//! circuits, so every rule is evaluated for every file.

use dropscan_core::FileInput;

/// Base score for batch script extensions (`bat`, `cmd`).
pub const SCRIPT_EXTENSION_SCORE: u32 = 3;

/// Added when a batch script contains a loop construct.
pub const LOOP_MARKER_SCORE: u32 = 2;

/// Added when the declared MIME type does not mention the extension.
pub const MIME_MISMATCH_SCORE: u32 = 2;

/// Added for files smaller than [`TINY_FILE_BYTES`].
pub const TINY_FILE_SCORE: u32 = 1;

/// Added for files larger than [`OVERSIZE_FILE_BYTES`].
pub const OVERSIZE_FILE_SCORE: u32 = 2;

/// Files below this size are suspicious stubs.
pub const TINY_FILE_BYTES: u64 = 100;

/// Files above this size (50 MiB) are suspicious padding.
pub const OVERSIZE_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Loop constructs that suggest a runaway batch script. Matched
/// case-sensitively against the raw text.
const LOOP_MARKERS: [&str; 3] = ["while", ":loop", "goto"];

/// Whether the declared MIME type is consistent with the file extension.
///
/// Deliberately coarse: the extension merely has to appear as a substring
/// of the MIME string, so `zip` matches `application/zip` while `exe` does
/// not match `application/x-msdownload`. An empty extension matches
/// everything. Isolated here so a stricter lookup table can replace it
/// without touching the scoring.
#[must_use]
pub fn mime_matches_extension(content_type: &str, extension: &str) -> bool {
    content_type.contains(extension)
}

/// Score a file against all heuristic rules.
#[must_use]
pub fn score(input: &FileInput) -> u32 {
    let mut score = 0;
    let extension = input.extension();

    if matches!(extension.as_str(), "bat" | "cmd") {
        score += SCRIPT_EXTENSION_SCORE;

        let text = input.text();
        if LOOP_MARKERS.iter().any(|marker| text.contains(marker)) {
            score += LOOP_MARKER_SCORE;
        }
    }

    if !mime_matches_extension(input.content_type(), &extension) {
        score += MIME_MISMATCH_SCORE;
    }

    if input.size() < TINY_FILE_BYTES {
        score += TINY_FILE_SCORE;
    }
    if input.size() > OVERSIZE_FILE_BYTES {
        score += OVERSIZE_FILE_SCORE;
    }

    score
}
