//! Static pattern matching.
//!
//! A coarse filter over the file's extension and, for batch scripts, its
//! textual content. Unlike [`heuristics`](crate::heuristics) this stage
//! yields a single boolean rather than a score.

use dropscan_core::FileInput;

/// Extensions that warrant static inspection. Files outside this set are
/// never flagged here regardless of content.
pub const SUSPICIOUS_EXTENSIONS: [&str; 6] = ["exe", "dll", "bat", "cmd", "vbs", "js"];

/// Batch script fragments that indicate destructive or persistent
/// behavior. Matched against the lowercased content.
const BATCH_PATTERNS: [&str; 9] = [
    "while true",
    ":loop",
    "goto",
    "start /b",
    "shutdown",
    "taskkill",
    "del",
    "rd /s",
    "format",
];

/// Whether the file matches a static detection rule.
///
/// Batch scripts (`bat`, `cmd`) are flagged only when their content holds
/// one of [`BATCH_PATTERNS`]; every other extension in
/// [`SUSPICIOUS_EXTENSIONS`] is flagged on extension alone.
#[must_use]
pub fn is_suspicious(input: &FileInput) -> bool {
    let extension = input.extension();
    if !SUSPICIOUS_EXTENSIONS.contains(&extension.as_str()) {
        return false;
    }

    if matches!(extension.as_str(), "bat" | "cmd") {
        let text = input.text().to_lowercase();
        return BATCH_PATTERNS.iter().any(|pattern| text.contains(pattern));
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, content: &str) -> FileInput {
        FileInput::new(name, "application/octet-stream", content.as_bytes().to_vec())
    }

    #[test]
    fn test_batch_with_pattern_is_suspicious() {
        assert!(is_suspicious(&input("evil.bat", "goto :loop")));
    }

    #[test]
    fn test_batch_patterns_match_case_insensitively() {
        assert!(is_suspicious(&input("evil.cmd", "TASKKILL /F /IM explorer.exe")));
    }

    #[test]
    fn test_benign_batch_is_clean() {
        assert!(!is_suspicious(&input("note.bat", "rem just a comment")));
    }

    #[test]
    fn test_executable_is_suspicious_regardless_of_content() {
        assert!(is_suspicious(&input("a.exe", "")));
        assert!(is_suspicious(&input("lib.dll", "harmless text")));
        assert!(is_suspicious(&input("macro.vbs", "")));
        assert!(is_suspicious(&input("widget.js", "console.log('hi')")));
    }

    #[test]
    fn test_unlisted_extension_is_clean() {
        assert!(!is_suspicious(&input("doc.pdf", "shutdown now")));
        assert!(!is_suspicious(&input("README", "format c:")));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        // Extensions are lowercased before lookup.
        assert!(is_suspicious(&input("EVIL.BAT", "del c:\\windows")));
    }
}
