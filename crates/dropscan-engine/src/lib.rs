//! File scanning pipeline for the dropscan malware scanner.
//!
//! The pipeline takes an uploaded file through four independent analysis
//! stages and combines them into a severity verdict:
//!
//! 1. **Hashing** ([`hasher`]): SHA-256 content digest, the file's identity
//! 2. **Heuristics** ([`heuristics`]): additive score from shallow signals
//! 3. **Static rules** ([`static_rules`]): extension and content patterns
//! 4. **Behavioral** ([`behavioral`]): cached or fresh sandbox verdicts
//!
//! [`FileScanner`] orchestrates a full scan; [`ContentStore`] handles the
//! independent upload path for the scanned bytes.

#![doc(html_root_url = "https://docs.rs/dropscan-engine/0.1.0")]

pub mod behavioral;
pub mod content;
pub mod hasher;
pub mod heuristics;
pub mod input;
pub mod policy;
pub mod scanner;
pub mod static_rules;
pub mod verdict;

pub use behavioral::BehavioralAnalyzer;
pub use content::{ContentStore, UploadRetry};
pub use scanner::FileScanner;

pub use dropscan_core::{Result, ScanError};
