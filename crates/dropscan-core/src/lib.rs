//! Core types for the dropscan malware scanning pipeline.
//!
//! This crate provides the foundational types used across the dropscan library:
//!
//! - **Types**: File inputs, content hashes, sandbox reports, and verdict records
//! - **Errors**: Comprehensive error handling with [`ScanError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use dropscan_core::{ScanReport, Severity, Result};
//!
//! fn triage(report: ScanReport) -> Result<()> {
//!     if report.severity >= Severity::High {
//!         println!("quarantine {}", report.file_name);
//!     }
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/dropscan-core/0.1.0")]

mod error;
pub mod types;

pub use error::{Result, ScanError};
pub use types::*;
