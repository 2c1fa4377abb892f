//! Malware verdict pipeline backed by a Supabase-style catalog store.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dropscan::{engine, CatalogClient, FileScanner};
//!
//! #[tokio::main]
//! async fn main() -> dropscan::Result<()> {
//!     // Reads DROPSCAN_STORE_URL and DROPSCAN_STORE_KEY
//!     let catalog = CatalogClient::from_env()?;
//!     let scanner = FileScanner::new(catalog);
//!
//!     let health = scanner.health_check().await?;
//!     println!("catalog reachable, {} scans on record", health.scan_result_count);
//!
//!     let input = engine::input::read_file("invoice.bat").await?;
//!     let report = scanner.scan(&input).await;
//!     println!("{}: {} ({})", report.file_name, report.severity, report.hash);
//!
//!     if report.is_detection() {
//!         let location = scanner.store(&input).await;
//!         println!("content kept at {location}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/dropscan/0.1.0")]

// Re-export core types
pub use dropscan_core::*;

// Re-export client
pub use dropscan_client::{CatalogClient, CatalogClientBuilder, CatalogConfig};

// Re-export the scanning pipeline
pub use dropscan_engine as engine;
pub use dropscan_engine::{BehavioralAnalyzer, ContentStore, FileScanner, UploadRetry};

// Re-export runtime for convenience
pub use tokio;
pub use serde;
pub use serde_json;
