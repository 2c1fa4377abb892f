//! HTTP client for the dropscan catalog store.
//!
//! This crate provides the main [`CatalogClient`] for interacting with the
//! hosted store backing the scanning pipeline: the relational tables holding
//! behavioral verdicts and the malware registry, the content bucket, and the
//! sandbox analysis endpoint.

#![doc(html_root_url = "https://docs.rs/dropscan-client/0.1.0")]

mod client;
mod config;
pub mod api;

pub use client::{CatalogClient, CatalogClientBuilder};
pub use config::*;
pub use dropscan_core::{Result, ScanError};
