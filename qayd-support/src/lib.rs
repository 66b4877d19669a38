//! # Qayd Support
//!
//! Shared utilities for the Qayd registry crates.
//!
//! This crate provides:
//! - Text rendering for error messages

pub mod rendering;
