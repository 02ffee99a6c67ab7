//! `wherefrom` — show where downloaded files came from.
//!
//! This crate provides the core library for reading the provenance
//! metadata operating systems attach to downloaded files (extended
//! attributes on macOS and Linux, the `Zone.Identifier` alternate data
//! stream on Windows), decoding the platform-specific payloads, and
//! merging everything into one record per file.

pub mod aggregate;
pub mod attr;
pub mod cache;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod render;
pub mod split;
