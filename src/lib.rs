//! Duplicate file finder over a caller-supplied path list.
//!
//! Files are bucketed by a fast signature (a digest of their leading bytes),
//! then every multi-member bucket is verified against whole-file digests and
//! each member is classified as a full or partial (prefix-only) match.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod services;
