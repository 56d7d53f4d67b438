#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for object-store client operations.
pub const TRACING_TARGET_CLIENT: &str = "rawlog_object::client";

/// Tracing target for provider connection setup.
pub const TRACING_TARGET_PROVIDER: &str = "rawlog_object::provider";

pub mod client;
/// Provider trait and object storage provider factories.
pub mod providers;
/// Error and listing types.
pub mod types;

pub use client::{GetOutput, KeyLister, ObjectStoreClient, StoreLister};
pub use types::{Error, ErrorKind, ObjectEntry, Result};
