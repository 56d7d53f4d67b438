//! Client trait and object storage providers.

mod client;
mod s3;
mod s3_lister;

pub use client::Client;
pub use s3::{S3Credentials, S3Provider};
pub use s3_lister::S3KeyLister;
