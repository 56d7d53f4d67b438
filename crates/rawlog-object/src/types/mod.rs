//! Error and listing types shared by the client and providers.

pub mod error;
pub mod object_entry;

pub use error::{Error, ErrorKind, Result};
pub use object_entry::ObjectEntry;
