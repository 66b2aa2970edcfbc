//! Lookaside Core - Domain types and errors
//!
//! This crate provides the foundational types shared by every tier of the
//! Lookaside cache: entity keys, the value codec seam, and the error
//! taxonomy that crosses the public boundary.

pub mod codec;
pub mod error;
pub mod key;

// Re-exports
pub use codec::{CodecError, JsonCodec, ValueCodec};
pub use error::LookupError;
pub use key::EntityKey;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
