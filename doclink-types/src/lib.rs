//! Core type definitions for doclink.
//!
//! This crate defines the fundamental, store-agnostic types used throughout
//! the data-access layer:
//! - The uniform [`ErrorObject`] returned by every fallible operation
//! - [`Document`], a typed record plus store-managed metadata
//! - [`Principal`], a serializable snapshot of an authenticated identity
//! - [`reorder`], the pure move-and-renumber algorithm for indexed lists
//!
//! Nothing here performs I/O. The store and identity-provider clients live
//! in their own crates and build on these types.

mod document;
mod error;
mod principal;
mod reorder;

pub use document::{Document, CREATED_AT_FIELD, UPDATED_AT_FIELD};
pub use error::{ErrorObject, Severity};
pub use principal::Principal;
pub use reorder::{reorder, Indexed};

/// Result type alias using the uniform error value.
///
/// Every public operation in the data-access layer resolves to either a
/// domain value or exactly one [`ErrorObject`] — never a raw vendor error.
pub type OpResult<T> = std::result::Result<T, ErrorObject>;
