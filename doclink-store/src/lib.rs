//! Typed document repository and store backends.
//!
//! One [`Repository`] instance fronts one collection path in a remote,
//! collection/document organized store. The store itself sits behind the
//! [`StoreBackend`] trait:
//!
//! - [`HttpStore`] talks to a remote store over its REST surface
//! - [`MemoryStore`] is an in-process backend with the same semantics,
//!   used for tests and local tooling
//!
//! Every repository operation is a single attempt that resolves to either a
//! domain value or the uniform [`doclink_types::ErrorObject`]; backend
//! errors never cross the repository boundary raw.

pub mod backend;
mod error;
mod http;
mod memory;
mod repository;

pub use backend::{
    BatchWrite, Direction, FilterOp, QueryConstraint, RawDocument, StoreBackend, WriteBatch,
};
pub use error::{StoreError, StoreResult};
pub use http::{HttpStore, StoreConfig};
pub use memory::MemoryStore;
pub use repository::{DeleteReceipt, Repository};
