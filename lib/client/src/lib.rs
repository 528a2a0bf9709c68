//! Typed WorkOps API client with a read-through query cache.
//!
//! Reads go through [`cache::QueryCache`] keyed by [`keys`]; every
//! write names its operation as a [`keys::WriteOp`], and the
//! invalidation table in that module decides which cached reads to
//! drop. Adding a write without extending the table is a compile
//! error, so reads can never serve data a write already changed.

pub mod cache;
pub mod client;
pub mod keys;

pub use cache::QueryCache;
pub use client::{ClientError, Page, WorkOpsClient};
pub use keys::WriteOp;
