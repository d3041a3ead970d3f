//! Domain primitives shared by every archivist crate.
//!
//! Nothing in here performs I/O: the crate holds identifier aliases, the
//! domain error type, and small pure helpers (destination validation, expiry
//! parsing) that both the store and the HTTP layer depend on.

pub mod email;
pub mod error;
pub mod expiry;
pub mod types;
