//! Repository modules implementing CRUD operations on [`PmoDb`](crate::PmoDb).
//!
//! Each module adds methods to `PmoDb` via `impl PmoDb` blocks or trait impls.

pub mod documents;
pub mod email;
