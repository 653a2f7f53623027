//! # optima-store
//!
//! SQLite persistence for Optima: user accounts, generated documents, and
//! password-reset token records.
//!
//! Repositories are stateless — every method takes `&Connection` — and the
//! [`StorePool`] (r2d2 over rusqlite) hands out connections. Migrations run
//! on pool creation; WAL mode and foreign keys are enabled per connection.

#![deny(unsafe_code)]

pub mod errors;
pub mod migrations;
pub mod pool;
pub mod repositories;
pub mod row_types;

pub use errors::{Result, StoreError};
pub use pool::StorePool;
pub use repositories::{DocumentRepo, ResetTokenRepo, UserRepo};
pub use row_types::{DocumentRow, ResetTokenRow, UserRow};
