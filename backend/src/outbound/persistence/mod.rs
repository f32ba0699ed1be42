//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin adapters over `diesel-async` with `bb8` pooling: repositories only
//! translate between row structs and domain types, and every database error
//! is mapped to a domain persistence error. Row structs and the schema are
//! internal to this module.

mod diesel_identity_repository;
mod models;
mod pool;
mod schema;

pub use diesel_identity_repository::DieselIdentityRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
