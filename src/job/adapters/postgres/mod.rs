//! `PostgreSQL` adapters for the job registry.

mod models;
mod repository;
mod schema;

pub use repository::PostgresJobRepository;
