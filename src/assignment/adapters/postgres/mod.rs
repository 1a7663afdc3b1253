//! `PostgreSQL` adapters for assignments.

mod models;
mod repository;
mod schema;

pub use repository::PostgresAssignmentRepository;
