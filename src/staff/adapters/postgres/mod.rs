//! `PostgreSQL` adapters for the staff directory.

mod models;
mod repository;
mod schema;

pub use repository::PostgresEmployeeRepository;
