//! In-memory job adapters.

mod job;

pub use job::InMemoryJobRepository;
