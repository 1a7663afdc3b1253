//! In-memory assignment adapters.

mod assignment;

pub use assignment::InMemoryAssignmentRepository;
